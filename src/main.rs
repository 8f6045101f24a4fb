//! annolight - annotation keyword scanner for the command line
//!
//! Host shell around the highlighting engine: loads configuration, scans
//! the given files, and prints either the annotation report or the
//! matching source lines with keywords rendered in their resolved colors.

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use annolight::{
    find_all, report, AnsiRenderer, Config, Document, HighlightError, HighlightManager,
    HighlightSession, KeywordFilter, Result,
};

fn main() {
    log::set_logger(&STDERR_LOGGER).ok();
    log::set_max_level(log::LevelFilter::Warn);

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Forwards engine warnings to stderr
struct StderrLogger;

static STDERR_LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut config_path: Option<PathBuf> = None;
    let mut keyword: Option<String> = None;
    let mut show_source = false;
    let mut files: Vec<PathBuf> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-V" | "--version" => {
                print_version();
                return Ok(());
            }
            "-s" | "--source" => show_source = true,
            "-c" | "--config" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| HighlightError::Config("--config needs a path".to_string()))?;
                config_path = Some(PathBuf::from(path));
            }
            "-k" | "--keyword" => {
                i += 1;
                let class = args
                    .get(i)
                    .ok_or_else(|| HighlightError::Config("--keyword needs a class".to_string()))?;
                keyword = Some(class.clone());
            }
            arg if arg.starts_with('-') => {
                return Err(HighlightError::Config(format!("unknown option {}", arg)));
            }
            arg => files.push(PathBuf::from(arg)),
        }
        i += 1;
    }

    if files.is_empty() {
        print_usage();
        return Ok(());
    }

    let config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    if show_source {
        show_highlighted(&config, &files)
    } else {
        list_annotations(&config, &files, keyword)
    }
}

/// Print the annotation report for the given files
fn list_annotations(config: &Config, files: &[PathBuf], keyword: Option<String>) -> Result<()> {
    let session = HighlightSession::build(config)?;

    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        documents.push(Document::read(path)?);
    }

    let filter = match keyword {
        Some(class) => KeywordFilter::Class(class),
        None => KeywordFilter::All,
    };
    let records = find_all(&documents, &session, &filter);

    let stdout = std::io::stdout();
    report::write_report(&mut stdout.lock(), &records)?;
    Ok(())
}

/// Print matching source lines with keywords in their resolved colors
fn show_highlighted(config: &Config, files: &[PathBuf]) -> Result<()> {
    let mut renderer = AnsiRenderer::new();
    let mut manager = HighlightManager::new(config.clone())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for path in files {
        let document = Document::read(path)?;
        let name = document.name.clone();
        let text = document.text.clone();

        manager.set_document(document);
        manager.refresh(&mut renderer);

        writeln!(out, "{}:", name)?;
        renderer.write_highlighted(&mut out, &text)?;
        writeln!(out)?;
    }

    manager.shutdown(&mut renderer);
    Ok(())
}

fn print_usage() {
    println!(
        "annolight {} - annotation keyword scanner",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage: annolight [OPTIONS] FILE...");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Read configuration from PATH");
    println!("                         (default: ./annolight.toml, then ~/.annolight.toml)");
    println!("  -k, --keyword <CLASS>  Report only the given keyword class");
    println!("  -s, --source           Show matching lines with highlighted keywords");
    println!("  -h, --help             Show this help message");
    println!("  -V, --version          Show version information");
    println!();
    println!("Without options, prints a report of every annotation found.");
}

fn print_version() {
    println!("annolight {}", env!("CARGO_PKG_VERSION"));
}
