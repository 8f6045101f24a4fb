//! Top-level highlight controller
//!
//! Owns the compiled session, the decoration handles, the debounce
//! scheduler, and the current document. The host forwards change events
//! (edits, document switches, configuration changes) and pumps
//! [`HighlightManager::tick`] from its event loop; scan results are
//! handed to the renderer, never drawn here.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::annotations::Document;
use crate::config::Config;
use crate::error::Result;
use crate::render::{DecorationId, Renderer};
use crate::scan::{LineIndex, LineRange, ScanResult};
use crate::schedule::{DebounceScheduler, DEFAULT_DEBOUNCE};
use crate::session::HighlightSession;

pub struct HighlightManager {
    config: Config,
    session: HighlightSession,
    /// Rendering handle per class, created lazily at most once per class
    /// and released wholesale on configuration change
    decorations: BTreeMap<String, DecorationId>,
    scheduler: DebounceScheduler,
    document: Option<Document>,
    last_scan: Option<ScanResult>,
}

impl HighlightManager {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_debounce(config, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(config: Config, delay: Duration) -> Result<Self> {
        let session = HighlightSession::build(&config)?;
        Ok(Self {
            config,
            session,
            decorations: BTreeMap::new(),
            scheduler: DebounceScheduler::new(delay),
            document: None,
            last_scan: None,
        })
    }

    pub fn session(&self) -> &HighlightSession {
        &self.session
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.session.enabled
    }

    /// Active document switched
    pub fn set_document(&mut self, document: Document) {
        self.document = Some(document);
        self.last_scan = None;
        self.scheduler.request();
    }

    /// Active document content changed
    pub fn edit_document(&mut self, text: String) {
        if let Some(document) = &mut self.document {
            document.text = text;
            self.scheduler.request();
        }
    }

    /// Swap in a new configuration.
    ///
    /// A disabling change only flips the flag: the compiled matchers and
    /// decoration handles survive, so re-enabling is instant. A pattern
    /// that fails to compile leaves the previous session and decorations
    /// fully in service and returns the error.
    pub fn apply_config(&mut self, config: Config, renderer: &mut dyn Renderer) -> Result<()> {
        if !config.enabled {
            self.session.enabled = false;
            self.config.enabled = false;
            self.scheduler.request();
            return Ok(());
        }

        let session = match HighlightSession::build(&config) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("keeping previous configuration: {}", e);
                return Err(e);
            }
        };

        for (_, id) in std::mem::take(&mut self.decorations) {
            renderer.remove_decoration(id);
        }
        self.session = session;
        self.config = config;
        self.scheduler.request();
        Ok(())
    }

    /// Flip the enabled flag without recompiling anything
    pub fn toggle(&mut self) -> bool {
        self.session.enabled = !self.session.enabled;
        self.config.enabled = self.session.enabled;
        self.scheduler.request();
        self.session.enabled
    }

    /// Run the pending recomputation if its deadline has passed.
    /// Returns whether a recomputation ran.
    pub fn tick(&mut self, renderer: &mut dyn Renderer) -> bool {
        if self.scheduler.poll() {
            self.recompute(renderer);
            true
        } else {
            false
        }
    }

    /// Recompute now, cancelling any pending request
    pub fn refresh(&mut self, renderer: &mut dyn Renderer) {
        self.scheduler.cancel();
        self.recompute(renderer);
    }

    /// How long the host loop may sleep before the next pending update
    pub fn poll_timeout(&self) -> Option<Duration> {
        self.scheduler.time_remaining()
    }

    /// Release every decoration handle (teardown)
    pub fn shutdown(&mut self, renderer: &mut dyn Renderer) {
        for (_, id) in std::mem::take(&mut self.decorations) {
            renderer.remove_decoration(id);
        }
    }

    fn recompute(&mut self, renderer: &mut dyn Renderer) {
        let Some(document) = &self.document else {
            return;
        };

        // scanning runs even while disabled so the toggle stays instant
        let result = self.session.scan(&document.text);
        log::debug!("scanned {}: {} match(es)", document.name, result.total());
        self.last_scan = Some(result);
        self.apply(renderer);
    }

    fn apply(&mut self, renderer: &mut dyn Renderer) {
        let Some(document) = &self.document else {
            return;
        };
        let Some(result) = &self.last_scan else {
            return;
        };
        let index = LineIndex::new(&document.text);

        // keyword mode knows its classes up front; single-pattern classes
        // are discovered from the matches
        let keys: Vec<String> = if self.session.is_single_pattern() {
            result.classes().iter().map(|class| class.key.clone()).collect()
        } else {
            self.session.classes().map(str::to_string).collect()
        };
        for key in &keys {
            if !self.decorations.contains_key(key) {
                if let Some(style) = self.session.style_for(key) {
                    let id = renderer.create_decoration(style);
                    self.decorations.insert(key.clone(), id);
                }
            }
        }

        let enabled = self.session.enabled;
        for (key, id) in &self.decorations {
            let ranges: Vec<LineRange> = if enabled {
                result
                    .ranges(key)
                    .iter()
                    .map(|&span| index.line_range(span))
                    .collect()
            } else {
                Vec::new()
            };
            renderer.apply_decorations(*id, &ranges);
        }
    }
}
