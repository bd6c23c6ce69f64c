//! Terminal progress bars for search events.
//!
//! One bar per engine, advanced on every completed page. Bars are managed by
//! an `indicatif` [`MultiProgress`] so concurrent engines render cleanly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use webhound_search::{ProgressCallback, SearchEvent};

const BAR_TEMPLATE: &str = "  {prefix:>12} [{bar:30}] {pos}/{len} pages {msg}";

/// Renders [`SearchEvent`]s as per-engine progress bars.
pub struct ProgressRenderer {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
    failures: Mutex<HashMap<String, usize>>,
}

impl ProgressRenderer {
    /// Renderer drawing to stderr.
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Renderer drawing to an explicit target (hidden in tests).
    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Wrap the renderer into an orchestrator callback.
    pub fn callback(self: &Arc<Self>) -> ProgressCallback {
        let renderer = Arc::clone(self);
        Box::new(move |event| renderer.handle(&event))
    }

    /// Apply one event.
    pub fn handle(&self, event: &SearchEvent) {
        match event {
            SearchEvent::EngineStarted { engine, pages } => {
                let bar = self.multi.add(ProgressBar::new(*pages as u64));
                if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                    bar.set_style(style.progress_chars("=> "));
                }
                bar.set_prefix(engine.clone());
                if let Ok(mut bars) = self.bars.lock() {
                    bars.insert(engine.clone(), bar);
                }
            }
            SearchEvent::PageFetched { engine, .. } => {
                if let Some(bar) = self.bar(engine) {
                    bar.inc(1);
                }
            }
            SearchEvent::PageFailed { engine, .. } => {
                let failed = match self.failures.lock() {
                    Ok(mut failures) => {
                        let count = failures.entry(engine.clone()).or_insert(0);
                        *count += 1;
                        *count
                    }
                    Err(_) => return,
                };
                if let Some(bar) = self.bar(engine) {
                    bar.inc(1);
                    bar.set_message(format!("({failed} failed)"));
                }
            }
            SearchEvent::EngineFinished { engine, documents } => {
                if let Some(bar) = self.bar(engine) {
                    bar.finish_with_message(format!("done, {documents} retrieved"));
                }
            }
        }
    }

    /// Position and length of an engine's bar.
    pub fn position(&self, engine: &str) -> Option<(u64, Option<u64>)> {
        self.bar(engine).map(|bar| (bar.position(), bar.length()))
    }

    /// Pages that failed for an engine so far.
    pub fn failures(&self, engine: &str) -> usize {
        self.failures
            .lock()
            .ok()
            .and_then(|failures| failures.get(engine).copied())
            .unwrap_or(0)
    }

    fn bar(&self, engine: &str) -> Option<ProgressBar> {
        self.bars.lock().ok().and_then(|bars| bars.get(engine).cloned())
    }
}

impl Default for ProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}
