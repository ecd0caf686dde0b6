use std::collections::BTreeSet;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::data::model::{Curve, CurveSet, LabelSet, LoadedCurves};
use crate::data::selection::SelectionResult;
use crate::ui::selector::{CurveSelector, SelectorOptions};

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// One page of the notebook.
#[derive(Debug, Clone)]
pub struct CurvePage {
    /// Counter key, `"#N:"`; never reused within a session.
    pub key: String,
    pub title: String,
    /// Experimental data. Pages without it are ignored by the overlay tool.
    pub curve: Option<Curve>,
}

// ---------------------------------------------------------------------------
// Selector bookkeeping
// ---------------------------------------------------------------------------

/// Which selector a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorPurpose {
    /// Filtering a freshly loaded file; kept curves become pages.
    Import,
    /// Overlay tool over the existing pages; removed curves delete pages.
    Overlay,
}

/// A loaded file waiting for the user to pick what to import.
pub struct ImportSession {
    pub selector: CurveSelector,
    loaded: LoadedCurves,
}

/// Pages waiting for the user to confirm their deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRemoval {
    pub keys: Vec<String>,
    pub message: String,
}

type SelectorMessage = (SelectorPurpose, SelectionResult);

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Notebook pages in tab order.
    pub pages: Vec<CurvePage>,

    /// Index of the page shown in the central panel.
    pub active: Option<usize>,

    /// Next page counter.
    next_counter: u64,

    /// Overlay tool, while open.
    pub overlay: Option<CurveSelector>,

    /// Import selection, while a loaded file is being filtered.
    pub import: Option<ImportSession>,

    /// Deletion awaiting confirmation from the overlay tool.
    pub pending_removal: Option<PendingRemoval>,

    /// Selector results, drained once per frame.
    results_tx: Sender<SelectorMessage>,
    results_rx: Receiver<SelectorMessage>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            pages: Vec::new(),
            active: None,
            next_counter: 1,
            overlay: None,
            import: None,
            pending_removal: None,
            results_tx,
            results_rx,
            status_message: None,
        }
    }
}

impl AppState {
    // ---- Pages ----

    /// Append a page and make it active. Returns its key.
    pub fn add_page(&mut self, title: impl Into<String>, curve: Option<Curve>) -> String {
        let key = format!("#{}:", self.next_counter);
        self.next_counter += 1;
        self.pages.push(CurvePage {
            key: key.clone(),
            title: title.into(),
            curve,
        });
        self.active = Some(self.pages.len() - 1);
        key
    }

    pub fn active_page(&self) -> Option<&CurvePage> {
        self.active.and_then(|i| self.pages.get(i))
    }

    pub fn page(&self, key: &str) -> Option<&CurvePage> {
        self.pages.iter().find(|p| p.key == key)
    }

    /// Curves and titles of every page that has experimental data.
    pub fn overlay_curves(&self) -> (CurveSet, LabelSet) {
        let mut curves = CurveSet::new();
        let mut labels = LabelSet::new();
        for page in &self.pages {
            if let Some(curve) = &page.curve {
                curves.insert(page.key.clone(), curve.clone());
                labels.insert(page.key.clone(), page.title.clone());
            }
        }
        (curves, labels)
    }

    /// Delete the pages with the given keys. Pages without data are never
    /// deleted. Returns the number of pages removed.
    ///
    /// If the active page goes away, the page now at its position (or the
    /// last page) becomes active.
    pub fn remove_pages(&mut self, keys: &[String]) -> usize {
        let doomed: BTreeSet<&str> = keys.iter().map(String::as_str).collect();
        let active_key = self.active_page().map(|p| p.key.clone());
        let old_index = self.active;

        let before = self.pages.len();
        self.pages
            .retain(|p| p.curve.is_none() || !doomed.contains(p.key.as_str()));
        let removed = before - self.pages.len();

        let last = self.pages.len().checked_sub(1);
        self.active = active_key
            .and_then(|k| self.pages.iter().position(|p| p.key == k))
            .or_else(|| Some(old_index?.min(last?)));

        log::info!("removed {removed} pages");
        if removed > 0 {
            self.on_pages_changed();
        }
        removed
    }

    // ---- Selector lifecycle ----

    /// Whether the main window must stay disabled.
    pub fn is_modal(&self) -> bool {
        self.pending_removal.is_some() || self.import.is_some()
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay.is_some()
    }

    /// Build a selector whose results arrive tagged with `purpose`.
    /// Errors go to the status line.
    fn make_selector(
        &mut self,
        purpose: SelectorPurpose,
        curves: CurveSet,
        labels: Option<&LabelSet>,
        preselect: Option<&[String]>,
    ) -> Option<CurveSelector> {
        let tx = self.results_tx.clone();
        let on_result = move |kept, removed| {
            if tx.send((purpose, SelectionResult { kept, removed })).is_err() {
                log::warn!("curve selection result dropped: receiver gone");
            }
        };

        let options = match purpose {
            SelectorPurpose::Overlay => SelectorOptions::default(),
            SelectorPurpose::Import => SelectorOptions {
                id_salt: "import_selector".to_string(),
                title: "Import curves".to_string(),
                ..Default::default()
            },
        };

        match CurveSelector::new(curves, labels, preselect, options, on_result) {
            Ok(selector) => Some(selector),
            Err(e) => {
                log::error!("Cannot open curve selector: {e}");
                self.status_message = Some(format!("Error: {e}"));
                None
            }
        }
    }

    /// Open (or rebuild) the overlay tool over all pages with data.
    pub fn open_overlay(&mut self) {
        let (curves, labels) = self.overlay_curves();
        log::info!("opening overlay tool with {} curves", curves.len());
        let mut overlay = self.make_selector(SelectorPurpose::Overlay, curves, Some(&labels), None);
        if let Some(selector) = overlay.as_mut() {
            selector.set_enabled(!self.is_modal());
        }
        self.overlay = overlay;
    }

    pub fn close_overlay(&mut self) {
        if self.overlay.take().is_some() {
            log::debug!("overlay tool closed");
        }
        self.pending_removal = None;
    }

    /// Rebuild the overlay tool after the pages changed underneath it.
    fn on_pages_changed(&mut self) {
        if self.overlay_open() {
            log::debug!("pages changed, rebuilding overlay tool");
            self.open_overlay();
        }
    }

    /// Re-enable the overlay tool once nothing modal is left.
    fn release_overlay(&mut self) {
        let enabled = !self.is_modal();
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_enabled(enabled);
        }
    }

    /// Stage a loaded file and let the user pick which curves to import.
    /// An open overlay tool stays open but is disabled meanwhile.
    pub fn begin_import(&mut self, loaded: LoadedCurves) {
        self.import = None;
        let selector = self.make_selector(
            SelectorPurpose::Import,
            loaded.curves.clone(),
            loaded.labels.as_ref(),
            loaded.preselect.as_deref(),
        );
        self.import = selector.map(|selector| ImportSession { selector, loaded });
        self.release_overlay();
    }

    pub fn cancel_import(&mut self) {
        if self.import.take().is_some() {
            log::info!("import cancelled");
        }
        self.release_overlay();
    }

    // ---- Results ----

    /// Handle every selector result delivered since the last frame.
    pub fn process_results(&mut self) {
        while let Ok((purpose, result)) = self.results_rx.try_recv() {
            self.handle_result(purpose, result);
        }
    }

    fn handle_result(&mut self, purpose: SelectorPurpose, result: SelectionResult) {
        match purpose {
            SelectorPurpose::Import => self.finish_import(result),
            SelectorPurpose::Overlay => self.request_removal(result),
        }
    }

    fn finish_import(&mut self, result: SelectionResult) {
        let Some(ImportSession { mut loaded, .. }) = self.import.take() else {
            log::warn!("import result without a staged file, ignoring");
            return;
        };

        for key in &result.kept {
            let Some(curve) = loaded.curves.remove(key) else {
                continue;
            };
            let title = loaded
                .labels
                .as_ref()
                .and_then(|l| l.get(key))
                .filter(|t| !t.is_empty())
                .cloned()
                .unwrap_or_else(|| key.clone());
            self.add_page(title, Some(curve));
        }
        log::info!(
            "imported {} curves, skipped {}",
            result.kept.len(),
            result.removed.len()
        );
        self.status_message = None;
        if result.kept.is_empty() {
            self.release_overlay();
        } else {
            self.on_pages_changed();
        }
    }

    fn request_removal(&mut self, result: SelectionResult) {
        if self.overlay.is_none() {
            log::warn!("overlay result after the tool closed, ignoring");
            return;
        }
        if result.removed.is_empty() {
            self.close_overlay();
            return;
        }

        let mut message = String::from("The following pages will be removed:\n");
        for key in &result.removed {
            let title = self.page(key).map(|p| p.title.as_str()).unwrap_or_default();
            message.push_str(&format!("- {key} {title}\n"));
        }

        self.pending_removal = Some(PendingRemoval {
            keys: result.removed,
            message,
        });
        self.release_overlay();
    }

    /// User agreed: delete the pages and close the overlay tool.
    pub fn confirm_removal(&mut self) {
        let Some(pending) = self.pending_removal.take() else {
            return;
        };
        self.overlay = None;
        self.remove_pages(&pending.keys);
    }

    /// User declined: keep everything and return to the overlay tool.
    pub fn cancel_removal(&mut self) {
        self.pending_removal = None;
        self.release_overlay();
    }
}
