use eframe::egui::{self, Modifiers, RichText, ScrollArea, Ui};

use crate::data::model::{Curve, CurveSet, LabelSet};
use crate::data::selection::Selection;
use crate::error::SelectError;
use crate::ui::plot;

const INSTRUCTIONS: &str = "Select the curves to keep.\n\
    By holding down the 'Ctrl' key, single curves can be\n\
    selected or deselected. The 'Shift' key can be used\n\
    to select groups.";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Window defaults for the curve selector.
#[derive(Debug, Clone)]
pub struct SelectorOptions {
    /// Window id; two selectors open at once need different ones.
    pub id_salt: String,
    pub title: String,
    pub default_size: [f32; 2],
    /// Width of the list column on the left.
    pub list_width: f32,
    pub plot_height: f32,
    /// Plot the lag time on a logarithmic axis.
    pub log_x: bool,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            id_salt: "curve_selector".to_string(),
            title: "Curve selection".to_string(),
            default_size: [800.0, 500.0],
            list_width: 250.0,
            plot_height: 380.0,
            log_x: true,
        }
    }
}

/// What happened in the selector window this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorEvent {
    /// Apply was pressed and the result callback has run.
    Applied,
    /// The window's close button was pressed.
    Closed,
}

/// Receives `(kept, removed)` keys each time the user applies a selection.
pub type OnResult = Box<dyn FnMut(Vec<String>, Vec<String>)>;

// ---------------------------------------------------------------------------
// CurveSelector – egui adapter around `Selection`
// ---------------------------------------------------------------------------

/// Window letting the user choose which curves of a set to keep.
pub struct CurveSelector {
    curves: CurveSet,
    selection: Selection,
    /// Last plainly clicked or ctrl-clicked row, used for shift ranges.
    anchor: Option<usize>,
    enabled: bool,
    options: SelectorOptions,
    on_result: OnResult,
}

impl CurveSelector {
    /// Build a selector over `curves`. Fails when `labels` is given but lacks
    /// an entry for one of the keys.
    pub fn new<S: ToString>(
        curves: CurveSet,
        labels: Option<&LabelSet>,
        preselect: Option<&[S]>,
        options: SelectorOptions,
        on_result: impl FnMut(Vec<String>, Vec<String>) + 'static,
    ) -> Result<Self, SelectError> {
        let selection = Selection::new(&curves, labels, preselect)?;
        log::debug!(
            "curve selector over {} curves, {} preselected",
            selection.len(),
            selection.selected_count()
        );
        Ok(Self {
            curves,
            selection,
            anchor: None,
            enabled: true,
            options,
            on_result: Box::new(on_result),
        })
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Apply a click on row `index` the way an extended-selection list does.
    pub fn click(&mut self, index: usize, modifiers: Modifiers) {
        if modifiers.shift {
            let anchor = self.anchor.unwrap_or(index);
            self.selection.select_range(anchor, index);
        } else if modifiers.command {
            self.selection.toggle(index);
            self.anchor = Some(index);
        } else {
            self.selection.select_only(index);
            self.anchor = Some(index);
        }
    }

    /// Hand the kept/removed partition of the current selection to the callback.
    pub fn apply(&mut self) {
        let result = self.selection.result();
        log::info!(
            "curve selection applied: {} kept, {} removed",
            result.kept.len(),
            result.removed.len()
        );
        (self.on_result)(result.kept, result.removed);
    }

    /// Selected curves in display order, named by key.
    pub fn preview_curves(&self) -> Vec<(&str, &Curve)> {
        self.selection
            .selected_keys()
            .filter_map(|key| self.curves.get(key).map(|c| (key, c)))
            .collect()
    }

    /// Render the selector window.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<SelectorEvent> {
        let mut open = true;
        let mut event = None;

        egui::Window::new(self.options.title.as_str())
            .id(egui::Id::new(self.options.id_salt.as_str()))
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_size(self.options.default_size)
            .show(ctx, |ui: &mut Ui| {
                ui.label(INSTRUCTIONS);
                ui.separator();

                ui.horizontal_top(|ui: &mut Ui| {
                    ui.vertical(|ui: &mut Ui| {
                        ui.set_width(self.options.list_width);
                        if self.list_column(ui) {
                            event = Some(SelectorEvent::Applied);
                        }
                    });

                    ui.separator();

                    let size = egui::vec2(ui.available_width().max(200.0), self.options.plot_height);
                    let curves = self.preview_curves();
                    ui.allocate_ui(size, |ui: &mut Ui| {
                        plot::correlation_plot(ui, "selector_preview", &curves, self.options.log_x);
                    });
                });
            });

        if !open {
            log::debug!("curve selector closed");
            event = Some(SelectorEvent::Closed);
        }
        event
    }

    /// List, selection shortcuts and the Apply button. Returns true when
    /// Apply was pressed.
    fn list_column(&mut self, ui: &mut Ui) -> bool {
        let mut applied = false;

        if self.selection.is_empty() {
            ui.label(RichText::new("No curves available.").weak());
        }

        let interactive = self.enabled && !self.selection.is_empty();
        ui.add_enabled_ui(interactive, |ui: &mut Ui| {
            let mut clicked = None;
            ScrollArea::vertical()
                .id_salt("selector_list")
                .max_height(self.options.plot_height - 60.0)
                .auto_shrink([false, true])
                .show(ui, |ui: &mut Ui| {
                    for (i, label) in self.selection.labels().iter().enumerate() {
                        if ui
                            .selectable_label(self.selection.is_selected(i), label.as_str())
                            .clicked()
                        {
                            clicked = Some(i);
                        }
                    }
                });
            if let Some(i) = clicked {
                let modifiers = ui.input(|input| input.modifiers);
                self.click(i, modifiers);
            }

            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    self.selection.select_all();
                }
                if ui.small_button("None").clicked() {
                    self.selection.select_none();
                }
            });
        });

        ui.label(format!(
            "{} of {} selected",
            self.selection.selected_count(),
            self.selection.len()
        ));

        ui.add_enabled_ui(self.enabled, |ui: &mut Ui| {
            if ui.button("Apply").clicked() {
                self.apply();
                applied = true;
            }
        });

        applied
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Calls = Rc<RefCell<Vec<(Vec<String>, Vec<String>)>>>;

    fn selector(keys: &[&str], preselect: Option<&[&str]>) -> (CurveSelector, Calls) {
        let curves: CurveSet = keys
            .iter()
            .map(|k| (k.to_string(), Curve::from_points(&[[1e-6, 1.1], [1e-2, 1.0]])))
            .collect();
        let calls: Calls = Rc::default();
        let sink = Rc::clone(&calls);
        let sel = CurveSelector::new(
            curves,
            None,
            preselect,
            SelectorOptions::default(),
            move |kept, removed| sink.borrow_mut().push((kept, removed)),
        )
        .unwrap();
        (sel, calls)
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn apply_runs_callback_once_with_partition() {
        let (mut sel, calls) = selector(&["#1:", "#2:", "#3:"], Some(&["#2:", "#3:"][..]));
        sel.apply();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, strings(&["#2:", "#3:"]));
        assert_eq!(calls[0].1, strings(&["#1:"]));
    }

    #[test]
    fn full_selection_reports_nothing_removed() {
        let (mut sel, calls) = selector(&["#1:", "#2:"], None);
        sel.apply();
        assert!(calls.borrow()[0].1.is_empty());
    }

    #[test]
    fn clicks_follow_extended_list_rules() {
        let (mut sel, _) = selector(&["#1:", "#2:", "#3:", "#4:", "#5:"], None);
        let ctrl = Modifiers::COMMAND;
        let shift = Modifiers::SHIFT;

        sel.click(1, Modifiers::NONE);
        assert_eq!(sel.selection().selected_keys().collect::<Vec<_>>(), vec!["#2:"]);

        sel.click(3, shift);
        assert_eq!(
            sel.selection().selected_keys().collect::<Vec<_>>(),
            vec!["#2:", "#3:", "#4:"]
        );

        sel.click(2, ctrl);
        assert_eq!(sel.selection().selected_keys().collect::<Vec<_>>(), vec!["#2:", "#4:"]);

        // The ctrl-click moved the anchor to row 2.
        sel.click(4, shift);
        assert_eq!(
            sel.selection().selected_keys().collect::<Vec<_>>(),
            vec!["#3:", "#4:", "#5:"]
        );
    }

    #[test]
    fn preview_follows_selection() {
        let (mut sel, _) = selector(&["#10:", "#2:"], None);
        let names: Vec<&str> = sel.preview_curves().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, vec!["#2:", "#10:"]);

        sel.click(0, Modifiers::NONE);
        assert_eq!(sel.preview_curves().len(), 1);
    }

    #[test]
    fn missing_label_is_reported() {
        let curves: CurveSet = [("#1:".to_string(), Curve::from_points(&[[1.0, 1.0]]))].into();
        let labels = LabelSet::new();
        let err = CurveSelector::new::<&str>(
            curves,
            Some(&labels),
            None,
            SelectorOptions::default(),
            |_, _| {},
        )
        .err();
        assert_eq!(err, Some(SelectError::MissingLabel { key: "#1:".into() }));
    }
}
