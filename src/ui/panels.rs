use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – page list
// ---------------------------------------------------------------------------

/// Render the list of notebook pages.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Pages");
    ui.separator();

    if state.pages.is_empty() {
        ui.label("No pages yet.");
        return;
    }

    let mut clicked = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, page) in state.pages.iter().enumerate() {
                let mut text = RichText::new(format!("{} {}", page.key, page.title));
                if page.curve.is_none() {
                    text = text.weak().italics();
                }
                if ui.selectable_label(state.active == Some(i), text).clicked() {
                    clicked = Some(i);
                }
            }
        });

    if let Some(i) = clicked {
        state.active = Some(i);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.menu_button("Tools", |ui: &mut Ui| {
            let mut overlay = state.overlay_open();
            if ui
                .checkbox(&mut overlay, "Overlay tool")
                .on_hover_text("Select experimental curves.")
                .changed()
            {
                if overlay {
                    state.open_overlay();
                } else {
                    state.close_overlay();
                }
                ui.close_menu();
            }
        });

        ui.separator();

        let with_data = state.pages.iter().filter(|p| p.curve.is_some()).count();
        ui.label(format!(
            "{} pages, {} with data",
            state.pages.len(),
            with_data
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Removal confirmation
// ---------------------------------------------------------------------------

/// Warning window shown before the overlay tool deletes pages.
pub fn removal_dialog(ctx: &egui::Context, state: &mut AppState) {
    let Some(pending) = &state.pending_removal else {
        return;
    };
    let message = pending.message.clone();

    let mut confirmed = None;
    egui::Window::new("Warning")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(message);
            ui.add_space(8.0);
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    confirmed = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    confirmed = Some(false);
                }
            });
        });

    match confirmed {
        Some(true) => state.confirm_removal(),
        Some(false) => state.cancel_removal(),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open correlation curves")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(loaded) => {
                log::info!("Loaded {} curves from {}", loaded.curves.len(), path.display());
                state.begin_import(loaded);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
