use eframe::egui;

use crate::state::AppState;
use crate::ui::selector::SelectorEvent;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CurvePickerApp {
    pub state: AppState,
}

impl eframe::App for CurvePickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Import and removal confirmation block the main window.
        let modal = self.state.is_modal();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_enabled_ui(!modal, |ui| panels::top_bar(ui, &mut self.state));
        });

        // ---- Left side panel: pages ----
        egui::SidePanel::left("page_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal, |ui| panels::side_panel(ui, &mut self.state));
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::page_plot(ui, &self.state);
        });

        // ---- Floating windows ----
        let event = self.state.overlay.as_mut().and_then(|overlay| overlay.show(ctx));
        match event {
            Some(SelectorEvent::Closed) => self.state.close_overlay(),
            Some(SelectorEvent::Applied) => ctx.request_repaint(),
            None => {}
        }

        let event = self
            .state
            .import
            .as_mut()
            .and_then(|import| import.selector.show(ctx));
        match event {
            Some(SelectorEvent::Closed) => self.state.cancel_import(),
            Some(SelectorEvent::Applied) => ctx.request_repaint(),
            None => {}
        }

        panels::removal_dialog(ctx, &mut self.state);

        self.state.process_results();
    }
}
