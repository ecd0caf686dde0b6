use eframe::egui::Ui;
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoint, PlotPoints};

use crate::color::rainbow_palette;
use crate::data::model::Curve;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Correlation plot (shared by the central panel and the selector preview)
// ---------------------------------------------------------------------------

/// Map a curve to plot coordinates. With `log_x` the lag time is plotted as
/// `log10(τ)` and points with τ ≤ 0 are dropped.
pub fn plot_points(curve: &Curve, log_x: bool) -> Vec<[f64; 2]> {
    if !log_x {
        return curve.points().collect();
    }
    curve
        .points()
        .filter(|p| p[0] > 0.0)
        .map(|[x, y]| [x.log10(), y])
        .collect()
}

/// Tick label for a `log10` axis: only whole decades are labelled.
fn decade_label(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("1e{}", value.round() as i64)
    } else {
        String::new()
    }
}

/// Draw `curves` as named lines, coloured along a rainbow in the given order.
pub fn correlation_plot(ui: &mut Ui, id: &str, curves: &[(&str, &Curve)], log_x: bool) {
    let colours = rainbow_palette(curves.len());

    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .x_axis_label("lag time τ [s]")
        .y_axis_label("G(τ)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if log_x {
        plot = plot
            .x_axis_formatter(|mark: GridMark, _range| decade_label(mark.value))
            .label_formatter(|name, value: &PlotPoint| {
                let tau = 10f64.powf(value.x);
                if name.is_empty() {
                    format!("τ = {tau:.3e} s\nG = {:.4}", value.y)
                } else {
                    format!("{name}\nτ = {tau:.3e} s\nG = {:.4}", value.y)
                }
            });
    }

    plot.show(ui, |plot_ui| {
        for ((name, curve), colour) in curves.iter().zip(colours) {
            let points: PlotPoints = plot_points(curve, log_x).into();
            let line = Line::new(points).name(*name).color(colour).width(1.0);
            plot_ui.line(line);
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the active page's curve in the central panel.
pub fn page_plot(ui: &mut Ui, state: &AppState) {
    let Some(page) = state.active_page() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to import curves  (File → Open…)");
        });
        return;
    };

    let Some(curve) = &page.curve else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(format!("Page {} has no experimental data.", page.key));
        });
        return;
    };

    let name = format!("{} {}", page.key, page.title);
    correlation_plot(ui, "page_plot", &[(name.as_str(), curve)], true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_axis_drops_non_positive_lag_times() {
        let curve = Curve::from_points(&[[0.0, 2.0], [1e-3, 1.5], [10.0, 1.0]]);
        let pts = plot_points(&curve, true);
        assert_eq!(pts.len(), 2);
        assert!((pts[0][0] + 3.0).abs() < 1e-12);
        assert!((pts[1][0] - 1.0).abs() < 1e-12);
        assert_eq!(plot_points(&curve, false).len(), 3);
    }

    #[test]
    fn only_decades_get_tick_labels() {
        assert_eq!(decade_label(-3.0), "1e-3");
        assert_eq!(decade_label(2.0), "1e2");
        assert_eq!(decade_label(0.5), "");
    }
}
