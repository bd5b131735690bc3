use crate::store::ConfidenceSummary;
use eframe::egui;
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Plot};
use graph_engine::ConfidenceStats;

const PLOT_HEIGHT: f32 = 180.0;

pub fn summary_grid(ui: &mut egui::Ui, id: &str, summary: &ConfidenceSummary) {
    let stats = &summary.stats;
    let rows = [
        ("Mean", stats.mean),
        ("Median", stats.median),
        ("Mode", stats.mode),
        ("Std dev", stats.std_dev),
        ("Q1", stats.quartiles.q1),
        ("Q3", stats.quartiles.q3),
        ("IQR", stats.iqr()),
        ("Min", stats.min),
        ("Max", stats.max),
    ];

    egui::Grid::new(id)
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for (name, value) in rows {
                ui.label(name);
                ui.label(format!("{value:.3}"));
                ui.end_row();
            }
            ui.label("Outliers");
            ui.label(summary.outliers.to_string());
            ui.end_row();
            ui.label(format!("Beyond {}σ", summary.sigmas));
            ui.label(summary.significant.to_string());
            ui.end_row();
        });
}

/// Tukey whiskers: the fences, pulled in to the most extreme data.
fn whiskers(stats: &ConfidenceStats) -> (f64, f64) {
    let (lower, upper) = stats.quartiles.fences();
    (lower.max(stats.min), upper.min(stats.max))
}

fn box_elem(x: f64, name: &str, stats: &ConfidenceStats) -> BoxElem {
    let (lower, upper) = whiskers(stats);
    BoxElem::new(
        x,
        BoxSpread::new(
            lower,
            stats.quartiles.q1,
            stats.median,
            stats.quartiles.q3,
            upper,
        ),
    )
    .name(name)
    .box_width(0.5)
}

/// Side-by-side box plots of all confidences and of the visible ones.
pub fn confidence_box_plot(
    ui: &mut egui::Ui,
    all: Option<&ConfidenceSummary>,
    visible: Option<&ConfidenceSummary>,
) {
    let mut boxes = Vec::new();
    if let Some(summary) = all {
        boxes.push(box_elem(0.0, "all", &summary.stats));
    }
    if let Some(summary) = visible {
        boxes.push(box_elem(1.0, "visible", &summary.stats));
    }

    Plot::new("confidence_box_plot")
        .height(PLOT_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .include_y(0.0)
        .include_y(1.0)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new("confidence", boxes));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whiskers_stop_at_data() {
        let stats =
            ConfidenceStats::from_values(&[0.2, 0.4, 0.5, 0.6, 0.8]).unwrap();
        // q1 0.4, q3 0.6, fences 0.1 and 0.9
        assert_eq!(whiskers(&stats), (0.2, 0.8));

        let skewed = ConfidenceStats::from_values(&[
            0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.95,
        ])
        .unwrap();
        assert_eq!(whiskers(&skewed), (0.5, 0.5));
    }
}
