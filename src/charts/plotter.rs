//! Chart Plotter Module
//! Draws the four panels interactively using egui_plot.

use crate::charts::figure::{BarPanel, HistogramPanel, PanelLabels, SeriesPanel};
use crate::charts::palette::{species_rgb, to_color32, HISTOGRAM_FILL};
use egui::{Color32, RichText, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

const BAR_WIDTH: f64 = 0.6;

/// Creates the interactive panels of the figure window.
pub struct ChartPlotter;

impl ChartPlotter {
    fn panel_title(ui: &mut egui::Ui, labels: &PanelLabels) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(labels.title).strong().size(14.0));
        });
    }

    /// One line per species, x = record index.
    pub fn draw_line_panel(ui: &mut egui::Ui, panel: &SeriesPanel, height: f32) {
        Self::panel_title(ui, &panel.labels);
        Plot::new("line_panel")
            .height(height)
            .allow_scroll(false)
            .x_axis_label(panel.labels.x_label)
            .y_axis_label(panel.labels.y_label)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for series in &panel.series {
                    let points: PlotPoints =
                        series.points.iter().map(|&(x, y)| [x, y]).collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(to_color32(species_rgb(series.species)))
                            .width(1.5)
                            .name(series.species.as_str()),
                    );
                }
            });
    }

    /// One bar per species, labelled on the x-axis.
    pub fn draw_bar_panel(ui: &mut egui::Ui, panel: &BarPanel, height: f32) {
        Self::panel_title(ui, &panel.labels);

        let names: Vec<String> = panel.bars.iter().map(|(s, _)| s.to_string()).collect();
        Plot::new("bar_panel")
            .height(height)
            .allow_scroll(false)
            .x_axis_label(panel.labels.x_label)
            .y_axis_label(panel.labels.y_label)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                names.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (i, (species, mean)) in panel.bars.iter().enumerate() {
                    let color = to_color32(species_rgb(*species));
                    let bar = Bar::new(i as f64, *mean)
                        .width(BAR_WIDTH)
                        .fill(color)
                        .name(species.as_str());
                    plot_ui.bar_chart(BarChart::new(vec![bar]).color(color));
                }
            });
    }

    /// Histogram bars with a visible border on every bin.
    pub fn draw_histogram_panel(ui: &mut egui::Ui, panel: &HistogramPanel, height: f32) {
        Self::panel_title(ui, &panel.labels);

        let fill = to_color32(HISTOGRAM_FILL);
        let bars: Vec<Bar> = panel
            .bins
            .iter()
            .map(|bin| {
                let center = (bin.range.start + bin.range.end) / 2.0;
                Bar::new(center, bin.count as f64)
                    .width(bin.range.end - bin.range.start)
                    .fill(fill)
                    .stroke(Stroke::new(1.0, Color32::BLACK))
            })
            .collect();

        Plot::new("histogram_panel")
            .height(height)
            .allow_scroll(false)
            .x_axis_label(panel.labels.x_label)
            .y_axis_label(panel.labels.y_label)
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(fill));
            });
    }

    /// Points colored by species.
    pub fn draw_scatter_panel(ui: &mut egui::Ui, panel: &SeriesPanel, height: f32) {
        Self::panel_title(ui, &panel.labels);
        Plot::new("scatter_panel")
            .height(height)
            .allow_scroll(false)
            .x_axis_label(panel.labels.x_label)
            .y_axis_label(panel.labels.y_label)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for series in &panel.series {
                    let points: PlotPoints =
                        series.points.iter().map(|&(x, y)| [x, y]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(3.0)
                            .color(to_color32(species_rgb(series.species)))
                            .name(series.species.as_str()),
                    );
                }
            });
    }
}
