//! Figure Window
//! Shows the four panels in a 2x2 grid, with a toolbar to save the static
//! figure as PNG.

use crate::charts::{ChartPlotter, Figure, FigureConfig, StaticChartRenderer};
use egui::{CentralPanel, TopBottomPanel};

/// Vertical space reserved for each panel title.
const TITLE_HEIGHT: f32 = 28.0;

/// Window showing one figure.
pub struct FigureApp {
    figure: Figure,
    export_size: (u32, u32),
    status: String,
}

impl FigureApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        figure: Figure,
        export_size: (u32, u32),
    ) -> Self {
        Self {
            figure,
            export_size,
            status: String::new(),
        }
    }

    /// Open the window and block until it is closed.
    pub fn run(figure: Figure, config: &FigureConfig) -> eframe::Result<()> {
        let export_size = (config.width, config.height);
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([config.width as f32, config.height as f32])
                .with_min_inner_size([800.0, 600.0])
                .with_title("Iris Explorer"),
            ..Default::default()
        };

        eframe::run_native(
            "Iris Explorer",
            options,
            Box::new(move |cc| Ok(Box::new(FigureApp::new(cc, figure, export_size)))),
        )
    }

    /// Handle PNG export - render the static figure and open it.
    fn handle_save_png(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("iris_figure.png")
            .save_file()
        else {
            return; // User cancelled
        };

        let (width, height) = self.export_size;
        match StaticChartRenderer::save_png(&self.figure, &path, width, height) {
            Ok(()) => {
                self.status = format!("Saved {}", path.display());
                if let Err(e) = open::that(&path) {
                    log::warn!("Could not open {}: {e}", path.display());
                }
            }
            Err(e) => {
                log::error!("Failed to save figure: {e}");
                self.status = format!("Save error: {e}");
            }
        }
    }
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Save PNG…").clicked() {
                    self.handle_save_png();
                }
                if !self.status.is_empty() {
                    ui.label(&self.status);
                }
            });
        });

        CentralPanel::default().show(ctx, |ui| {
            let spacing = ui.spacing().item_spacing.y;
            let plot_height =
                ((ui.available_height() - 2.0 * TITLE_HEIGHT - 3.0 * spacing) / 2.0).max(120.0);
            let figure = &self.figure;

            ui.columns(2, |columns| {
                ChartPlotter::draw_line_panel(&mut columns[0], &figure.line, plot_height);
                ChartPlotter::draw_bar_panel(&mut columns[1], &figure.bar, plot_height);
            });
            ui.add_space(spacing);
            ui.columns(2, |columns| {
                ChartPlotter::draw_histogram_panel(
                    &mut columns[0],
                    &figure.histogram,
                    plot_height,
                );
                ChartPlotter::draw_scatter_panel(&mut columns[1], &figure.scatter, plot_height);
            });
        });
    }
}
