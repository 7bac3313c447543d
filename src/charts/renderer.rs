//! Static Chart Renderer
//! Draws the 2×2 figure with plotters into an RGB buffer or a PNG file.
//!
//! Layout:
//! 1. Top left: sepal length per species in record order (line)
//! 2. Top right: mean petal length per species (bar)
//! 3. Bottom left: sepal width distribution (histogram)
//! 4. Bottom right: sepal length vs petal length (scatter)

use crate::charts::figure::{BarPanel, Figure, HistogramPanel, PanelLabels, SeriesPanel};
use crate::charts::palette::{species_rgb, to_plotters, HISTOGRAM_FILL};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 22);
const LABEL_FONT: (&str, u32) = ("sans-serif", 15);
const PANEL_MARGIN: u32 = 18;
const X_LABEL_AREA: u32 = 45;
const Y_LABEL_AREA: u32 = 60;

/// Fraction of the unit slot taken by a bar.
const BAR_WIDTH: f64 = 0.6;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image buffer has the wrong size for {0}x{1}")]
    Buffer(u32, u32),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Padded `(min, max)` over a set of values.
fn padded_range(values: impl Iterator<Item = f64>, pad_ratio: f64) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * pad_ratio).max(1e-3);
    (min - pad, max + pad)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the figure into a packed RGB buffer of `width * height * 3` bytes.
    pub fn render_rgb(figure: &Figure, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw_figure(&root, figure).map_err(|e| RenderError::Draw(e.to_string()))?;
            root.present().map_err(|e| RenderError::Draw(e.to_string()))?;
        }
        Ok(buffer)
    }

    /// Render the figure and save it as a PNG file.
    pub fn save_png(
        figure: &Figure,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let buffer = Self::render_rgb(figure, width, height)?;
        let img = image::RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Buffer(width, height))?;
        img.save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Saved figure to {}", path.display());
        Ok(())
    }

    /// Draw all four panels on an evenly split 2×2 area.
    pub fn draw_figure<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &Figure,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let panels = root.split_evenly((2, 2));
        Self::draw_line_panel(&panels[0], &figure.line)?;
        Self::draw_bar_panel(&panels[1], &figure.bar)?;
        Self::draw_histogram_panel(&panels[2], &figure.histogram)?;
        Self::draw_scatter_panel(&panels[3], &figure.scatter)?;
        Ok(())
    }

    fn draw_line_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        panel: &SeriesPanel,
    ) -> DrawResult<DB> {
        let all_points = || panel.series.iter().flat_map(|s| s.points.iter());
        let (x_min, x_max) = padded_range(all_points().map(|p| p.0), 0.02);
        let (y_min, y_max) = padded_range(all_points().map(|p| p.1), 0.05);

        let mut chart = Self::chart_builder(area, &panel.labels)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        Self::draw_mesh(&mut chart, &panel.labels)?;

        for series in &panel.series {
            let color = to_plotters(species_rgb(series.species));
            chart
                .draw_series(LineSeries::new(
                    series.points.iter().copied(),
                    color.stroke_width(2),
                ))?
                .label(series.species.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        Self::draw_legend(&mut chart)
    }

    fn draw_bar_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        panel: &BarPanel,
    ) -> DrawResult<DB> {
        let slots = panel.bars.len().max(1) as f64;
        let y_max = panel.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max) * 1.1;
        let names: Vec<&'static str> = panel.bars.iter().map(|(s, _)| s.as_str()).collect();

        let mut chart = Self::chart_builder(area, &panel.labels)
            .build_cartesian_2d(-0.5..slots - 0.5, 0.0..y_max.max(1.0))?;

        // Ticks fall on every half slot; only whole slots carry a name.
        let x_formatter = |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).map(|n| n.to_string()).unwrap_or_default()
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(panel.bars.len() * 2 + 1)
            .x_label_formatter(&x_formatter)
            .x_desc(panel.labels.x_label)
            .y_desc(panel.labels.y_label)
            .label_style(LABEL_FONT)
            .draw()?;

        chart.draw_series(panel.bars.iter().enumerate().map(|(i, (species, mean))| {
            let color = to_plotters(species_rgb(*species));
            let center = i as f64;
            Rectangle::new(
                [(center - BAR_WIDTH / 2.0, 0.0), (center + BAR_WIDTH / 2.0, *mean)],
                color.filled(),
            )
        }))?;
        Ok(())
    }

    fn draw_histogram_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        panel: &HistogramPanel,
    ) -> DrawResult<DB> {
        let (x_min, x_max) = match (panel.bins.first(), panel.bins.last()) {
            (Some(first), Some(last)) => (first.range.start, last.range.end),
            _ => (0.0, 1.0),
        };
        let y_max = panel.bins.iter().map(|b| b.count).max().unwrap_or(0) as f64 * 1.1;

        let mut chart = Self::chart_builder(area, &panel.labels)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max.max(1.0))?;
        Self::draw_mesh(&mut chart, &panel.labels)?;

        let fill = to_plotters(HISTOGRAM_FILL);
        chart.draw_series(panel.bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.range.start, 0.0), (bin.range.end, bin.count as f64)],
                fill.filled(),
            )
        }))?;
        // Bin edges
        chart.draw_series(panel.bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.range.start, 0.0), (bin.range.end, bin.count as f64)],
                BLACK.stroke_width(1),
            )
        }))?;
        Ok(())
    }

    fn draw_scatter_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        panel: &SeriesPanel,
    ) -> DrawResult<DB> {
        let all_points = || panel.series.iter().flat_map(|s| s.points.iter());
        let (x_min, x_max) = padded_range(all_points().map(|p| p.0), 0.05);
        let (y_min, y_max) = padded_range(all_points().map(|p| p.1), 0.05);

        let mut chart = Self::chart_builder(area, &panel.labels)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        Self::draw_mesh(&mut chart, &panel.labels)?;

        for series in &panel.series {
            let color = to_plotters(species_rgb(series.species));
            chart
                .draw_series(
                    series
                        .points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                )?
                .label(series.species.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
        }

        Self::draw_legend(&mut chart)
    }

    fn chart_builder<'a, 'b, DB: DrawingBackend>(
        area: &'a DrawingArea<DB, Shift>,
        labels: &PanelLabels,
    ) -> ChartBuilder<'a, 'b, DB> {
        let mut builder = ChartBuilder::on(area);
        builder
            .caption(labels.title, CAPTION_FONT)
            .margin(PANEL_MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA);
        builder
    }

    fn draw_mesh<'a, DB: DrawingBackend + 'a>(
        chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        labels: &PanelLabels,
    ) -> DrawResult<DB> {
        chart
            .configure_mesh()
            .x_desc(labels.x_label)
            .y_desc(labels.y_label)
            .label_style(LABEL_FONT)
            .draw()
    }

    fn draw_legend<'a, DB: DrawingBackend + 'a>(
        chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    ) -> DrawResult<DB> {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(LABEL_FONT)
            .draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DatasetSource, SampleTable};

    const WHITE_PIXEL: [u8; 3] = [255, 255, 255];

    fn iris_figure() -> Figure {
        let table = SampleTable::load(&DatasetSource::Bundled).unwrap();
        Figure::from_table(&table)
    }

    /// True when any pixel inside the given quadrant is not white.
    fn quadrant_has_ink(buffer: &[u8], width: u32, height: u32, col: u32, row: u32) -> bool {
        let (half_w, half_h) = (width / 2, height / 2);
        (row * half_h..(row + 1) * half_h).any(|y| {
            (col * half_w..(col + 1) * half_w).any(|x| {
                let offset = ((y * width + x) * 3) as usize;
                buffer[offset..offset + 3] != WHITE_PIXEL
            })
        })
    }

    #[test]
    fn test_render_rgb_fills_every_quadrant() {
        let (width, height) = (600, 400);
        let buffer = StaticChartRenderer::render_rgb(&iris_figure(), width, height).unwrap();
        assert_eq!(buffer.len(), (width * height * 3) as usize);
        for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert!(
                quadrant_has_ink(&buffer, width, height, col, row),
                "quadrant ({col}, {row}) is blank"
            );
        }
    }

    #[test]
    fn test_save_png_ignores_extension() {
        let dir = std::env::temp_dir();
        for name in ["iris_explorer_figure", "iris_explorer_figure.img"] {
            let path = dir.join(name);
            StaticChartRenderer::save_png(&iris_figure(), &path, 400, 300).unwrap();
            let bytes = std::fs::read(&path).unwrap();
            let _ = std::fs::remove_file(&path);

            assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
            let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
                .unwrap();
            assert_eq!((img.width(), img.height()), (400, 300));
        }
    }

    #[test]
    fn test_padded_range() {
        let (lo, hi) = padded_range([1.0, 3.0].into_iter(), 0.5);
        assert_eq!((lo, hi), (0.0, 4.0));
        assert_eq!(padded_range(std::iter::empty(), 0.1), (0.0, 1.0));
        let (lo, hi) = padded_range([2.0].into_iter(), 0.1);
        assert!(lo < 2.0 && hi > 2.0);
    }

    #[test]
    fn test_buffer_size_mismatch_is_reported() {
        let err = image::RgbImage::from_raw(4, 4, vec![0u8; 3])
            .ok_or(RenderError::Buffer(4, 4))
            .unwrap_err();
        assert_eq!(err.to_string(), "Image buffer has the wrong size for 4x4");
    }
}
