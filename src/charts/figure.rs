//! Figure Model
//! Plain data for the four panels, shared by the on-screen viewer and the
//! static PNG renderer.

use crate::charts::palette::SPECIES_COLORS;
use crate::data::{Feature, SampleTable, Species};
use std::ops::Range;

/// Number of bins in the sepal-width histogram.
pub const HISTOGRAM_BINS: usize = 15;

/// Title and axis descriptions of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLabels {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

/// Points of one species.
#[derive(Debug, Clone)]
pub struct SpeciesSeries {
    pub species: Species,
    pub points: Vec<(f64, f64)>,
}

/// Line or scatter panel: one series per species.
#[derive(Debug, Clone)]
pub struct SeriesPanel {
    pub labels: PanelLabels,
    pub series: Vec<SpeciesSeries>,
}

#[derive(Debug, Clone)]
pub struct BarPanel {
    pub labels: PanelLabels,
    pub bars: Vec<(Species, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub range: Range<f64>,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct HistogramPanel {
    pub labels: PanelLabels,
    pub bins: Vec<HistogramBin>,
}

/// The complete 2×2 figure.
#[derive(Debug, Clone)]
pub struct Figure {
    pub line: SeriesPanel,
    pub bar: BarPanel,
    pub histogram: HistogramPanel,
    pub scatter: SeriesPanel,
}

impl Figure {
    pub fn from_table(table: &SampleTable) -> Self {
        Self {
            line: line_panel(table),
            bar: bar_panel(table),
            histogram: HistogramPanel {
                labels: PanelLabels {
                    title: "Distribution of Sepal Width",
                    x_label: Feature::SepalWidth.axis_label(),
                    y_label: "Frequency",
                },
                bins: equal_width_bins(table.feature(Feature::SepalWidth), HISTOGRAM_BINS),
            },
            scatter: scatter_panel(table),
        }
    }
}

/// Sepal length against record index, one line per species in first-seen
/// order.
fn line_panel(table: &SampleTable) -> SeriesPanel {
    let series = table
        .species_in_order()
        .into_iter()
        .map(|species| SpeciesSeries {
            species,
            points: table
                .indexed_values_for(Feature::SepalLength, species)
                .into_iter()
                .map(|(i, v)| (i as f64, v))
                .collect(),
        })
        .collect();

    SeriesPanel {
        labels: PanelLabels {
            title: "Sepal Length by Species (Index Order)",
            x_label: "Sample Index",
            y_label: Feature::SepalLength.axis_label(),
        },
        series,
    }
}

/// Mean petal length per species, alphabetical.
fn bar_panel(table: &SampleTable) -> BarPanel {
    let bars = Species::ALL
        .into_iter()
        .filter_map(|species| {
            let values = table.values_for(Feature::PetalLength, species);
            if values.is_empty() {
                return None;
            }
            Some((species, values.iter().sum::<f64>() / values.len() as f64))
        })
        .collect();

    BarPanel {
        labels: PanelLabels {
            title: "Average Petal Length by Species",
            x_label: "Species",
            y_label: Feature::PetalLength.axis_label(),
        },
        bars,
    }
}

/// Sepal length against petal length, one series per entry of the color
/// mapping.
fn scatter_panel(table: &SampleTable) -> SeriesPanel {
    let series = SPECIES_COLORS
        .iter()
        .map(|(species, _)| {
            let xs = table.values_for(Feature::SepalLength, *species);
            let ys = table.values_for(Feature::PetalLength, *species);
            SpeciesSeries {
                species: *species,
                points: xs.into_iter().zip(ys).collect(),
            }
        })
        .filter(|series| !series.points.is_empty())
        .collect();

    SeriesPanel {
        labels: PanelLabels {
            title: "Sepal Length vs Petal Length",
            x_label: Feature::SepalLength.axis_label(),
            y_label: Feature::PetalLength.axis_label(),
        },
        series,
    }
}

/// Split `[min, max]` into `num_bins` equal-width bins. Every bin is
/// half-open except the last, which also counts values equal to `max`.
pub fn equal_width_bins(values: &[f64], num_bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || num_bins == 0 {
        return Vec::new();
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max - min < f64::EPSILON {
        min -= 0.5;
        max += 0.5;
    }
    let span = max - min;

    // Recompute each edge from `min` to avoid accumulated rounding.
    let edge = |i: usize| {
        if i == num_bins {
            max
        } else {
            min + span * i as f64 / num_bins as f64
        }
    };
    let mut bins: Vec<HistogramBin> = (0..num_bins)
        .map(|i| HistogramBin {
            range: edge(i)..edge(i + 1),
            count: 0,
        })
        .collect();

    for &value in values {
        let mut idx = (((value - min) / span) * num_bins as f64) as usize;
        idx = idx.min(num_bins - 1);
        // Correct for rounding right at an edge.
        if idx > 0 && value < bins[idx].range.start {
            idx -= 1;
        } else if idx + 1 < num_bins && value >= bins[idx].range.end {
            idx += 1;
        }
        bins[idx].count += 1;
    }
    bins
}
