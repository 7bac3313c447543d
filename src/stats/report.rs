//! Analysis Report Module
//! Gathers the computed statistics into one report and prints it as text
//! tables or JSON.

use crate::data::{Feature, SampleTable};
use crate::stats::calculator::{CorrelationMatrix, FeatureSummary, GroupMeans, StatsCalculator};
use polars::prelude::PolarsError;
use serde::Serialize;
use std::fmt::{self, Write as _};
use thiserror::Error;

/// Observations about the reference dataset, reported verbatim.
pub const FINDINGS: [&str; 3] = [
    "Setosa has significantly smaller petal dimensions compared to other species",
    "Versicolor and virginica have more overlap in their measurements",
    "Sepal length and width have the weakest correlation among the features",
];

/// Width of every numeric column in the text tables.
const CELL_WIDTH: usize = 20;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Grouped aggregation failed: {0}")]
    Aggregation(#[from] PolarsError),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the analysis is written to standard output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything the analyzer computes for one table.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: Vec<FeatureSummary>,
    pub grouped_means: Vec<GroupMeans>,
    pub correlation: CorrelationMatrix,
    pub findings: [&'static str; 3],
}

impl AnalysisReport {
    pub fn compute(table: &SampleTable) -> Result<Self, AnalysisError> {
        let report = Self {
            summary: StatsCalculator::describe(table),
            grouped_means: StatsCalculator::grouped_means(table)?,
            correlation: StatsCalculator::correlation_matrix(table),
            findings: FINDINGS,
        };
        log::debug!(
            "Computed {} summaries and {} species groups",
            report.summary.len(),
            report.grouped_means.len()
        );
        Ok(report)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn write_header(out: &mut String, label_width: usize) {
    let _ = write!(out, "{:<label_width$}", "");
    for feature in Feature::ALL {
        let _ = write!(out, "{:>CELL_WIDTH$}", feature.column_name());
    }
    let _ = writeln!(out);
}

fn write_row(
    out: &mut String,
    label: &str,
    label_width: usize,
    values: impl Iterator<Item = f64>,
) {
    let _ = write!(out, "{label:<label_width$}");
    for value in values {
        let _ = write!(out, "{value:>CELL_WIDTH$.6}");
    }
    let _ = writeln!(out);
}

/// Table with one row per statistic and one column per feature.
pub fn format_summary(summary: &[FeatureSummary]) -> String {
    type Pick = fn(&FeatureSummary) -> f64;
    let rows: [(&str, Pick); 8] = [
        ("count", |s| s.count as f64),
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.median),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ];

    let mut out = String::new();
    write_header(&mut out, 8);
    for (label, pick) in rows {
        write_row(&mut out, label, 8, summary.iter().map(pick));
    }
    out
}

/// Table with one row per species and one column per feature.
pub fn format_grouped_means(rows: &[GroupMeans]) -> String {
    let mut out = String::new();
    write_header(&mut out, 12);
    for row in rows {
        let means = Feature::ALL.iter().map(|&feature| row.mean(feature));
        write_row(&mut out, row.species.as_str(), 12, means);
    }
    out
}

/// Square matrix labelled by feature on both axes.
pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    write_header(&mut out, CELL_WIDTH);
    for &a in &matrix.features {
        let row = matrix.features.iter().map(|&b| matrix.get(a, b));
        write_row(&mut out, a.column_name(), CELL_WIDTH, row);
    }
    out
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Basic statistics for numerical columns:")?;
        writeln!(f, "{}", format_summary(&self.summary))?;
        writeln!(f, "Mean values by species:")?;
        writeln!(f, "{}", format_grouped_means(&self.grouped_means))?;
        writeln!(f, "Correlation matrix:")?;
        writeln!(f, "{}", format_correlation(&self.correlation))?;
        writeln!(f, "Interesting findings:")?;
        for finding in &self.findings {
            writeln!(f, "- {finding}")?;
        }
        Ok(())
    }
}

/// Analyze the table and print the report. Does nothing without a table.
pub fn perform_data_analysis(
    table: Option<&SampleTable>,
    format: OutputFormat,
) -> Result<Option<AnalysisReport>, AnalysisError> {
    let Some(table) = table else {
        return Ok(None);
    };

    let report = AnalysisReport::compute(table)?;
    match format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(Some(report))
}
