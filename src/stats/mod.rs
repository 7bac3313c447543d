//! Stats module - descriptive statistics, grouped means and correlation

mod calculator;
mod report;

pub use report::{perform_data_analysis, OutputFormat};
