//! Dataset Loader Module
//! Reads the iris CSV (bundled or from disk) with Polars, validates it into a
//! `SampleTable`, and prints the exploration reports.

use crate::data::table::{Feature, SampleTable, Species, SPECIES_COLUMN};
use polars::prelude::*;
use std::fmt;
use std::fmt::Write as _;
use std::io::Cursor;
use std::path::PathBuf;
use thiserror::Error;

/// Reference dataset compiled into the binary.
const BUNDLED_IRIS_CSV: &str = include_str!("../../data/iris.csv");

/// Number of records shown in the preview.
const PREVIEW_ROWS: usize = 5;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },
    #[error("Non-positive value {value} in column '{column}' at row {row}")]
    NonPositive {
        column: String,
        row: usize,
        value: f64,
    },
    #[error("Invalid number '{value}' in column '{column}' at row {row}")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },
    #[error("Column '{column}' has unsupported type {dtype}")]
    ColumnType { column: String, dtype: String },
    #[error("Unknown species '{label}' at row {row}")]
    UnknownSpecies { row: usize, label: String },
    #[error("No data loaded")]
    NoData,
}

/// Where the sample table is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatasetSource {
    /// The reference dataset embedded in the binary.
    #[default]
    Bundled,
    /// A CSV file with the reference header.
    File(PathBuf),
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Bundled => f.write_str("bundled iris dataset"),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl SampleTable {
    /// Load and validate the sample table from `source`.
    pub fn load(source: &DatasetSource) -> Result<Self, LoaderError> {
        match source {
            DatasetSource::Bundled => Self::from_csv_text(BUNDLED_IRIS_CSV),
            DatasetSource::File(path) => {
                let df = LazyCsvReader::new(path)
                    .with_has_header(true)
                    .with_infer_schema_length(Some(10000))
                    .finish()?
                    .collect()?;
                Self::from_frame(&df)
            }
        }
    }

    /// Validate an in-memory CSV document into a sample table.
    pub fn from_csv_text(text: &str) -> Result<Self, LoaderError> {
        Self::from_frame(&read_csv_text(text)?)
    }

    /// Validate a raw frame: required columns, no nulls, positive
    /// measurements, known labels, at least one record.
    fn from_frame(df: &DataFrame) -> Result<Self, LoaderError> {
        if df.height() == 0 {
            return Err(LoaderError::NoData);
        }

        let mut features: [Vec<f64>; 4] = Default::default();
        for feature in Feature::ALL {
            features[feature.index()] = read_feature(df, feature)?;
        }

        let labels = df
            .column(SPECIES_COLUMN)
            .map_err(|_| LoaderError::MissingColumn(SPECIES_COLUMN.to_string()))?;
        if labels.dtype() != &DataType::String {
            return Err(LoaderError::ColumnType {
                column: SPECIES_COLUMN.to_string(),
                dtype: labels.dtype().to_string(),
            });
        }
        let labels = labels.str()?;
        let mut species = Vec::with_capacity(labels.len());
        for (row, label) in labels.into_iter().enumerate() {
            let label = label.ok_or_else(|| LoaderError::MissingValue {
                column: SPECIES_COLUMN.to_string(),
                row,
            })?;
            let parsed = label
                .parse::<Species>()
                .map_err(|label| LoaderError::UnknownSpecies { row, label })?;
            species.push(parsed);
        }

        Ok(Self::from_validated(features, species)?)
    }
}

fn read_csv_text(text: &str) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
        .finish()
}

fn read_feature(df: &DataFrame, feature: Feature) -> Result<Vec<f64>, LoaderError> {
    let name = feature.column_name();
    let column = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
    let dtype = column.dtype();
    if dtype == &DataType::Null {
        return Err(LoaderError::MissingValue {
            column: name.to_string(),
            row: 0,
        });
    }
    if dtype == &DataType::String {
        return Err(invalid_number(name, column.str()?));
    }
    if !(dtype.is_float() || dtype.is_integer()) {
        return Err(LoaderError::ColumnType {
            column: name.to_string(),
            dtype: dtype.to_string(),
        });
    }
    let column = column.cast(&DataType::Float64)?;
    let values = column.f64()?;

    let mut out = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        let value = value.ok_or_else(|| LoaderError::MissingValue {
            column: name.to_string(),
            row,
        })?;
        if value.is_nan() || value <= 0.0 {
            return Err(LoaderError::NonPositive {
                column: name.to_string(),
                row,
                value,
            });
        }
        out.push(value);
    }
    Ok(out)
}

/// A measurement column read as text holds at least one cell that is not a
/// number. Report the first one.
fn invalid_number(name: &str, cells: &StringChunked) -> LoaderError {
    for (row, cell) in cells.into_iter().enumerate() {
        match cell {
            None => {
                return LoaderError::MissingValue {
                    column: name.to_string(),
                    row,
                }
            }
            Some(text) if text.trim().parse::<f64>().is_err() => {
                return LoaderError::InvalidNumber {
                    column: name.to_string(),
                    row,
                    value: text.to_string(),
                }
            }
            Some(_) => {}
        }
    }
    LoaderError::ColumnType {
        column: name.to_string(),
        dtype: DataType::String.to_string(),
    }
}

/// Null count per column, in column order.
pub fn missing_value_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count()))
        .collect()
}

/// Structural summary: entry range, then position, name, non-null count and
/// dtype per column.
pub fn structure_summary(df: &DataFrame) -> String {
    let height = df.height();
    let name_width = df
        .get_column_names()
        .iter()
        .map(|name| name.len())
        .max()
        .unwrap_or(0)
        .max("Column".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "RangeIndex: {height} entries, 0 to {}",
        height.saturating_sub(1)
    );
    let _ = writeln!(out, "Data columns (total {} columns):", df.width());
    let _ = writeln!(
        out,
        " #   {:<name_width$}  Non-Null Count  Dtype",
        "Column"
    );
    let _ = writeln!(
        out,
        "---  {:<name_width$}  --------------  -----",
        "------"
    );
    for (i, col) in df.get_columns().iter().enumerate() {
        let non_null = format!("{} non-null", col.len() - col.null_count());
        let _ = writeln!(
            out,
            " {i:<3} {:<name_width$}  {non_null:<14}  {}",
            col.name().as_str(),
            col.dtype()
        );
    }
    out
}

/// Load the sample table and print the preview, structure and missing-value
/// reports. Returns `None` (after printing a diagnostic) when loading fails.
pub fn load_and_explore(source: &DatasetSource) -> Option<SampleTable> {
    let table = match SampleTable::load(source) {
        Ok(table) => table,
        Err(e) => {
            log::error!("Failed to load dataset from {source}: {e}");
            println!("An error occurred while loading the data: {e}");
            return None;
        }
    };
    log::info!("Loaded {} records from {source}", table.len());

    println!("First {PREVIEW_ROWS} rows of the dataset:");
    println!("{}", table.frame().head(Some(PREVIEW_ROWS)));
    println!();

    println!("Dataset information:");
    print!("{}", structure_summary(table.frame()));
    println!();

    println!("Missing values per column:");
    let counts = missing_value_counts(table.frame());
    let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, count) in &counts {
        println!("{name:<width$}    {count}");
    }
    println!();

    Some(table)
}
