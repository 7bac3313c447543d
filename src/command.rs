use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use crate::charts::{create_visualizations, FigureConfig};
use crate::data::{load_and_explore, DatasetSource};
use crate::stats::{perform_data_analysis, OutputFormat};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Read the samples from this CSV file instead of the bundled iris dataset
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,
    /// Write the figure to this PNG file instead of opening a window
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
    /// Figure width in pixels
    #[arg(long, default_value_t = 1500, value_parser = clap::value_parser!(u32).range(200..))]
    width: u32,
    /// Figure height in pixels
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u32).range(200..))]
    height: u32,
    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,
}

impl CommandArgs {
    fn source(&self) -> DatasetSource {
        self.data
            .clone()
            .map_or(DatasetSource::Bundled, DatasetSource::File)
    }

    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    fn figure_config(&self) -> FigureConfig {
        FigureConfig {
            output: self.save.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();

    let Some(table) = load_and_explore(&args.source()) else {
        return Ok(());
    };

    perform_data_analysis(Some(&table), args.output_format())
        .context("analysis failed")?;
    create_visualizations(Some(&table), &args.figure_config())
        .context("visualization failed")?;
    Ok(())
}
