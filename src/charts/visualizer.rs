//! Visualizer
//! Builds the figure for a table and either shows it on screen or writes it
//! to a PNG file.

use crate::charts::figure::Figure;
use crate::charts::renderer::{RenderError, StaticChartRenderer};
use crate::data::SampleTable;
use crate::gui::FigureApp;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualizeError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to open figure window: {0}")]
    Window(String),
}

/// Size and destination of the figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureConfig {
    /// Write a PNG here instead of opening a window.
    pub output: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            output: None,
            width: 1500,
            height: 1000,
        }
    }
}

/// Render the four-panel figure. Does nothing without a table.
pub fn create_visualizations(
    table: Option<&SampleTable>,
    config: &FigureConfig,
) -> Result<(), VisualizeError> {
    let Some(table) = table else {
        return Ok(());
    };

    let figure = Figure::from_table(table);
    match &config.output {
        Some(path) => StaticChartRenderer::save_png(&figure, path, config.width, config.height)?,
        None => {
            FigureApp::run(figure, config).map_err(|e| VisualizeError::Window(e.to_string()))?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_table_renders_nothing() {
        let path = std::env::temp_dir().join("iris_explorer_absent_table.png");
        let _ = std::fs::remove_file(&path);
        let config = FigureConfig {
            output: Some(path.clone()),
            ..FigureConfig::default()
        };

        assert!(create_visualizations(None, &config).is_ok());
        assert!(!path.exists());
    }

    #[test]
    fn test_saves_png_when_output_given() {
        let table = SampleTable::load(&crate::data::DatasetSource::Bundled).unwrap();
        let path = std::env::temp_dir().join("iris_explorer_visualize.png");
        let config = FigureConfig {
            output: Some(path.clone()),
            width: 500,
            height: 400,
        };

        create_visualizations(Some(&table), &config).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png).unwrap();
        assert_eq!((img.width(), img.height()), (500, 400));
    }

    #[test]
    fn test_default_size() {
        let config = FigureConfig::default();
        assert_eq!((config.width, config.height), (1500, 1000));
        assert!(config.output.is_none());
    }
}
