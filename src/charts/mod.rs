//! Charts module - figure model and rendering

mod figure;
mod palette;
mod plotter;
mod renderer;
mod visualizer;

pub use figure::Figure;
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use visualizer::{create_visualizations, FigureConfig};
