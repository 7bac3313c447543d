//! Iris Explorer - Iris Dataset Statistics & Four-Panel Chart Figure
//!
//! Loads the iris dataset, prints descriptive statistics, and renders a
//! line, bar, histogram and scatter chart in one figure.

mod charts;
mod command;
mod data;
mod gui;
mod stats;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    command::run()
}
