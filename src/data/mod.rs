//! Data module - dataset loading and the sample table model

mod loader;
mod table;

pub use loader::{load_and_explore, DatasetSource};
pub use table::{Feature, SampleTable, Species};
