//! GUI module - on-screen figure window

mod app;

pub use app::FigureApp;
