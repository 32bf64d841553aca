//! Charts module - Chart rendering

mod plotter;
mod renderer;
mod series;

pub use plotter::ChartPlotter;
pub use renderer::{StaticChartRenderer, EXPORT_SIZE};
pub use series::BarSeries;
