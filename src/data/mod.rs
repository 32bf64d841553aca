//! Data module - CSV loading and the typed survey table

mod loader;
mod table;

pub use loader::DataLoader;
pub use table::PersonalityTable;
