pub mod dataset;
pub mod selector;

pub use dataset::{City, GeoDataset, GeoError, SelectOption};
pub use selector::GeoSelector;
