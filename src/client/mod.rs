pub mod astro_api;
pub mod traits;
pub mod types;

pub use astro_api::{AstroApiClient, ReadingError};
pub use traits::ReadingSource;
pub use types::ApiSettings;
