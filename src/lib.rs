//! Birth-data intake, planet-position lookup and chart export for the
//! AstroLumina consultation site.

pub mod chart;
pub mod client;
pub mod config;
pub mod form;
pub mod geo;
pub mod models;
pub mod pdf;
pub mod server;
pub mod session;

pub use chart::{Chart, ChartRow};
pub use client::{AstroApiClient, ApiSettings, ReadingError, ReadingSource};
pub use config::Config;
pub use form::{prepare_submission, validate, FormErrors, FormField, SubmitBlocked, Submission};
pub use geo::{GeoDataset, GeoSelector};
pub use models::{
    BirthInput, Coordinates, DisplayInfo, PlanetPosition, ReadingRequest, ReadingResult,
};
pub use session::{Reading, ReadingSession, RequestState, SessionError, View};
