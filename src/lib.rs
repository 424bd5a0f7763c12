pub mod config;
pub mod error;
pub mod features;
pub mod loader;
pub mod predict;
pub mod routes;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use loader::{LoadedModel, ModelState};
pub use predict::Prediction;
