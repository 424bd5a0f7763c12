mod artifact;
mod error;
mod forest;
mod linear;
mod model;

pub use artifact::ModelArtifact;
pub use error::{ArtifactError, MlError};
pub use forest::{Forest, Tree};
pub use linear::Linear;
pub use model::Regressor;
