use std::path::Path;

use log::{error, info, warn};
use ml_core::{ModelArtifact, Regressor};

use crate::features::FALLBACK_FEATURE_NAMES;

/// A model ready to serve, together with the column order it was trained on.
pub struct LoadedModel {
    model: Box<dyn Regressor>,
    feature_names: Vec<String>,
}

impl LoadedModel {
    /// Wraps `model`, adopting its recorded feature names or the fallback order.
    pub fn new(model: impl Regressor + 'static) -> Self {
        let feature_names = match model.feature_names() {
            Some(names) => {
                info!("model feature names detected: {names:?}");
                names.to_vec()
            }
            None => {
                warn!("model records no feature names; using fallback feature list");
                FALLBACK_FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
            }
        };

        if feature_names.len() != model.num_features() {
            warn!(
                "model expects {} features but {} feature names are in use",
                model.num_features(),
                feature_names.len()
            );
        }

        Self {
            model: Box::new(model),
            feature_names,
        }
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    /// The exact column order rows must follow.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

/// The outcome of the one-time startup load.
pub enum ModelState {
    Ready(LoadedModel),
    Unavailable,
}

impl ModelState {
    /// Loads the artifact at `path`.
    ///
    /// Failures are logged and yield `ModelState::Unavailable` so the service
    /// can still start and report the missing model per request.
    pub fn load(path: &Path) -> Self {
        info!("loading model from {}", path.display());

        match ModelArtifact::load(path) {
            Ok(artifact) => {
                info!("{} model loaded successfully", artifact.kind());
                Self::Ready(LoadedModel::new(artifact))
            }
            Err(e) => {
                error!("error loading model: {e}");
                Self::Unavailable
            }
        }
    }

    /// Returns the loaded model, if any.
    pub fn loaded(&self) -> Option<&LoadedModel> {
        match self {
            Self::Ready(model) => Some(model),
            Self::Unavailable => None,
        }
    }
}

impl From<LoadedModel> for ModelState {
    fn from(model: LoadedModel) -> Self {
        Self::Ready(model)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const EIGHT_COEFS: &str = "[1.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0]";

    #[test]
    fn missing_artifact_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let state = ModelState::load(&tmp.path().join("student_stress_model.json"));
        assert!(state.loaded().is_none());
    }

    #[test]
    fn corrupt_artifact_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.json");
        fs::write(&path, "not a model").unwrap();

        assert!(ModelState::load(&path).loaded().is_none());
    }

    #[test]
    fn falls_back_to_canonical_feature_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.json");
        let json = format!(r#"{{"kind":"linear","coefficients":{EIGHT_COEFS},"intercept":0.0}}"#);
        fs::write(&path, json).unwrap();

        let state = ModelState::load(&path);
        let model = state.loaded().unwrap();

        assert_eq!(model.feature_names(), FALLBACK_FEATURE_NAMES);
        assert_eq!(model.model().num_features(), 8);
    }

    #[test]
    fn adopts_recorded_feature_names() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.json");
        fs::write(
            &path,
            r#"{"kind":"linear","feature_names_in":["Academic_Pressure","Age"],
                "coefficients":[1.0,2.0],"intercept":0.0}"#,
        )
        .unwrap();

        let state = ModelState::load(&path);
        let model = state.loaded().unwrap();

        assert_eq!(model.feature_names(), ["Academic_Pressure", "Age"]);
    }
}
