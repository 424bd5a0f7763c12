use std::{fs, path::Path};

use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{forest::Forest, linear::Linear, ArtifactError, MlError, Regressor};

/// A trained model as exported to disk at training time.
///
/// The JSON form is tagged by `kind`:
/// `{"kind": "linear", "coefficients": [...], "intercept": ...}` or
/// `{"kind": "tree_ensemble", "n_features": ..., "trees": [...]}`, both with an
/// optional `feature_names_in` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(Linear),
    TreeEnsemble(Forest),
}

impl ModelArtifact {
    /// Reads and validates an artifact from `path`.
    ///
    /// # Errors
    /// Returns an `ArtifactError` if the file can't be read, isn't a known
    /// model kind, or describes an unusable model.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Parses and validates an artifact from its JSON text.
    ///
    /// # Errors
    /// Returns an `ArtifactError` if the text isn't a valid artifact.
    pub fn from_json(content: &str) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_str(content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            Self::Linear(model) => model.validate(),
            Self::TreeEnsemble(model) => model.validate(),
        }
    }

    /// Short human-readable name of the model kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    fn inner(&self) -> &dyn Regressor {
        match self {
            Self::Linear(model) => model,
            Self::TreeEnsemble(model) => model,
        }
    }
}

impl Regressor for ModelArtifact {
    fn num_features(&self) -> usize {
        self.inner().num_features()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.inner().feature_names()
    }

    fn predict(&self, rows: ArrayView2<f64>) -> Result<Array1<f64>, MlError> {
        self.inner().predict(rows)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn loads_linear_artifact_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.json");
        fs::write(
            &path,
            r#"{"kind":"linear","coefficients":[0.5,0.5],"intercept":0.1}"#,
        )
        .unwrap();

        let artifact = ModelArtifact::load(&path).unwrap();

        assert_eq!(artifact.kind(), "linear");
        assert_eq!(artifact.num_features(), 2);
        assert!(artifact.feature_names().is_none());
        let y = artifact.predict(array![[1.0, 1.0]].view()).unwrap();
        assert!((y[0] - 1.1).abs() < 1e-12);
    }

    #[test]
    fn exposes_recorded_feature_names() {
        let artifact = ModelArtifact::from_json(
            r#"{
                "kind": "tree_ensemble",
                "feature_names_in": ["a", "b"],
                "n_features": 2,
                "trees": [{
                    "children_left": [-1],
                    "children_right": [-1],
                    "feature": [-2],
                    "threshold": [-2.0],
                    "value": [0.7]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(artifact.kind(), "tree_ensemble");
        assert_eq!(
            artifact.feature_names(),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        let y = artifact.predict(array![[3.0, 4.0]].view()).unwrap();
        assert_eq!(y[0], 0.7);
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ModelArtifact::load(tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    #[test]
    fn unknown_kind_is_parse_error() {
        let err = ModelArtifact::from_json(r#"{"kind":"svm","support":[]}"#).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse(_)));
    }

    #[test]
    fn garbage_is_parse_error() {
        let err = ModelArtifact::from_json("\u{80}PICKLE").unwrap_err();
        assert!(matches!(err, ArtifactError::Parse(_)));
    }

    #[test]
    fn structurally_invalid_model_is_rejected() {
        let err = ModelArtifact::from_json(
            r#"{"kind":"linear","coefficients":[1.0],"intercept":0.0,"feature_names_in":["a","b"]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }
}
