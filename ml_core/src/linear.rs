use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{
    model::{check_rows, Regressor},
    ArtifactError, MlError,
};

/// An ordinary least-squares style model: `y = x · coefficients + intercept`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Linear {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_names_in: Option<Vec<String>>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl Linear {
    /// Creates a new linear model.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` if the model has no coefficients or the
    /// feature names disagree with the number of coefficients.
    pub fn new(
        coefficients: Vec<f64>,
        intercept: f64,
        feature_names_in: Option<Vec<String>>,
    ) -> Result<Self, ArtifactError> {
        let model = Self {
            feature_names_in,
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.coefficients.is_empty() {
            return Err(ArtifactError::Invalid("linear model has no coefficients".into()));
        }

        if let Some(names) = &self.feature_names_in {
            if names.len() != self.coefficients.len() {
                return Err(ArtifactError::Invalid(format!(
                    "{} feature names for {} coefficients",
                    names.len(),
                    self.coefficients.len()
                )));
            }
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid("linear model has non-finite weights".into()));
        }

        Ok(())
    }
}

impl Regressor for Linear {
    fn num_features(&self) -> usize {
        self.coefficients.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn predict(&self, rows: ArrayView2<f64>) -> Result<Array1<f64>, MlError> {
        check_rows(&rows, self.num_features())?;
        let coefficients = ArrayView1::from(self.coefficients.as_slice());
        Ok(rows.dot(&coefficients) + self.intercept)
    }
}
