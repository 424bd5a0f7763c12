use ndarray::{Array1, ArrayView2};

use crate::MlError;

/// A trained regression model ready for inference.
///
/// A `Regressor` maps rows of numeric features to one scalar prediction per
/// row. It does not:
/// - know what the columns mean,
/// - rescale or clamp its outputs,
/// - mutate itself after construction.
///
/// Implementations are shared read-only across request threads.
pub trait Regressor: Send + Sync {
    /// Returns the number of columns each input row must have.
    fn num_features(&self) -> usize;

    /// Returns the column names recorded at training time, if any.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Predicts one value per row of `rows`.
    ///
    /// # Errors
    /// Returns `MlError` if invariants are violated (e.g., shape mismatch).
    fn predict(&self, rows: ArrayView2<f64>) -> Result<Array1<f64>, MlError>;
}

/// Checks that `rows` is non-empty, has `expected` columns and only finite values.
///
/// # Errors
/// Returns `MlError::ShapeMismatch` or `MlError::InvalidInput` on violation.
pub(crate) fn check_rows(rows: &ArrayView2<f64>, expected: usize) -> Result<(), MlError> {
    if rows.nrows() == 0 {
        return Err(MlError::InvalidInput("no rows to predict"));
    }

    if rows.ncols() != expected {
        return Err(MlError::ShapeMismatch {
            what: "features",
            got: rows.ncols(),
            expected,
        });
    }

    if rows.iter().any(|v| !v.is_finite()) {
        return Err(MlError::InvalidInput("feature values must be finite"));
    }

    Ok(())
}
