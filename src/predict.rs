use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use anyhow::{anyhow, bail, Context};
use log::error;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::ServiceError,
    features::StudentProfile,
    loader::{LoadedModel, ModelState},
};

pub const SUCCESS_STATUS: &str = "Prediction successful";

/// Body of a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub predicted_score: f64,
    pub status: &'static str,
}

/// Scores a single payload against the loaded model.
///
/// # Errors
/// Returns `ServiceError::ModelUnavailable` without touching the payload if no
/// model was loaded, and `ServiceError::FeatureProcessing` if building the row
/// or running the model fails.
pub fn predict(state: &ModelState, payload: &Map<String, Value>) -> Result<Prediction, ServiceError> {
    let model = state.loaded().ok_or(ServiceError::ModelUnavailable)?;

    score(model, payload).map_err(|e| {
        error!("prediction error: {e:?}");
        ServiceError::FeatureProcessing(e)
    })
}

fn score(model: &LoadedModel, payload: &Map<String, Value>) -> anyhow::Result<Prediction> {
    let profile = StudentProfile::from_payload(payload)?;
    let raw = run_model(model, &profile)?;

    Ok(Prediction {
        predicted_score: to_stress_score(raw)?,
        status: SUCCESS_STATUS,
    })
}

/// Runs the model on the profile's row and returns its single output.
///
/// A panicking model is reported as an error instead of unwinding into the
/// server.
fn run_model(model: &LoadedModel, profile: &StudentProfile) -> anyhow::Result<f64> {
    let row = profile.to_row(model.feature_names());

    let preds = panic::catch_unwind(AssertUnwindSafe(|| model.model().predict(row.view())))
        .map_err(|payload| anyhow!("model panicked: {}", panic_message(&*payload)))?
        .context("model rejected the feature row")?;

    preds
        .first()
        .copied()
        .ok_or_else(|| anyhow!("model returned no predictions"))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Maps a raw model output onto the 0–100 stress scale.
///
/// Outputs up to `1.0` are read as fractions and multiplied by 100; larger
/// outputs are taken as already on the 0–100 scale. The result is clamped to
/// `[0, 100]` and rounded to 2 decimals.
///
/// # Errors
/// Returns an error if `raw` is NaN.
pub fn to_stress_score(raw: f64) -> anyhow::Result<f64> {
    if raw.is_nan() {
        bail!("model returned NaN");
    }

    let score = if raw <= 1.0 { raw * 100.0 } else { raw };
    Ok(round2(score.clamp(0.0, 100.0)))
}

/// Rounds to 2 decimals, ties to even on the exact binary value.
///
/// `{:.2}` formatting rounds the exact decimal expansion half-to-even, so
/// `2.125` becomes `2.12` while `2.375` becomes `2.38`.
fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}
