//! Conversion of the untyped request payload into the model's input row.
//!
//! All lenient parsing lives here: [`StudentProfile::from_payload`] turns an
//! arbitrary JSON object into a fully-defaulted typed profile (failing only
//! on a `gender` that is set but isn't text), and
//! [`StudentProfile::to_row`] lays it out in the model's column order.

use std::fmt;

use ndarray::Array2;
use serde_json::{Map, Value};

/// Column order used in training, for models that don't record their own.
pub const FALLBACK_FEATURE_NAMES: [&str; 8] = [
    AGE,
    GENDER_ENCODED,
    STUDY_HOURS,
    SLEEP_DURATION,
    SOCIAL_MEDIA_USAGE,
    FINANCIAL_STRESS,
    ACADEMIC_PRESSURE,
    PHYSICAL_EXERCISE,
];

const AGE: &str = "Age";
const GENDER_ENCODED: &str = "Gender_Encoded";
const STUDY_HOURS: &str = "Study_Hours_Day";
const SLEEP_DURATION: &str = "Sleep Duration (Hours per night)";
const SOCIAL_MEDIA_USAGE: &str = "Social Media Usage (Hours per day)";
const FINANCIAL_STRESS: &str = "Financial Stress";
const ACADEMIC_PRESSURE: &str = "Academic_Pressure";
const PHYSICAL_EXERCISE: &str = "Physical Exercise (Hours per week)";

/// Errors raised while reading a request payload.
#[derive(Debug)]
pub enum FeatureError {
    /// `gender` holds a non-empty value that isn't a string.
    GenderNotText(Value),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenderNotText(value) => write!(f, "gender must be a string, got {value}"),
        }
    }
}

impl std::error::Error for FeatureError {}

/// Gender as encoded at training time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    /// Reads a payload value. Strings other than a case-insensitive
    /// "female"/"male" are `Other`, and so are absent or empty values
    /// (`null`, `false`, `0`, `""`, `[]`, `{}`).
    ///
    /// # Errors
    /// Returns `FeatureError::GenderNotText` for any other non-string value.
    fn from_value(value: Option<&Value>) -> Result<Self, FeatureError> {
        let raw = match value {
            Some(Value::String(s)) => s.to_lowercase(),
            Some(v) if !is_empty_value(v) => return Err(FeatureError::GenderNotText(v.clone())),
            _ => return Ok(Self::Other),
        };

        Ok(match raw.as_str() {
            "female" => Self::Female,
            "male" => Self::Male,
            _ => Self::Other,
        })
    }

    /// The integer code the model was trained with.
    pub fn code(self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
            Self::Other => 2,
        }
    }
}

/// A student's attributes with every missing or unusable field defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub age: f64,
    pub sleep_hours: f64,
    pub study_hours: f64,
    pub screen_time: f64,
    pub exercise_frequency: f64,
    pub academic_pressure: f64,
    pub financial_pressure: f64,
    pub gender: Gender,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            age: 0.0,
            sleep_hours: 0.0,
            study_hours: 0.0,
            screen_time: 0.0,
            exercise_frequency: 0.0,
            academic_pressure: 0.0,
            financial_pressure: 0.0,
            gender: Gender::Other,
        }
    }
}

impl StudentProfile {
    /// Builds a profile from a request payload.
    ///
    /// Numeric fields never fail; they default to `0.0`.
    ///
    /// # Errors
    /// Returns `FeatureError::GenderNotText` if `gender` is set to a non-empty,
    /// non-string value.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, FeatureError> {
        let num = |key: &str| coerce_f64(payload.get(key));

        Ok(Self {
            age: num("age"),
            sleep_hours: num("sleepHours"),
            study_hours: num("studyHours"),
            screen_time: num("screenTime"),
            exercise_frequency: num("exerciseFrequency"),
            academic_pressure: num("academicPressure"),
            financial_pressure: num("financialPressure"),
            gender: Gender::from_value(payload.get("gender"))?,
        })
    }

    /// Returns the value of a training column, or `None` for unknown columns.
    pub fn feature(&self, name: &str) -> Option<f64> {
        let value = match name {
            AGE => self.age,
            GENDER_ENCODED => f64::from(self.gender.code()),
            STUDY_HOURS => self.study_hours,
            SLEEP_DURATION => self.sleep_hours,
            SOCIAL_MEDIA_USAGE => self.screen_time,
            FINANCIAL_STRESS => self.financial_pressure,
            ACADEMIC_PRESSURE => self.academic_pressure,
            PHYSICAL_EXERCISE => self.exercise_frequency,
            _ => return None,
        };

        Some(value)
    }

    /// Lays the profile out as a single `1 x feature_names.len()` row.
    ///
    /// Columns the profile doesn't know are filled with `0.0`.
    pub fn to_row(&self, feature_names: &[String]) -> Array2<f64> {
        Array2::from_shape_fn((1, feature_names.len()), |(_, col)| {
            self.feature(&feature_names[col]).unwrap_or(0.0)
        })
    }
}

/// Values that count as "not provided": null, false, zero and empty containers.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Lenient numeric coercion: numbers pass through, numeric strings are parsed,
/// booleans become 1/0, and everything else (including `""`) is `0.0`.
fn coerce_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}
