use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

/// All errors a prediction request can end in.
#[derive(Debug)]
pub enum ServiceError {
    /// The artifact failed to load at startup.
    ModelUnavailable,
    /// Coercing the payload, building the row or running the model failed.
    FeatureProcessing(anyhow::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelUnavailable => write!(f, "Model not loaded on server."),
            Self::FeatureProcessing(_) => write!(f, "Feature processing failed"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FeatureProcessing(e) => Some(&**e),
            Self::ModelUnavailable => None,
        }
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(e: anyhow::Error) -> Self {
        Self::FeatureProcessing(e)
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::ModelUnavailable => json!({ "error": self.to_string() }),
            Self::FeatureProcessing(e) => json!({
                "error": self.to_string(),
                "details": format!("{e:#}"),
                "traceback": format!("{e:?}"),
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use anyhow::anyhow;
    use serde_json::Value;

    use super::*;

    async fn body_of(err: ServiceError) -> Value {
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_rt::test]
    async fn unavailable_body_has_only_error() {
        let body = body_of(ServiceError::ModelUnavailable).await;
        assert_eq!(body, json!({ "error": "Model not loaded on server." }));
    }

    #[actix_rt::test]
    async fn processing_body_carries_details_and_trace() {
        let err = anyhow!("shape mismatch for features: got 3, expected 8")
            .context("model rejected the feature row");

        let body = body_of(ServiceError::from(err)).await;

        assert_eq!(body["error"], "Feature processing failed");
        assert_eq!(
            body["details"],
            "model rejected the feature row: shape mismatch for features: got 3, expected 8"
        );
        let trace = body["traceback"].as_str().unwrap();
        assert!(trace.contains("Caused by"));
        assert!(trace.contains("got 3, expected 8"));
    }
}
