use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

use crate::{error::ServiceError, loader::ModelState, predict::predict};

/// Largest request body accepted; bigger bodies are answered with 413.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Registers the prediction endpoint. Expects `web::Data<ModelState>` in the app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/predict_stress_score")
            .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
            .route(web::post().to(predict_stress_score)),
    );
}

async fn predict_stress_score(
    state: web::Data<ModelState>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let payload = parse_payload(&body);
    let prediction = predict(&state, &payload)?;
    Ok(HttpResponse::Ok().json(prediction))
}

/// Parses the body as JSON regardless of content type; anything but an object is empty.
fn parse_payload(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_are_kept() {
        let payload = parse_payload(br#"{"age": 20, "gender": "male"}"#);
        assert_eq!(payload.len(), 2);
        assert_eq!(payload["age"], 20);
    }

    #[test]
    fn non_objects_are_empty() {
        let bodies: [&[u8]; 6] = [b"[1, 2, 3]", b"42", b"\"male\"", b"null", b"{not json", b""];
        for body in bodies {
            assert!(parse_payload(body).is_empty());
        }
    }
}
