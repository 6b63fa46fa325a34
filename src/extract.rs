//! Axum integration
//!
//! [`Validated`] is a drop-in replacement for `Json<T>` in handlers that take
//! a schema record. Rejections use the proxy's usual error envelope:
//!
//! ```json
//! {"error": {"type": "invalid_request_error", "message": "...", "details": [...]}}
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use gemini_schemas::extract::Validated;
//! use gemini_schemas::schemas::gemini::GeminiRequest;
//!
//! async fn generate_content(Validated(request): Validated<GeminiRequest>) -> impl IntoResponse {
//!     // request.generation_config already has defaults applied
//! }
//! ```

use crate::defaults::GenerationDefaults;
use crate::errors::ValidationError;
use crate::schemas::{Schema, Validator};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::warn;

/// A JSON request body validated against schema `T`.
///
/// Defaults for generation parameters come from the router state, which must
/// provide a [`GenerationDefaults`] through `FromRef`.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    T: Schema,
    S: Send + Sync,
    GenerationDefaults: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(json_rejection_response)?;

        let validator = Validator::new(GenerationDefaults::from_ref(state));
        match validator.parse::<T>(value) {
            Ok(record) => Ok(Validated(record)),
            Err(e) => {
                warn!(model = T::NAME, issues = e.issues.len(), "Rejected request body");
                Err(e.into_response())
            }
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let details = json!(self.issues);
        error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request_error",
            &self.to_string(),
            details,
        )
    }
}

fn json_rejection_response(err: JsonRejection) -> Response {
    warn!(error = %err, "Unreadable JSON body");
    error_response(
        err.status(),
        "invalid_request_error",
        &err.body_text(),
        json!([]),
    )
}

fn error_response(status: StatusCode, error_type: &str, message: &str, details: Value) -> Response {
    let body = json!({
        "error": {
            "type": error_type,
            "message": message,
            "details": details
        }
    });

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FieldIssue, FieldPath};
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_validation_error_response() {
        let error = ValidationError {
            model: "VerifySelectedKeysRequest",
            issues: vec![FieldIssue::missing(FieldPath::root().field("keys"))],
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(
            body["error"]["details"],
            json!([{"path": "keys", "expected": "field to be present"}])
        );
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("keys: required field is missing")
        );
    }
}
