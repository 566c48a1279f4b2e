//! Request body extractors.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Body extractor accepting either JSON or an urlencoded form.
///
/// The dashboard script posts JSON while plain HTML forms post
/// `application/x-www-form-urlencoded`; both reach the same handler.
/// Anything that is not declared as JSON is parsed as a form. A body that
/// does not decode is a validation error on the `body` field.
///
/// Handlers that must check the session, the target and its access policy
/// first take `Result<JsonOrForm<T>, AppError>` and apply `?` afterwards.
pub struct JsonOrForm<T>(pub T);

fn undecodable(detail: String) -> AppError {
    AppError::Validation {
        field: "body".to_string(),
        message: detail,
    }
}

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| undecodable(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| undecodable(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Note {
        text: String,
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_json() {
        let JsonOrForm(note) =
            JsonOrForm::<Note>::from_request(request("application/json", r#"{"text":"hi"}"#), &())
                .await
                .unwrap();

        assert_eq!(note.text, "hi");
    }

    #[tokio::test]
    async fn test_accepts_form() {
        let JsonOrForm(note) = JsonOrForm::<Note>::from_request(
            request("application/x-www-form-urlencoded", "text=ol%C3%A1+mundo"),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(note.text, "olá mundo");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let result =
            JsonOrForm::<Note>::from_request(request("application/json", "{not json"), &()).await;

        assert!(matches!(
            result,
            Err(AppError::Validation { ref field, .. }) if field == "body"
        ));
    }

    #[tokio::test]
    async fn test_wrongly_typed_json_is_validation_error() {
        let result =
            JsonOrForm::<Note>::from_request(request("application/json", r#"{"text":5}"#), &())
                .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
