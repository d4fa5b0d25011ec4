//! Request body extractors.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Extractor that accepts the same payload as either JSON or an HTML form.
///
/// The menu management endpoints serve both browsers (form posts) and
/// scripted clients (JSON). Handlers inspect which variant arrived to
/// decide between a redirect and a JSON reply.
#[derive(Debug)]
pub enum JsonOrForm<T> {
    Json(T),
    Form(T),
}

impl<T> JsonOrForm<T> {
    /// Whether the payload arrived as JSON.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    /// Unwrap the payload regardless of how it arrived.
    pub fn into_inner(self) -> T {
        match self {
            Self::Json(payload) | Self::Form(payload) => payload,
        }
    }
}

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        // Charset suffixes are allowed, e.g. "application/json; charset=utf-8"
        if content_type.starts_with("application/json") {
            let Json(payload) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self::Json(payload));
        }

        let Form(payload) = Form::<T>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self::Form(payload))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct TestPayload {
        name: String,
    }

    #[tokio::test]
    async fn test_json_content_type_parses_as_json() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Dosa"}"#))
            .unwrap();

        let body = JsonOrForm::<TestPayload>::from_request(req, &())
            .await
            .unwrap();
        assert!(body.is_json());
        assert_eq!(body.into_inner().name, "Dosa");
    }

    #[tokio::test]
    async fn test_json_with_charset_parses_as_json() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::from(r#"{"name":"Dosa"}"#))
            .unwrap();

        let body = JsonOrForm::<TestPayload>::from_request(req, &())
            .await
            .unwrap();
        assert!(body.is_json());
    }

    #[tokio::test]
    async fn test_form_content_type_parses_as_form() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=Dosa"))
            .unwrap();

        let body = JsonOrForm::<TestPayload>::from_request(req, &())
            .await
            .unwrap();
        assert!(!body.is_json());
        assert_eq!(body.into_inner().name, "Dosa");
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        assert!(
            JsonOrForm::<TestPayload>::from_request(req, &())
                .await
                .is_err()
        );
    }
}
