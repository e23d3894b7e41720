//! Request extractors that fail with [`ApiError`] instead of axum's
//! plain-text rejections.

use axum::async_trait;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON body extractor whose rejections render as `{ errorCode, message }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Order {
        #[serde(rename = "planType")]
        plan_type: String,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn rejection_body(req: Request) -> (StatusCode, serde_json::Value) {
        let err = ApiJson::<Order>::from_request(req, &()).await.unwrap_err();
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let ApiJson(order) = ApiJson::<Order>::from_request(json_request(r#"{"planType":"team"}"#), &())
            .await
            .unwrap();
        assert_eq!(order.plan_type, "team");
    }

    #[tokio::test]
    async fn syntax_error_renders_error_envelope() {
        let (status, body) = rejection_body(json_request("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorCode"], "VALIDATION_FAILED");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn wrong_field_type_is_a_validation_error() {
        let (status, body) = rejection_body(json_request(r#"{"planType":7}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorCode"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn missing_content_type_is_a_validation_error() {
        let req = axum::http::Request::builder()
            .method("POST")
            .body(Body::from(r#"{"planType":"team"}"#))
            .unwrap();
        let (status, body) = rejection_body(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorCode"], "VALIDATION_FAILED");
    }
}
