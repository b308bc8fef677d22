use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use formcraft_core::AppError;

use crate::error::ApiError;

/// JSON body extractor whose rejections use the API error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(format!(
            "invalid request body: {}",
            rejection.body_text()
        )))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, StatusCode, header};
    use axum::response::IntoResponse;
    use formcraft_core::AppError;
    use serde_json::Value;

    use super::ApiJson;

    fn request(content_type: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/forms")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let body = request("application/json", "{\"title\":");
        let result = ApiJson::<Value>::from_request(body, &()).await;

        let Err(error) = result else { unreachable!() };
        assert!(matches!(error.0, AppError::Validation(_)));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_json_content_type_is_a_validation_error() {
        let result = ApiJson::<Value>::from_request(request("text/plain", "{}"), &()).await;

        let Err(error) = result else { unreachable!() };
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let body = request("application/json", "{\"title\":\"a\"}");
        let result = ApiJson::<Value>::from_request(body, &()).await;

        assert_eq!(
            result.ok().map(|ApiJson(value)| value["title"].clone()),
            Some(Value::from("a"))
        );
    }
}
