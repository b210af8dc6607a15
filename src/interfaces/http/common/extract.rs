//! Request extractors
//!
//! - `JsonBody<T>`: `axum::Json<T>` with the rejection rendered as an
//!   enveloped 400.
//! - `PathParam<T>`: `axum::extract::Path<T>`, same treatment.
//! - `ValidatedForm<T>`: `axum::Form<T>` that additionally runs
//!   `validator::Validate::validate()`; failures become a 422 with the
//!   offending fields listed.

use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;
use crate::domain::FieldError;

pub struct JsonBody<T>(pub T);

pub struct PathParam<T>(pub T);

/// Validated `application/x-www-form-urlencoded` body.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct Credentials {
///     #[validate(length(min = 1, max = 50))]
///     username: String,
/// }
///
/// async fn handler(ValidatedForm(body): ValidatedForm<Credentials>) {
///     // `body` is guaranteed to pass validation
/// }
/// ```
pub struct ValidatedForm<T>(pub T);

/// Error type for extraction failures.
pub enum RequestRejection {
    Json(JsonRejection),
    Path(PathRejection),
    Form(FormRejection),
    Validation(ValidationErrors),
}

/// Flatten validator output into field errors, ordered by field name.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

impl IntoResponse for RequestRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection.body_text()));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Path(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid path: {}", rejection.body_text()));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Form(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid form: {}", rejection.body_text()));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Validation(errors) => {
                let body = ApiResponse::<()>::invalid("Validation failed", field_errors(&errors));
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RequestRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(RequestRejection::Json)?;
        Ok(JsonBody(value))
    }
}

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RequestRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(RequestRejection::Path)?;
        Ok(PathParam(value))
    }
}

impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = RequestRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(RequestRejection::Form)?;
        value.validate().map_err(RequestRejection::Validation)?;
        Ok(ValidatedForm(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(min = 1, max = 10, message = "name is required"))]
        name: String,
        #[validate(range(min = 1, max = 100))]
        age: u32,
    }

    async fn json_handler(JsonBody(body): JsonBody<TestBody>) -> String {
        body.name
    }

    async fn form_handler(ValidatedForm(_body): ValidatedForm<TestBody>) -> &'static str {
        "ok"
    }

    async fn path_handler(PathParam(id): PathParam<i32>) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/json", post(json_handler))
            .route("/form", post(form_handler))
            .route("/items/{id}", axum::routing::get(path_handler))
    }

    async fn send(req: Request<Body>) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/json")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/form")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_of(resp: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn valid_body_returns_ok() {
        let resp = send(json_request(r#"{"name": "Alice", "age": 30}"#)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(form_request("name=Alice&age=30")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_json_returns_400() {
        let resp = send(json_request("not json")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_of(resp).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn validation_failure_returns_422_with_fields() {
        let resp = send(form_request("name=&age=0")).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json_of(resp).await;
        assert_eq!(body["fields"][0]["field"], "age");
        assert_eq!(body["fields"][1]["field"], "name");
        assert_eq!(body["fields"][1]["message"], "name is required");
    }

    #[tokio::test]
    async fn malformed_form_returns_400() {
        let resp = send(form_request("name=Alice&age=old")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_path_id_is_enveloped() {
        let get = |uri: &str| Request::get(uri).body(Body::empty()).unwrap();

        let resp = send(get("/items/7")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(get("/items/seven")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_of(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid path"));
    }
}
