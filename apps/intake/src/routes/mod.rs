pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted document.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/parse", post(handlers::handle_parse))
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::pipeline::testing::{stub_pipeline, RecordingFeedbackStore};

    const BOUNDARY: &str = "intake-test-boundary";

    const RESUME: &str = "\
John Smith
john.smith@example.com | 555-234-5678

Summary
Backend engineer with eight years of experience.

Experience
Senior Engineer - Acme Corp
Built the ingestion platform.

Education
B.S. in Computer Science

Skills: Python, AWS, SQL
";

    fn app(max_concurrent: usize) -> Router {
        let pipeline = stub_pipeline(Arc::new(RecordingFeedbackStore::default()));
        build_router(AppState::new(pipeline, max_concurrent), 10 * 1024 * 1024)
    }

    fn multipart_request(field: &str, filename: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/parse")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(1)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "intake");
    }

    #[tokio::test]
    async fn test_parse_returns_pipeline_result() {
        let response = app(1)
            .oneshot(multipart_request("file", "John_Smith_Resume.txt", RESUME))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["stage"], "validation");
        assert_eq!(body["data"]["email"], "john.smith@example.com");
        assert_eq!(body["data"]["phone"], "(555) 234-5678");
    }

    #[tokio::test]
    async fn test_rejection_is_still_200() {
        let response = app(1)
            .oneshot(multipart_request("file", "notes.txt", "too short"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["stage"], "prefilter");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_missing_file_field_is_400() {
        let response = app(1)
            .oneshot(multipart_request("attachment", "cv.txt", RESUME))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_saturated_service_is_503() {
        let response = app(0)
            .oneshot(multipart_request("file", "John_Smith_Resume.txt", RESUME))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "SERVICE_BUSY");
    }
}
