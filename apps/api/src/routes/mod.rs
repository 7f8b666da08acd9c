pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/test", get(health::test_handler))
        .route(
            "/api/analyze-resume",
            post(handlers::handle_analyze_resume),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::analysis::fixtures::MODEL_ANALYSIS_JSON;
    use crate::analysis::pipeline::tests::ScriptedBackend;
    use crate::config::Config;
    use crate::llm_client::CompletionBackend;

    const BOUNDARY: &str = "X-RESUME-BOUNDARY";

    const JANE_RESUME: &str = "Name: Jane Doe\nSKILLS\nPython, Go, Leadership\n\
        Senior engineer with ten years of experience designing payment platforms, \
        leading incident response, and mentoring a team of six backend developers.\n";

    fn app(llm: Option<Arc<dyn CompletionBackend>>) -> Router {
        build_router(AppState {
            llm,
            config: Config::default(),
        })
    }

    fn multipart_body(disposition: &str, content: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: text/plain\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze-resume")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn resume_upload(filename: &str, content: &[u8]) -> Request<Body> {
        let disposition = format!("form-data; name=\"resume\"; filename=\"{filename}\"");
        upload_request(multipart_body(&disposition, content))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn assert_analysis_shape(body: &Value) {
        for key in ["jobs", "skills", "improvements", "skillComparisons", "careerPath"] {
            assert!(body[key].is_array(), "{key} should be an array");
        }
        assert_eq!(body["careerPath"].as_array().unwrap().len(), 5);
        assert_eq!(body["industryMatch"].as_object().unwrap().len(), 6);
        assert_eq!(body["resumeScore"].as_object().unwrap().len(), 5);
        assert!(body["linkedinBio"].is_string());
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(None), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_api_test_endpoint() {
        let request = Request::get("/api/test").body(Body::empty()).unwrap();
        let (status, body) = send(app(None), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"message": "Server is working!"}));
    }

    #[tokio::test]
    async fn test_text_upload_without_credential_uses_fallback() {
        let request = resume_upload("jane.txt", JANE_RESUME.as_bytes());
        let (status, body) = send(app(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_analysis_shape(&body);
        assert_eq!(body["careerPath"][1]["title"], "Senior Developer");
        let skills: Vec<&str> = body["skills"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|s| s["name"].as_str())
            .collect();
        assert!(skills.contains(&"Python"));
    }

    #[tokio::test]
    async fn test_model_reply_is_returned() {
        let backend = ScriptedBackend::replying(format!("```json\n{MODEL_ANALYSIS_JSON}\n```"));
        let calls = backend.calls.clone();
        let request = resume_upload("jane.txt", JANE_RESUME.as_bytes());
        let (status, body) = send(app(Some(Arc::new(backend))), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(body["jobs"][0]["title"], "Staff Platform Engineer");
        assert_eq!(body["jobs"][0]["match"], 92);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_absorbed() {
        let request = resume_upload("jane.txt", JANE_RESUME.as_bytes());
        let backend: Arc<dyn CompletionBackend> = Arc::new(ScriptedBackend::failing());
        let (status, body) = send(app(Some(backend)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_analysis_shape(&body);
    }

    #[tokio::test]
    async fn test_unparsable_reply_is_absorbed() {
        let backend: Arc<dyn CompletionBackend> =
            Arc::new(ScriptedBackend::replying("<html>502 Bad Gateway</html>"));
        let request = resume_upload("jane.txt", JANE_RESUME.as_bytes());
        let (status, body) = send(app(Some(backend)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_analysis_shape(&body);
    }

    #[tokio::test]
    async fn test_binary_upload_is_analyzed_from_synthetic_text() {
        let binary: Vec<u8> = (0x80u8..0xB2).collect();
        let request = resume_upload("Jane Doe.pdf", &binary);
        let (status, body) = send(app(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_analysis_shape(&body);
        // The synthetic template mentions a "Senior Role".
        assert_eq!(body["careerPath"][1]["title"], "Senior Developer");
    }

    #[tokio::test]
    async fn test_missing_filename_is_400_and_skips_model() {
        let backend = ScriptedBackend::replying(MODEL_ANALYSIS_JSON);
        let calls = backend.calls.clone();
        let request = upload_request(multipart_body(
            "form-data; name=\"resume\"",
            JANE_RESUME.as_bytes(),
        ));
        let (status, body) = send(app(Some(Arc::new(backend))), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Malformed request");
        assert_eq!(body["message"], "no file uploaded");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_multipart_is_400() {
        let request = Request::post("/api/analyze-resume")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("expected multipart/form-data"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_400() {
        let request = Request::post("/api/analyze-resume")
            .body(Body::from("raw"))
            .unwrap();
        let (status, _) = send(app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let app = build_router(AppState {
            llm: None,
            config: Config {
                max_upload_bytes: 64,
                ..Config::default()
            },
        });
        let request = resume_upload("jane.txt", JANE_RESUME.as_bytes());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
