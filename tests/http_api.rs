/// Router-level tests: handlers, middleware and the mocked upstream together
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use footprint_lens::config::Config;
use footprint_lens::errors::ANALYSIS_FAILED_MESSAGE;
use footprint_lens::gemini_client::GeminiClient;
use footprint_lens::handlers::{app_router, AppState};
use footprint_lens::session::SAMPLE_BIO;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create test state pointing at the mock server
fn create_test_state(gemini_base_url: String) -> Arc<AppState> {
    let config = Config {
        port: 8080,
        gemini_api_key: "test_key".to_string(),
        gemini_base_url,
        gemini_model: "gemini-test".to_string(),
    };
    let gemini_client = GeminiClient::from_config(&config).unwrap();
    Arc::new(AppState { gemini_client })
}

fn footprint_envelope() -> Value {
    let footprint = json!({
        "identity": {"name": "Alex Rivera", "role": "Senior Cloud Architect", "location": "Seattle"},
        "capabilities": ["AWS", "Kubernetes"],
        "activitySignals": ["Regular speaker at CloudCon"],
        "detectedSources": ["LinkedIn"],
        "exposureLevel": "Medium",
        "riskReasoning": "Employer and city are public.",
        "tips": ["Hide your employer"],
        "metrics": {
            "professionalDensity": 85,
            "socialConnectivity": 60,
            "activityFrequency": 55,
            "privacyResilience": 35
        }
    });
    json!({"candidates": [{"content": {"parts": [{"text": footprint.to_string()}]}}]})
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_request(text: &str, width: &str) -> Request<Body> {
    let body = format!(
        "text={}&width={}",
        url::form_urlencoded::byte_serialize(text.as_bytes()).collect::<String>(),
        width
    );
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let mock_server = MockServer::start().await;
    let app = app_router(create_test_state(mock_server.uri()));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "gemini-test");
}

#[tokio::test]
async fn test_api_analyze_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(footprint_envelope()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_router(create_test_state(mock_server.uri()));
    let response = app
        .oneshot(json_request("/api/v1/analyze", json!({"text": SAMPLE_BIO})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["data"]["exposureLevel"], "Medium");
    assert_eq!(body["data"]["detectedSources"][0], "LinkedIn");
    assert!(body["analysisId"].is_string());
    assert!(body["analyzedAt"].is_string());
    let svg = body["chartSvg"].as_str().unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("rgba(251, 191, 36, 0.4)"));
}

#[tokio::test]
async fn test_api_analyze_short_input_never_reaches_upstream() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(footprint_envelope()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = app_router(create_test_state(mock_server.uri()));
    let response = app
        .oneshot(json_request("/api/v1/analyze", json!({"text": "Cloud architect"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        body["error"],
        "Please provide more detail. At least 40 characters are needed."
    );
}

#[tokio::test]
async fn test_api_analyze_failure_is_generic() {
    let mock_server = MockServer::start().await;
    // Response lacks every field but identity
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"identity\": {\"name\": \"x\", \"role\": \"y\", \"location\": \"z\"}}"}]}}]
        })))
        .mount(&mock_server)
        .await;

    let app = app_router(create_test_state(mock_server.uri()));
    let response = app
        .oneshot(json_request("/api/v1/analyze", json!({"text": SAMPLE_BIO})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, json!({"error": ANALYSIS_FAILED_MESSAGE}));
}

#[tokio::test]
async fn test_api_validate() {
    let mock_server = MockServer::start().await;
    let app = app_router(create_test_state(mock_server.uri()));

    let response = app
        .clone()
        .oneshot(json_request("/api/v1/validate", json!({"text": "short bio"})))
        .await
        .unwrap();
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["charCount"], 9);
    assert_eq!(body["canAnalyze"], false);
    assert_eq!(body["warning"]["kind"], "tooShort");
    assert!(body["warning"]["message"].as_str().unwrap().contains("9/40"));

    let long = "a".repeat(2500);
    let response = app
        .oneshot(json_request("/api/v1/validate", json!({"text": long})))
        .await
        .unwrap();
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["canAnalyze"], true);
    assert_eq!(body["warning"]["blocking"], false);
}

#[tokio::test]
async fn test_api_chart_returns_svg() {
    let mock_server = MockServer::start().await;
    let app = app_router(create_test_state(mock_server.uri()));

    let response = app
        .oneshot(json_request(
            "/api/v1/chart",
            json!({
                "metrics": {
                    "professionalDensity": 100,
                    "socialConnectivity": 100,
                    "activityFrequency": 100,
                    "privacyResilience": 100
                },
                "accentColor": "#f87171",
                "containerWidth": 1024
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );
    let svg = body_string(response).await;
    assert!(svg.contains("width=\"400\""));
    // All points on the outer ring (radius 150)
    assert!(svg.contains("M0.00,-150.00L150.00,0.00L0.00,150.00L-150.00,0.00Z"));
}

#[tokio::test]
async fn test_api_chart_rejects_bad_color() {
    let mock_server = MockServer::start().await;
    let app = app_router(create_test_state(mock_server.uri()));

    let response = app
        .oneshot(json_request(
            "/api/v1/chart",
            json!({
                "metrics": {
                    "professionalDensity": 1,
                    "socialConnectivity": 2,
                    "activityFrequency": 3,
                    "privacyResilience": 4
                },
                "accentColor": "javascript:alert(1)"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sample_endpoint() {
    let mock_server = MockServer::start().await;
    let app = app_router(create_test_state(mock_server.uri()));

    let response = app
        .oneshot(Request::get("/api/v1/sample").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["text"], SAMPLE_BIO);
}

#[tokio::test]
async fn test_index_with_sample_enables_button() {
    let mock_server = MockServer::start().await;
    let app = app_router(create_test_state(mock_server.uri()));

    let response = app
        .oneshot(Request::get("/?sample=1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("Alex Rivera | Senior Cloud Architect"));
    assert!(html.contains("<button type=\"submit\" data-visualize>Visualize</button>"));
}

#[tokio::test]
async fn test_form_flow_renders_dashboard() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(footprint_envelope()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_router(create_test_state(mock_server.uri()));
    let response = app.oneshot(form_request(SAMPLE_BIO, "500")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Moderate Exposure"));
    assert!(html.contains("Presence Metrics"));
    assert!(html.contains("width=\"400\""));
    assert!(html.contains("Analyze New Data"));
}

#[tokio::test]
async fn test_form_flow_failure_shows_generic_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let app = app_router(create_test_state(mock_server.uri()));
    let response = app.oneshot(form_request(SAMPLE_BIO, "")).await.unwrap();

    let html = body_string(response).await;
    assert!(html.contains(ANALYSIS_FAILED_MESSAGE));
    assert!(html.contains("<button type=\"submit\" data-visualize>Visualize</button>"));
}

#[tokio::test]
async fn test_form_short_text_shows_warning() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(footprint_envelope()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = app_router(create_test_state(mock_server.uri()));
    let response = app.oneshot(form_request("tiny", "")).await.unwrap();

    let html = body_string(response).await;
    assert!(html.contains("(4/40 chars)"));
    assert!(html.contains("At least 40 characters are needed."));
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let mock_server = MockServer::start().await;
    let app = app_router(create_test_state(mock_server.uri()));

    let response = app
        .oneshot(Request::get("/api/v1/nothing").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], "No route for /api/v1/nothing");
}

#[tokio::test]
async fn test_form_clear_returns_empty_form() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(footprint_envelope()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = app_router(create_test_state(mock_server.uri()));
    let body = format!(
        "text={}&width=&clear=1",
        url::form_urlencoded::byte_serialize(SAMPLE_BIO.as_bytes()).collect::<String>()
    );
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(!html.contains("Alex Rivera"));
    assert!(html.contains("0 CHRS"));
    assert!(html.contains("<button type=\"submit\" data-visualize disabled>Visualize</button>"));
}

#[tokio::test]
async fn test_results_chart_redraws_at_new_width() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(footprint_envelope()))
        .mount(&mock_server)
        .await;

    let app = app_router(create_test_state(mock_server.uri()));
    let html = body_string(
        app.clone()
            .oneshot(form_request(SAMPLE_BIO, "1000"))
            .await
            .unwrap(),
    )
    .await;
    assert!(html.contains("width=\"400\""));

    // What the page script sends after the container shrinks to 300px
    let marker = "data-metrics=\"";
    let start = html.find(marker).unwrap() + marker.len();
    let len = html[start..].find('"').unwrap();
    let metrics: Value =
        serde_json::from_str(&html[start..start + len].replace("&quot;", "\"")).unwrap();
    let response = app
        .oneshot(json_request(
            "/api/v1/chart",
            json!({"metrics": metrics, "accentColor": "#fbbf24", "containerWidth": 300}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let svg = body_string(response).await;
    assert!(svg.contains("width=\"260\""));
    assert!(svg.contains("rgba(251, 191, 36, 0.4)"));
}
