use crate::dashboard;
use crate::errors::{AppError, ResultExt};
use crate::gemini_client::{input_digest, GeminiClient};
use crate::models::*;
use crate::radar;
use crate::session::{AnalysisSession, SAMPLE_BIO};
use crate::validation::{check_input, check_submission};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, OnceLock};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Client for the hosted model.
    pub gemini_client: GeminiClient,
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "footprint-lens",
            "version": env!("CARGO_PKG_VERSION"),
            "model": state.gemini_client.model(),
        })),
    )
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    pub sample: Option<String>,
}

/// GET /
///
/// Input form. `?sample=1` preloads the sample bio.
pub async fn index(Query(params): Query<IndexParams>) -> Html<String> {
    let mut session = AnalysisSession::new();
    if params.sample.is_some() {
        session.load_sample();
    }
    Html(dashboard::render_input_page(&session))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    pub text: String,
    /// Measured container width, filled in by the page script. Empty when
    /// scripting is off.
    #[serde(default)]
    pub width: String,
    /// Set by the "Clear" button when the page script did not handle it.
    #[serde(default)]
    pub clear: Option<String>,
}

/// POST /analyze
///
/// Form submission from the input page. Re-renders the form with the
/// warning or error, or shows the results dashboard. The "Clear" button
/// posts here too and gets an empty form back.
pub async fn analyze_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AnalyzeForm>,
) -> Html<String> {
    let container_width = form.width.trim().parse::<u32>().ok();
    let mut session = AnalysisSession::with_input(form.text);

    if form.clear.is_some() {
        session.clear_input();
        return Html(dashboard::render_input_page(&session));
    }

    let ticket = match session.begin_analysis() {
        Ok(ticket) => ticket,
        Err(rejection) => {
            tracing::info!("Form submission refused: {:?}", rejection);
            return Html(dashboard::render_input_page(&session));
        }
    };

    let outcome = state.gemini_client.analyze(session.input()).await;
    session.complete(ticket, outcome);

    Html(dashboard::render_session(&session, container_width))
}

/// POST /api/v1/analyze
///
/// Analyzes a bio and returns the footprint plus a rendered radar chart.
/// Every upstream failure is reported with the same generic message.
#[utoipa::path(
    post,
    path = "/api/v1/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Footprint assessment", body = AnalyzeResponse),
        (status = 400, description = "Input is blank or shorter than 40 characters"),
        (status = 502, description = "The analysis failed")
    )
)]
pub async fn api_analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    check_submission(&request.text).map_err(|r| AppError::BadRequest(r.message()))?;

    let analysis_id = Uuid::new_v4();
    tracing::info!(
        "POST /api/v1/analyze - analysis {} (digest {})",
        analysis_id,
        input_digest(&request.text)
    );

    let data = state
        .gemini_client
        .analyze(&request.text)
        .await
        .with_context(|| format!("analysis {}", analysis_id))?;

    let theme = dashboard::exposure_theme(data.exposure_level);
    let chart_svg = radar::render(&data.metrics, theme.accent, radar::DEFAULT_CANVAS_SIZE);

    Ok(Json(AnalyzeResponse {
        analysis_id,
        analyzed_at: chrono::Utc::now(),
        data,
        chart_svg,
    }))
}

/// POST /api/v1/validate
///
/// Reports the validation state of a would-be input without analyzing it.
#[utoipa::path(
    post,
    path = "/api/v1/validate",
    request_body = AnalyzeRequest,
    responses((status = 200, description = "Validation state", body = ValidateResponse))
)]
pub async fn api_validate(Json(request): Json<AnalyzeRequest>) -> Json<ValidateResponse> {
    Json(check_input(&request.text).to_response(false))
}

fn is_hex_color(value: &str) -> bool {
    static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR
        .get_or_init(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap())
        .is_match(value)
}

/// POST /api/v1/chart
///
/// Renders a radar chart for arbitrary metrics as `image/svg+xml`.
#[utoipa::path(
    post,
    path = "/api/v1/chart",
    request_body = ChartRequest,
    responses(
        (status = 200, description = "SVG radar chart", content_type = "image/svg+xml", body = String),
        (status = 400, description = "Accent color is not a hex color")
    )
)]
pub async fn api_chart(Json(request): Json<ChartRequest>) -> Result<Response, AppError> {
    let accent = request
        .accent_color
        .unwrap_or_else(|| radar::LOW_ACCENT.to_string());
    if !is_hex_color(&accent) {
        return Err(AppError::BadRequest(format!(
            "accentColor must be a hex color like #34d399, got '{}'",
            accent
        )));
    }

    let size = request
        .container_width
        .map(radar::canvas_size)
        .unwrap_or(radar::DEFAULT_CANVAS_SIZE);
    let svg = radar::render(&request.metrics, &accent, size);

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

/// GET /api/v1/sample
#[utoipa::path(
    get,
    path = "/api/v1/sample",
    responses((status = 200, description = "Sample bio", body = SampleResponse))
)]
pub async fn api_sample() -> Json<SampleResponse> {
    Json(SampleResponse {
        text: SAMPLE_BIO.to_string(),
    })
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    tracing::debug!("No route for {}", uri.path());
    AppError::NotFound(format!("No route for {}", uri.path()))
}

#[derive(OpenApi)]
#[openapi(
    paths(api_analyze, api_validate, api_chart, api_sample),
    components(schemas(
        AnalyzeRequest,
        AnalyzeResponse,
        FootprintData,
        Identity,
        FootprintMetrics,
        ExposureLevel,
        ValidateResponse,
        ValidationWarningBody,
        ChartRequest,
        SampleResponse
    )),
    tags((name = "footprint-lens", description = "Digital footprint analysis"))
)]
pub struct ApiDoc;

/// Builds the full application router with middleware.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/analyze", post(analyze_form))
        .route("/api/v1/analyze", post(api_analyze))
        .route("/api/v1/validate", post(api_validate))
        .route("/api/v1/chart", post(api_chart))
        .route("/api/v1/sample", get(api_sample))
        .fallback(not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // 1 MiB request cap; a pasted bio is a few KB at most
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
