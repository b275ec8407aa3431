use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============ Footprint Models ============

/// Name reported when the text carries no detectable name.
pub const ANONYMOUS_NAME: &str = "Anonymous";
/// Location reported when the text carries no detectable location.
pub const UNSPECIFIED_LOCATION: &str = "Not specified";

/// Lower bound of every footprint metric.
pub const METRIC_MIN: f64 = 0.0;
/// Upper bound of every footprint metric.
pub const METRIC_MAX: f64 = 100.0;

/// Coarse three-tier classification of how much a footprint reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ExposureLevel {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "High")]
    High,
}

impl ExposureLevel {
    /// Wire representation, also used in the output schema enum.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExposureLevel::Low => "Low",
            ExposureLevel::Medium => "Medium",
            ExposureLevel::High => "High",
        }
    }

    pub fn all() -> [ExposureLevel; 3] {
        [ExposureLevel::Low, ExposureLevel::Medium, ExposureLevel::High]
    }
}

impl std::fmt::Display for ExposureLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity fields extracted from the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Name found in the text, "Anonymous" if not found.
    pub name: String,
    /// Professional role or occupation.
    pub role: String,
    /// General location, "Not specified" if not found.
    pub location: String,
}

/// The four radar metrics, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FootprintMetrics {
    /// How much career info is public.
    pub professional_density: f64,
    /// How connected the person seems.
    pub social_connectivity: f64,
    /// How active the person appears.
    pub activity_frequency: f64,
    /// General estimate of data protection.
    pub privacy_resilience: f64,
}

impl FootprintMetrics {
    pub fn uniform(value: f64) -> Self {
        Self {
            professional_density: value,
            social_connectivity: value,
            activity_frequency: value,
            privacy_resilience: value,
        }
    }

    /// Field names paired with values, in radar axis order.
    pub fn named_values(&self) -> [(&'static str, f64); 4] {
        [
            ("professionalDensity", self.professional_density),
            ("socialConnectivity", self.social_connectivity),
            ("activityFrequency", self.activity_frequency),
            ("privacyResilience", self.privacy_resilience),
        ]
    }

    /// Returns the first metric that is not a finite number in [0, 100].
    pub fn first_out_of_range(&self) -> Option<(&'static str, f64)> {
        self.named_values()
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < METRIC_MIN || *v > METRIC_MAX)
    }
}

/// A single digital-footprint assessment. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FootprintData {
    pub identity: Identity,
    /// Skills, interests, or tools mentioned.
    pub capabilities: Vec<String>,
    /// Patterns of behavior or active contributions mentioned.
    pub activity_signals: Vec<String>,
    /// Probable platforms the text came from. Open-ended, model-determined.
    pub detected_sources: Vec<String>,
    pub exposure_level: ExposureLevel,
    /// Why this exposure level was chosen.
    pub risk_reasoning: String,
    /// Actionable privacy improvement tips.
    pub tips: Vec<String>,
    pub metrics: FootprintMetrics,
}

impl FootprintData {
    /// Checks the invariants serde cannot express. Every field being present
    /// is already enforced by deserialization.
    pub fn validate(&self) -> Result<(), String> {
        if let Some((field, value)) = self.metrics.first_out_of_range() {
            return Err(format!(
                "metric {} = {} is outside [{}, {}]",
                field, value, METRIC_MIN, METRIC_MAX
            ));
        }
        Ok(())
    }
}

// ============ API Models ============

/// Body of `POST /api/v1/analyze` and `POST /api/v1/validate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Bio or public-profile excerpt to analyze.
    pub text: String,
}

/// Successful analysis envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub data: FootprintData,
    /// Radar chart of `data.metrics` as a standalone SVG document.
    pub chart_svg: String,
}

/// Input validation warning as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarningBody {
    /// "tooShort" or "tooLong".
    pub kind: String,
    pub message: String,
    /// Whether the warning prevents analysis.
    pub blocking: bool,
}

/// Result of `POST /api/v1/validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub char_count: usize,
    pub min_chars: usize,
    pub warning: Option<ValidationWarningBody>,
    pub can_analyze: bool,
}

/// Body of `POST /api/v1/chart`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub metrics: FootprintMetrics,
    /// Hex accent color, e.g. "#f87171". Defaults to the LOW exposure accent.
    pub accent_color: Option<String>,
    /// Width of the containing element in pixels.
    pub container_width: Option<u32>,
}

/// Body of `GET /api/v1/sample`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SampleResponse {
    pub text: String,
}
