use crate::config::Config;
use crate::models::{ExposureLevel, FootprintData};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Ways a single analysis call can fail.
///
/// Callers are expected to collapse all of these into one user-facing
/// "analysis failed" condition; the variants exist for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("no API key configured for the inference client")]
    MissingCredential,
    #[error("model returned no text")]
    EmptyResponse,
    #[error("model output does not match the footprint schema: {0}")]
    MalformedResponse(String),
    #[error("transport error: {0}")]
    TransportError(String),
}

/// Client for the hosted Gemini `generateContent` endpoint, constrained to
/// answer with a `FootprintData` JSON document.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Creates a new `GeminiClient`.
    ///
    /// No request timeout is configured; a hung call is bounded only by the
    /// transport's own defaults.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the Generative Language API, without trailing slash.
    /// * `api_key` - API key sent in the `x-goog-api-key` header.
    /// * `model` - Model name, e.g. `gemini-3-flash-preview`.
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, AnalysisError> {
        if api_key.trim().is_empty() {
            return Err(AnalysisError::MissingCredential);
        }

        let client = reqwest::Client::builder().build().map_err(|e| {
            AnalysisError::TransportError(format!("Failed to create Gemini client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AnalysisError> {
        Self::new(
            config.gemini_base_url.clone(),
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Analyzes a bio or profile excerpt.
    ///
    /// Issues exactly one request. Length checks are the caller's job.
    ///
    /// # Returns
    ///
    /// * `Result<FootprintData, AnalysisError>` - The validated footprint.
    pub async fn analyze(&self, text: &str) -> Result<FootprintData, AnalysisError> {
        let digest = input_digest(text);
        tracing::info!(
            "Requesting footprint analysis from {} (input {} chars, digest {})",
            self.model,
            text.chars().count(),
            digest
        );

        let body = build_request_body(text);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::TransportError(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("Gemini returned error {} for digest {}", status, digest);
            return Err(AnalysisError::TransportError(format!(
                "Gemini returned {}: {}",
                status, error_text
            )));
        }

        let envelope: GenerateContentResponse = response.json().await.map_err(|e| {
            AnalysisError::TransportError(format!("Failed to decode Gemini envelope: {}", e))
        })?;

        let text = response_text(&envelope).ok_or(AnalysisError::EmptyResponse)?;
        let data = parse_footprint(&text)?;

        tracing::info!(
            "✓ Footprint analysis complete for digest {}: exposure {}, {} sources",
            digest,
            data.exposure_level,
            data.detected_sources.len()
        );
        Ok(data)
    }
}

/// Joins the text parts of the first candidate. `None` when there is no
/// usable text at all.
fn response_text(envelope: &GenerateContentResponse) -> Option<String> {
    let content = envelope.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parses the model's text payload into a `FootprintData`.
///
/// No repair is attempted: a missing field, a wrong type, or a metric
/// outside [0, 100] is a `MalformedResponse`.
pub fn parse_footprint(text: &str) -> Result<FootprintData, AnalysisError> {
    let data: FootprintData = serde_json::from_str(text)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;
    data.validate().map_err(AnalysisError::MalformedResponse)?;
    Ok(data)
}

/// Short SHA-256 fingerprint of the user input, so logs can correlate
/// requests without recording the text itself.
pub fn input_digest(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    hex::encode(&hash[..8])
}

/// Instruction prompt with the user's text fenced in.
pub fn build_prompt(user_input: &str) -> String {
    format!(
        "Analyze the following public profile data or bio and extract a privacy footprint summary.\n\
         Focus only on publicly visible information.\n\
         Be objective and helpful.\n\
         Identify likely platforms this text came from (e.g. if it mentions 'connections' or 'endorsements', it's LinkedIn-like).\n\
         \n\
         Data to analyze:\n\
         ---\n\
         {}\n\
         ---",
        user_input
    )
}

/// Full `generateContent` request body.
pub fn build_request_body(user_input: &str) -> Value {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": build_prompt(user_input) }]
            }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": footprint_schema()
        }
    })
}

/// Output schema mirroring `FootprintData`. The descriptions steer the
/// model's extraction and are part of the contract.
pub fn footprint_schema() -> Value {
    let exposure_levels: Vec<&str> = ExposureLevel::all().iter().map(|l| l.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "identity": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING", "description": "Name found in text, 'Anonymous' if not found." },
                    "role": { "type": "STRING", "description": "Professional role or occupation." },
                    "location": { "type": "STRING", "description": "General location or 'Not specified'." }
                },
                "required": ["name", "role", "location"]
            },
            "capabilities": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Skills, interests, or tools mentioned."
            },
            "activitySignals": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Patterns of behavior or active contributions mentioned."
            },
            "detectedSources": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Probable sources or platforms detected in the text (e.g., LinkedIn, GitHub, X/Twitter, Personal Portfolio)."
            },
            "exposureLevel": {
                "type": "STRING",
                "enum": exposure_levels,
                "description": "Overall privacy exposure level."
            },
            "riskReasoning": {
                "type": "STRING",
                "description": "Clear explanation of why this exposure level was chosen."
            },
            "tips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Actionable privacy improvement tips."
            },
            "metrics": {
                "type": "OBJECT",
                "properties": {
                    "professionalDensity": { "type": "NUMBER", "description": "How much career info is public (0-100)." },
                    "socialConnectivity": { "type": "NUMBER", "description": "How connected the person seems (0-100)." },
                    "activityFrequency": { "type": "NUMBER", "description": "How active the person appears (0-100)." },
                    "privacyResilience": { "type": "NUMBER", "description": "General estimate of data protection (0-100)." }
                },
                "required": ["professionalDensity", "socialConnectivity", "activityFrequency", "privacyResilience"]
            }
        },
        "required": [
            "identity",
            "capabilities",
            "activitySignals",
            "detectedSources",
            "exposureLevel",
            "riskReasoning",
            "tips",
            "metrics"
        ]
    })
}
