//! Wire types for the cover-letter backend.
//!
//! Field names are the HTTP contract; the backend pairs on them exactly.
//! Renaming a field here breaks the service, so changes must be coordinated.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

/// Body of `POST /generate`. The two custom prompt overrides are attached
/// only by the custom-prompt test flow and are omitted from the JSON
/// entirely when unset.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub resume: String,
    pub job_description: String,
    pub company_name: String,
    pub hiring_manager: String,
    pub special_requirements: String,
    pub use_fallback: bool,
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_keyword_prompt: Option<String>,
}

/// Body of `POST /analyze-job`.
#[derive(Debug, Clone, Serialize)]
pub struct JobAnalysisRequest {
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Responses
// ────────────────────────────────────────────────────────────────────────────

/// Successful `POST /generate` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResult {
    pub cover_letter: String,
    /// Backend-computed fitness metric in [0, 1].
    pub quality_score: f64,
    pub keywords_found: u32,
    /// Wall-clock seconds the backend spent generating.
    pub generation_time: f64,
    #[serde(default)]
    pub metadata: ResultMetadata,
}

/// Auxiliary generation facts. The backend may omit the whole record or
/// individual fields, so everything here defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultMetadata {
    pub word_count: Option<u32>,
    #[serde(default)]
    pub fallback_used: bool,
}

/// Successful `POST /analyze-job` payload. The string fields are always
/// present but may be empty when extraction found nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct JobAnalysis {
    pub company_name: String,
    pub hiring_manager: String,
    pub position_title: String,
    pub key_requirements: Vec<String>,
    /// Extraction certainty in [0, 1].
    pub confidence_score: f64,
}

/// Successful `GET /prompts` payload: the backend's current default prompts.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptSet {
    pub keyword_extraction_prompt: String,
    pub system_prompt: String,
    pub fallback_prompt: String,
}
