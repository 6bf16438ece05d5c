//! Form state — every editable field the workbench collects into request
//! payloads, plus the rules for splicing backend responses back in.
//!
//! The numeric fields are typed here, so coercion happens once at input
//! time and the request assemblers stay infallible.

use anyhow::{bail, Context, Result};

use crate::api::types::{GenerationRequest, JobAnalysis, JobAnalysisRequest, PromptSet};
use crate::sample;

/// Prefix for the synthesized special-requirements line built from analysis
/// results.
const REQUIREMENTS_LABEL: &str = "Key requirements mentioned: ";

/// Characters of a prompt shown in a quick-edit placeholder preview.
const PREVIEW_CHARS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Fields
// ────────────────────────────────────────────────────────────────────────────

/// Addressable form fields. `parse` accepts both the kebab-case console
/// names and the element-id spellings the web view used, so saved command
/// snippets keep working across both frontends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Resume,
    JobDescription,
    CompanyName,
    HiringManager,
    SpecialRequirements,
    UseFallback,
    ModelName,
    Temperature,
    MaxTokens,
    KeywordPrompt,
    SystemPrompt,
    FallbackPrompt,
    QuickKeywordPrompt,
    QuickSystemPrompt,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Resume,
        Field::JobDescription,
        Field::CompanyName,
        Field::HiringManager,
        Field::SpecialRequirements,
        Field::UseFallback,
        Field::ModelName,
        Field::Temperature,
        Field::MaxTokens,
        Field::KeywordPrompt,
        Field::SystemPrompt,
        Field::FallbackPrompt,
        Field::QuickKeywordPrompt,
        Field::QuickSystemPrompt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Resume => "resume",
            Field::JobDescription => "job-description",
            Field::CompanyName => "company-name",
            Field::HiringManager => "hiring-manager",
            Field::SpecialRequirements => "special-requirements",
            Field::UseFallback => "use-fallback",
            Field::ModelName => "model-name",
            Field::Temperature => "temperature",
            Field::MaxTokens => "max-tokens",
            Field::KeywordPrompt => "keyword-prompt",
            Field::SystemPrompt => "system-prompt",
            Field::FallbackPrompt => "fallback-prompt",
            Field::QuickKeywordPrompt => "quick-keyword-prompt",
            Field::QuickSystemPrompt => "quick-system-prompt",
        }
    }

    pub fn parse(name: &str) -> Option<Field> {
        let field = match name {
            "resume" => Field::Resume,
            "job-description" | "jd" | "jobDescription" => Field::JobDescription,
            "company-name" | "companyName" => Field::CompanyName,
            "hiring-manager" | "hiringManager" => Field::HiringManager,
            "special-requirements" | "specialRequirements" => Field::SpecialRequirements,
            "use-fallback" | "useFallback" => Field::UseFallback,
            "model-name" | "modelName" => Field::ModelName,
            "temperature" => Field::Temperature,
            "max-tokens" | "maxTokens" => Field::MaxTokens,
            "keyword-prompt" | "keywordPrompt" => Field::KeywordPrompt,
            "system-prompt" | "systemPrompt" => Field::SystemPrompt,
            "fallback-prompt" | "fallbackPrompt" => Field::FallbackPrompt,
            "quick-keyword-prompt" | "quickKeywordPrompt" => Field::QuickKeywordPrompt,
            "quick-system-prompt" | "quickSystemPrompt" => Field::QuickSystemPrompt,
            _ => return None,
        };
        Some(field)
    }

    /// True for the long-text fields the console edits line by line.
    pub fn multiline(self) -> bool {
        matches!(
            self,
            Field::Resume
                | Field::JobDescription
                | Field::SpecialRequirements
                | Field::KeywordPrompt
                | Field::SystemPrompt
                | Field::FallbackPrompt
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Form state
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FormState {
    pub resume: String,
    pub job_description: String,
    pub company_name: String,
    pub hiring_manager: String,
    pub special_requirements: String,
    pub use_fallback: bool,
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub keyword_prompt: String,
    pub system_prompt: String,
    pub fallback_prompt: String,
    pub quick_keyword_prompt: String,
    pub quick_system_prompt: String,
    /// Placeholder previews for the quick-edit fields, refreshed on every
    /// full prompt load. Empty until prompts have been fetched once.
    pub quick_keyword_placeholder: String,
    pub quick_system_placeholder: String,
}

impl FormState {
    /// Starting values mirror the backend's request-model defaults, so an
    /// untouched form generates with the same parameters the service would
    /// assume on its own.
    pub fn new() -> Self {
        Self {
            resume: String::new(),
            job_description: String::new(),
            company_name: String::new(),
            hiring_manager: String::new(),
            special_requirements: String::new(),
            use_fallback: false,
            model_name: "gpt-4o-mini".to_string(),
            temperature: 0.98,
            max_tokens: 1000,
            keyword_prompt: String::new(),
            system_prompt: String::new(),
            fallback_prompt: String::new(),
            quick_keyword_prompt: String::new(),
            quick_system_prompt: String::new(),
            quick_keyword_placeholder: String::new(),
            quick_system_placeholder: String::new(),
        }
    }

    /// Writes a raw value into `field`, coercing the numeric and boolean
    /// fields. Text fields take the value verbatim.
    pub fn set(&mut self, field: Field, raw: &str) -> Result<()> {
        match field {
            Field::Resume => self.resume = raw.to_string(),
            Field::JobDescription => self.job_description = raw.to_string(),
            Field::CompanyName => self.company_name = raw.to_string(),
            Field::HiringManager => self.hiring_manager = raw.to_string(),
            Field::SpecialRequirements => self.special_requirements = raw.to_string(),
            Field::UseFallback => self.use_fallback = parse_flag(raw)?,
            Field::ModelName => self.model_name = raw.to_string(),
            Field::Temperature => {
                self.temperature = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("temperature must be a number, got {raw:?}"))?;
            }
            Field::MaxTokens => {
                self.max_tokens = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("max-tokens must be a whole number, got {raw:?}"))?;
            }
            Field::KeywordPrompt => self.keyword_prompt = raw.to_string(),
            Field::SystemPrompt => self.system_prompt = raw.to_string(),
            Field::FallbackPrompt => self.fallback_prompt = raw.to_string(),
            Field::QuickKeywordPrompt => self.quick_keyword_prompt = raw.to_string(),
            Field::QuickSystemPrompt => self.quick_system_prompt = raw.to_string(),
        }
        Ok(())
    }

    pub fn get(&self, field: Field) -> String {
        match field {
            Field::Resume => self.resume.clone(),
            Field::JobDescription => self.job_description.clone(),
            Field::CompanyName => self.company_name.clone(),
            Field::HiringManager => self.hiring_manager.clone(),
            Field::SpecialRequirements => self.special_requirements.clone(),
            Field::UseFallback => self.use_fallback.to_string(),
            Field::ModelName => self.model_name.clone(),
            Field::Temperature => self.temperature.to_string(),
            Field::MaxTokens => self.max_tokens.to_string(),
            Field::KeywordPrompt => self.keyword_prompt.clone(),
            Field::SystemPrompt => self.system_prompt.clone(),
            Field::FallbackPrompt => self.fallback_prompt.clone(),
            Field::QuickKeywordPrompt => self.quick_keyword_prompt.clone(),
            Field::QuickSystemPrompt => self.quick_system_prompt.clone(),
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Request assembly
    // ────────────────────────────────────────────────────────────────────

    /// Collects the plain generation payload. The custom prompt overrides
    /// stay unset, so they never reach the wire.
    pub fn generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            resume: self.resume.clone(),
            job_description: self.job_description.clone(),
            company_name: self.company_name.clone(),
            hiring_manager: self.hiring_manager.clone(),
            special_requirements: self.special_requirements.clone(),
            use_fallback: self.use_fallback,
            model_name: self.model_name.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            custom_system_prompt: None,
            custom_keyword_prompt: None,
        }
    }

    /// Collects the custom-prompt test payload: the fallback path is forced
    /// off and the full prompt-tab texts ride along as overrides, even when
    /// they are empty.
    pub fn custom_prompt_request(&self) -> GenerationRequest {
        GenerationRequest {
            use_fallback: false,
            custom_system_prompt: Some(self.system_prompt.clone()),
            custom_keyword_prompt: Some(self.keyword_prompt.clone()),
            ..self.generation_request()
        }
    }

    /// Builds the analysis payload from the trimmed job description, or
    /// `None` when there is nothing to analyze.
    pub fn analysis_request(&self) -> Option<JobAnalysisRequest> {
        let trimmed = self.job_description.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(JobAnalysisRequest {
            job_description: trimmed.to_string(),
        })
    }

    // ────────────────────────────────────────────────────────────────────
    // Response application
    // ────────────────────────────────────────────────────────────────────

    /// Splices analysis results into the form. Empty extractions leave the
    /// corresponding field untouched; requirements are joined into a single
    /// labeled line only when at least one came back.
    pub fn apply_analysis(&mut self, analysis: &JobAnalysis) {
        if !analysis.company_name.is_empty() {
            self.company_name = analysis.company_name.clone();
        }
        if !analysis.hiring_manager.is_empty() {
            self.hiring_manager = analysis.hiring_manager.clone();
        }
        if !analysis.key_requirements.is_empty() {
            self.special_requirements =
                format!("{REQUIREMENTS_LABEL}{}", analysis.key_requirements.join(", "));
        }
    }

    /// Full prompt load: fills the prompt-tab editors and refreshes the
    /// quick-edit placeholder previews. Quick-edit values stay as typed.
    pub fn apply_prompts(&mut self, prompts: &PromptSet) {
        self.keyword_prompt = prompts.keyword_extraction_prompt.clone();
        self.system_prompt = prompts.system_prompt.clone();
        self.fallback_prompt = prompts.fallback_prompt.clone();
        self.quick_keyword_placeholder = quick_preview(&prompts.keyword_extraction_prompt);
        self.quick_system_placeholder = quick_preview(&prompts.system_prompt);
    }

    /// Quick prompt load: writes the current defaults straight into the
    /// quick-edit values as a starting point for small tweaks.
    pub fn apply_quick_prompts(&mut self, prompts: &PromptSet) {
        self.quick_system_prompt = prompts.system_prompt.clone();
        self.quick_keyword_prompt = prompts.keyword_extraction_prompt.clone();
    }

    pub fn clear_quick_prompts(&mut self) {
        self.quick_system_prompt.clear();
        self.quick_keyword_prompt.clear();
    }

    /// Fills the three narrative fields with the bundled example posting.
    pub fn load_example(&mut self) {
        self.resume = sample::EXAMPLE_RESUME.to_string();
        self.job_description = sample::EXAMPLE_JOB_DESCRIPTION.to_string();
        self.company_name = sample::EXAMPLE_COMPANY_NAME.to_string();
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => bail!("use-fallback must be true or false, got {other:?}"),
    }
}

/// Placeholder preview of a prompt: a fixed prefix, the first fifty
/// characters, and a trailing ellipsis regardless of length.
fn quick_preview(prompt: &str) -> String {
    let head: String = prompt.chars().take(PREVIEW_CHARS).collect();
    format!("Default: {head}...")
}
