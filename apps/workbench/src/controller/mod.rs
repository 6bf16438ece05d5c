//! The view controller: owns the form, the view state, the backend handle,
//! and the last rendered result, and runs each user-triggered flow end to
//! end.
//!
//! State-machine invariant: every flow that marks a control busy returns it
//! to idle (or to a held label with a deadline) on every exit path,
//! including failures. A non-idle control refuses new triggers outright.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{ApiError, GenerationBackend};
use crate::render::ResultPanel;

pub mod form;
pub mod state;

use crate::controller::form::FormState;
use crate::controller::state::{Control, Tab, ViewState};

/// How long the analysis confidence readout stays on the control before the
/// frontend reverts it.
const CONFIDENCE_HOLD: Duration = Duration::from_secs(3);

/// A blocking notice the frontend must surface immediately, outside the
/// results panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert(pub String);

pub struct Workbench {
    pub form: FormState,
    pub view: ViewState,
    backend: Arc<dyn GenerationBackend>,
    last_result: Option<ResultPanel>,
}

impl Workbench {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            form: FormState::new(),
            view: ViewState::new(),
            backend,
            last_result: None,
        }
    }

    /// One-shot initialization, run once before the first command: loads
    /// the backend's default prompts so the editors and quick previews
    /// start populated. Failure is non-fatal.
    pub async fn startup(&mut self) {
        self.load_prompts().await;
    }

    pub fn last_panel(&self) -> Option<&ResultPanel> {
        self.last_result.as_ref()
    }

    /// Makes `tab` the active pane and returns the now-current tab.
    pub fn switch_tab(&mut self, tab: Tab) -> Tab {
        self.view.switch_tab(tab)
    }

    pub fn toggle_section(&mut self, id: &str) -> bool {
        self.view.toggle_section(id)
    }

    /// Fills the narrative fields with the bundled example posting.
    pub fn load_example(&mut self) {
        self.form.load_example();
        info!("example data loaded");
    }

    // ────────────────────────────────────────────────────────────────────
    // Generation flows
    // ────────────────────────────────────────────────────────────────────

    /// Plain generation. Returns true when the flow ran and the results
    /// panel was re-rendered; false when the control refused the trigger.
    pub async fn generate(&mut self) -> bool {
        if !self.view.is_idle(Control::Generate) {
            return false;
        }
        self.view.set_busy(Control::Generate);

        let request = self.form.generation_request();
        info!(
            "generating cover letter: model={}, use_fallback={}",
            request.model_name, request.use_fallback
        );

        // no early return below; the control must come back to idle
        self.last_result = Some(match self.backend.generate(&request).await {
            Ok(result) => ResultPanel::success(&result),
            Err(error) => {
                warn!("generation failed: {error}");
                ResultPanel::error(error.panel_message())
            }
        });

        self.view.set_idle(Control::Generate);
        true
    }

    /// Custom-prompt test run: same request/response handling as
    /// `generate`, with the fallback path forced off and the prompt-tab
    /// editors riding along as overrides. On success the view switches back
    /// to the generation tab so the result is in sight.
    pub async fn test_custom_prompts(&mut self) -> bool {
        if !self.view.is_idle(Control::TestPrompts) {
            return false;
        }
        self.view.set_busy(Control::TestPrompts);

        let request = self.form.custom_prompt_request();
        info!("testing custom prompts: model={}", request.model_name);

        match self.backend.generate(&request).await {
            Ok(result) => {
                self.last_result = Some(ResultPanel::success(&result));
                self.view.switch_tab(Tab::Generate);
            }
            Err(error) => {
                warn!("custom prompt test failed: {error}");
                self.last_result = Some(ResultPanel::error(error.panel_message()));
            }
        }

        self.view.set_idle(Control::TestPrompts);
        true
    }

    // ────────────────────────────────────────────────────────────────────
    // Prompt loading (best-effort)
    // ────────────────────────────────────────────────────────────────────

    /// Fetches the current prompt set into the full editors and refreshes
    /// the quick previews. A failure is logged and otherwise ignored.
    pub async fn load_prompts(&mut self) {
        match self.backend.fetch_prompts().await {
            Ok(prompts) => {
                self.form.apply_prompts(&prompts);
                info!("prompts loaded");
            }
            Err(error) => warn!("failed to load prompts: {error}"),
        }
    }

    /// Fetches the current prompt set straight into the quick-edit values.
    /// A failure is logged and otherwise ignored.
    pub async fn load_quick_prompts(&mut self) {
        match self.backend.fetch_prompts().await {
            Ok(prompts) => {
                self.form.apply_quick_prompts(&prompts);
                info!("quick prompts loaded");
            }
            Err(error) => warn!("failed to load prompts: {error}"),
        }
    }

    pub fn clear_quick_prompts(&mut self) {
        self.form.clear_quick_prompts();
    }

    // ────────────────────────────────────────────────────────────────────
    // Job-description analysis
    // ────────────────────────────────────────────────────────────────────

    /// Whether an analyze trigger would dispatch right now: the control is
    /// idle and the trimmed job description is non-empty. The frontend shows
    /// the busy label only when this holds, so the validation alert stays
    /// the sole output of an empty-description trigger.
    pub fn analysis_ready(&self) -> bool {
        self.view.is_idle(Control::Analyze) && self.form.analysis_request().is_some()
    }

    /// Auto-fill from the job description. An empty description aborts with
    /// an alert before any request; a failed request alerts and reverts the
    /// control immediately; success fills the form and holds a confidence
    /// readout on the control for `CONFIDENCE_HOLD`.
    pub async fn analyze(&mut self) -> Option<Alert> {
        if !self.view.is_idle(Control::Analyze) {
            return None;
        }

        let Some(request) = self.form.analysis_request() else {
            return Some(Alert("Please enter a job description first".to_string()));
        };

        self.view.set_busy(Control::Analyze);
        info!("analyzing job description: {} chars", request.job_description.len());

        match self.backend.analyze_job(&request).await {
            Ok(analysis) => {
                debug!(
                    "analysis: position_title={:?}, confidence={:.2}",
                    analysis.position_title, analysis.confidence_score
                );
                self.form.apply_analysis(&analysis);

                let confidence = (analysis.confidence_score * 100.0).round();
                self.view.hold_label(
                    Control::Analyze,
                    format!("✅ Auto-filled ({confidence}% confidence)"),
                    Instant::now() + CONFIDENCE_HOLD,
                );
                None
            }
            Err(error) => {
                warn!("job analysis failed: {error}");
                self.view.set_idle(Control::Analyze);
                Some(alert_for(&error))
            }
        }
    }
}

fn alert_for(error: &ApiError) -> Alert {
    Alert(format!(
        "Error analyzing job description: {}",
        error.alert_message()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::api::types::{
        GenerationRequest, GenerationResult, JobAnalysis, JobAnalysisRequest, PromptSet,
        ResultMetadata,
    };

    /// Scripted backend: responses are handed out in order, requests are
    /// recorded for inspection.
    #[derive(Default)]
    struct StubBackend {
        generate_responses: Mutex<VecDeque<Result<GenerationResult, ApiError>>>,
        prompts_responses: Mutex<VecDeque<Result<PromptSet, ApiError>>>,
        analyze_responses: Mutex<VecDeque<Result<JobAnalysis, ApiError>>>,
        generate_requests: Mutex<Vec<GenerationRequest>>,
        analyze_requests: Mutex<Vec<JobAnalysisRequest>>,
    }

    impl StubBackend {
        fn with_generate(outcome: Result<GenerationResult, ApiError>) -> Arc<Self> {
            let stub = Self::default();
            stub.generate_responses.lock().unwrap().push_back(outcome);
            Arc::new(stub)
        }

        fn with_prompts(outcome: Result<PromptSet, ApiError>) -> Arc<Self> {
            let stub = Self::default();
            stub.prompts_responses.lock().unwrap().push_back(outcome);
            Arc::new(stub)
        }

        fn with_analysis(outcome: Result<JobAnalysis, ApiError>) -> Arc<Self> {
            let stub = Self::default();
            stub.analyze_responses.lock().unwrap().push_back(outcome);
            Arc::new(stub)
        }

        fn generate_calls(&self) -> usize {
            self.generate_requests.lock().unwrap().len()
        }

        fn analyze_calls(&self) -> usize {
            self.analyze_requests.lock().unwrap().len()
        }

        fn last_generate_request(&self) -> GenerationRequest {
            self.generate_requests
                .lock()
                .unwrap()
                .last()
                .expect("no generate request recorded")
                .clone()
        }
    }

    #[async_trait]
    impl GenerationBackend for StubBackend {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResult, ApiError> {
            self.generate_requests.lock().unwrap().push(request.clone());
            self.generate_responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected generate call")
        }

        async fn fetch_prompts(&self) -> Result<PromptSet, ApiError> {
            self.prompts_responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected prompts call")
        }

        async fn analyze_job(
            &self,
            request: &JobAnalysisRequest,
        ) -> Result<JobAnalysis, ApiError> {
            self.analyze_requests.lock().unwrap().push(request.clone());
            self.analyze_responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected analyze call")
        }
    }

    fn result_fixture() -> GenerationResult {
        GenerationResult {
            cover_letter: "Dear Jane,\n\nI would love to join TechCorp.".to_string(),
            quality_score: 0.873,
            keywords_found: 7,
            generation_time: 2.145,
            metadata: ResultMetadata {
                word_count: Some(312),
                fallback_used: false,
            },
        }
    }

    fn prompt_fixture() -> PromptSet {
        PromptSet {
            keyword_extraction_prompt: "Extract the most important keywords".to_string(),
            system_prompt: "You are an expert cover letter writer".to_string(),
            fallback_prompt: "Write a short, generic cover letter".to_string(),
        }
    }

    fn analysis_fixture() -> JobAnalysis {
        JobAnalysis {
            company_name: "TechCorp".to_string(),
            hiring_manager: "Jane Smith".to_string(),
            position_title: "Senior Python Developer".to_string(),
            key_requirements: vec!["Python".to_string(), "Django".to_string()],
            confidence_score: 0.92,
        }
    }

    fn server_error(message: Option<&str>) -> ApiError {
        ApiError::Request {
            status: 500,
            message: message.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_generate_success_renders_panel_and_restores_idle() {
        let stub = StubBackend::with_generate(Ok(result_fixture()));
        let mut workbench = Workbench::new(stub.clone());

        assert!(workbench.generate().await);

        match workbench.last_panel().unwrap() {
            ResultPanel::Success { quality, .. } => assert_eq!(quality, "87.3%"),
            ResultPanel::Error { .. } => panic!("expected a success panel"),
        }
        assert!(workbench.view.is_idle(Control::Generate));
        assert_eq!(
            workbench.view.label(Control::Generate),
            "🚀 Generate Cover Letter"
        );
    }

    #[tokio::test]
    async fn test_generate_server_error_renders_detail_and_restores_idle() {
        let stub = StubBackend::with_generate(Err(server_error(Some("model unavailable"))));
        let mut workbench = Workbench::new(stub.clone());

        assert!(workbench.generate().await);

        assert_eq!(
            workbench.last_panel().unwrap(),
            &ResultPanel::Error {
                message: "model unavailable".to_string()
            }
        );
        assert!(workbench.view.is_idle(Control::Generate));
    }

    #[tokio::test]
    async fn test_generate_sends_the_collected_form() {
        let stub = StubBackend::with_generate(Ok(result_fixture()));
        let mut workbench = Workbench::new(stub.clone());
        workbench.form.resume = "my resume".to_string();
        workbench.form.use_fallback = true;

        workbench.generate().await;

        let request = stub.last_generate_request();
        assert_eq!(request.resume, "my resume");
        assert!(request.use_fallback);
        assert_eq!(request.custom_system_prompt, None);
    }

    #[tokio::test]
    async fn test_generate_refused_while_busy() {
        let stub: Arc<StubBackend> = Arc::new(StubBackend::default());
        let mut workbench = Workbench::new(stub.clone());
        workbench.view.set_busy(Control::Generate);

        assert!(!workbench.generate().await);

        assert_eq!(stub.generate_calls(), 0);
        assert!(workbench.last_panel().is_none());
    }

    #[tokio::test]
    async fn test_custom_prompt_test_switches_back_to_generate_on_success() {
        let stub = StubBackend::with_generate(Ok(result_fixture()));
        let mut workbench = Workbench::new(stub.clone());
        workbench.form.system_prompt = "custom system".to_string();
        workbench.form.keyword_prompt = "custom keywords".to_string();
        workbench.form.use_fallback = true;
        workbench.switch_tab(Tab::Prompts);

        assert!(workbench.test_custom_prompts().await);

        assert_eq!(workbench.view.active_tab(), Tab::Generate);
        assert!(workbench.view.is_idle(Control::TestPrompts));

        let request = stub.last_generate_request();
        assert!(!request.use_fallback);
        assert_eq!(request.custom_system_prompt.as_deref(), Some("custom system"));
        assert_eq!(
            request.custom_keyword_prompt.as_deref(),
            Some("custom keywords")
        );
    }

    #[tokio::test]
    async fn test_custom_prompt_test_keeps_tab_on_error() {
        let stub = StubBackend::with_generate(Err(server_error(None)));
        let mut workbench = Workbench::new(stub.clone());
        workbench.switch_tab(Tab::Prompts);

        assert!(workbench.test_custom_prompts().await);

        assert_eq!(workbench.view.active_tab(), Tab::Prompts);
        assert_eq!(
            workbench.last_panel().unwrap(),
            &ResultPanel::Error {
                message: "Unknown error".to_string()
            }
        );
        assert!(workbench.view.is_idle(Control::TestPrompts));
    }

    #[test]
    fn test_analysis_ready_tracks_description_and_control_state() {
        let mut workbench = Workbench::new(Arc::new(StubBackend::default()));
        assert!(!workbench.analysis_ready());

        workbench.form.job_description = "Senior role at TechCorp".to_string();
        assert!(workbench.analysis_ready());

        workbench.view.set_busy(Control::Analyze);
        assert!(!workbench.analysis_ready());
    }

    #[tokio::test]
    async fn test_analyze_empty_description_alerts_without_any_request() {
        let stub: Arc<StubBackend> = Arc::new(StubBackend::default());
        let mut workbench = Workbench::new(stub.clone());
        workbench.form.job_description = "   ".to_string();

        let alert = workbench.analyze().await;

        assert_eq!(
            alert,
            Some(Alert("Please enter a job description first".to_string()))
        );
        assert_eq!(stub.analyze_calls(), 0);
        // the alert is the only observable effect
        assert!(workbench.view.is_idle(Control::Analyze));
        assert!(workbench.last_panel().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_success_fills_form_and_holds_confidence_label() {
        let stub = StubBackend::with_analysis(Ok(analysis_fixture()));
        let mut workbench = Workbench::new(stub.clone());
        workbench.form.job_description = "Senior role at TechCorp".to_string();

        let alert = workbench.analyze().await;

        assert_eq!(alert, None);
        assert_eq!(workbench.form.company_name, "TechCorp");
        assert_eq!(workbench.form.hiring_manager, "Jane Smith");
        assert_eq!(
            workbench.form.special_requirements,
            "Key requirements mentioned: Python, Django"
        );
        assert!(!workbench.view.is_idle(Control::Analyze));
        assert_eq!(
            workbench.view.label(Control::Analyze),
            "✅ Auto-filled (92% confidence)"
        );

        tokio::time::advance(Duration::from_secs(3)).await;
        workbench.view.revert_expired_holds(Instant::now());
        assert!(workbench.view.is_idle(Control::Analyze));
    }

    #[tokio::test]
    async fn test_analyze_failure_alerts_and_reverts_immediately() {
        let stub = StubBackend::with_analysis(Err(server_error(None)));
        let mut workbench = Workbench::new(stub.clone());
        workbench.form.job_description = "Senior role".to_string();
        workbench.form.company_name = "Untouched Co".to_string();

        let alert = workbench.analyze().await;

        assert_eq!(
            alert,
            Some(Alert(
                "Error analyzing job description: Analysis failed".to_string()
            ))
        );
        assert!(workbench.view.is_idle(Control::Analyze));
        assert_eq!(workbench.form.company_name, "Untouched Co");
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_refused_during_confidence_hold() {
        let stub = StubBackend::with_analysis(Ok(analysis_fixture()));
        let mut workbench = Workbench::new(stub.clone());
        workbench.form.job_description = "Senior role".to_string();

        workbench.analyze().await;
        assert_eq!(stub.analyze_calls(), 1);
        assert!(!workbench.analysis_ready());

        // second trigger lands inside the 3 s hold window
        let alert = workbench.analyze().await;
        assert_eq!(alert, None);
        assert_eq!(stub.analyze_calls(), 1);
    }

    #[tokio::test]
    async fn test_startup_loads_prompts_and_previews() {
        let stub = StubBackend::with_prompts(Ok(prompt_fixture()));
        let mut workbench = Workbench::new(stub.clone());

        workbench.startup().await;

        assert_eq!(
            workbench.form.keyword_prompt,
            "Extract the most important keywords"
        );
        assert_eq!(
            workbench.form.system_prompt,
            "You are an expert cover letter writer"
        );
        assert!(workbench
            .form
            .quick_keyword_placeholder
            .starts_with("Default: "));
    }

    #[tokio::test]
    async fn test_prompt_load_failure_is_swallowed() {
        let stub = StubBackend::with_prompts(Err(server_error(None)));
        let mut workbench = Workbench::new(stub.clone());
        workbench.form.keyword_prompt = "already here".to_string();

        workbench.load_prompts().await;

        assert_eq!(workbench.form.keyword_prompt, "already here");
        assert!(workbench.last_panel().is_none());
    }

    #[tokio::test]
    async fn test_quick_prompt_load_writes_values() {
        let stub = StubBackend::with_prompts(Ok(prompt_fixture()));
        let mut workbench = Workbench::new(stub.clone());

        workbench.load_quick_prompts().await;

        assert_eq!(
            workbench.form.quick_system_prompt,
            "You are an expert cover letter writer"
        );
        assert_eq!(
            workbench.form.quick_keyword_prompt,
            "Extract the most important keywords"
        );
        // full editors stay untouched on the quick path
        assert!(workbench.form.keyword_prompt.is_empty());
    }
}
