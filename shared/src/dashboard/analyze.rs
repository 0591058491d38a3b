use super::api::{ApiError, CredentialSource, DashboardApi};
use crate::AnalyzeResponse;

pub const NO_FILE_MESSAGE: &str = "Please select an image first";

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Described(String),
    Failed(String),
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            AnalysisState::Described(text) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The selected file and, once decoded, its preview data URI.
#[derive(Debug, Clone)]
pub struct UploadCandidate<F> {
    pub file: F,
    pub preview: Option<String>,
    /// The browser could not decode a preview; the file can still be sent.
    pub preview_failed: bool,
    ticket: u64,
}

#[derive(Debug, PartialEq)]
pub enum Submit<F> {
    /// Send this file; state is now `Loading`.
    Start(F),
    /// Nothing selected; state is now `Failed`.
    NoFile,
    /// A request is already in flight.
    Busy,
}

#[derive(Debug)]
pub struct AnalyzeFlow<F> {
    candidate: Option<UploadCandidate<F>>,
    state: AnalysisState,
    next_ticket: u64,
}

impl<F> Default for AnalyzeFlow<F> {
    fn default() -> Self {
        Self {
            candidate: None,
            state: AnalysisState::Idle,
            next_ticket: 0,
        }
    }
}

impl<F: Clone> AnalyzeFlow<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn candidate(&self) -> Option<&UploadCandidate<F>> {
        self.candidate.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.candidate.as_ref().and_then(|c| c.preview.as_deref())
    }

    /// Whether the analyze trigger should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading()
    }

    /// Replaces the candidate and returns the ticket the preview decode
    /// must present to `preview_ready`. An in-flight request keeps its
    /// `Loading` state and settles normally.
    pub fn select_file(&mut self, file: F) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.candidate = Some(UploadCandidate {
            file,
            preview: None,
            preview_failed: false,
            ticket,
        });
        if !self.state.is_loading() {
            self.state = AnalysisState::Idle;
        }
        ticket
    }

    /// Stores a decoded preview. Decodes for a file that has since been
    /// replaced are dropped.
    pub fn preview_ready(&mut self, ticket: u64, data_uri: String) -> bool {
        match self.candidate.as_mut() {
            Some(candidate) if candidate.ticket == ticket => {
                candidate.preview = Some(data_uri);
                true
            }
            _ => false,
        }
    }

    /// Marks the current candidate's preview as unavailable. Stale tickets
    /// are ignored like in `preview_ready`.
    pub fn preview_failed(&mut self, ticket: u64) -> bool {
        match self.candidate.as_mut() {
            Some(candidate) if candidate.ticket == ticket => {
                candidate.preview_failed = true;
                true
            }
            _ => false,
        }
    }

    pub fn begin_analyze(&mut self) -> Submit<F> {
        if self.state.is_loading() {
            return Submit::Busy;
        }
        match &self.candidate {
            Some(candidate) => {
                self.state = AnalysisState::Loading;
                Submit::Start(candidate.file.clone())
            }
            None => {
                self.state = AnalysisState::Failed(NO_FILE_MESSAGE.to_string());
                Submit::NoFile
            }
        }
    }

    /// Settles the in-flight request. Returns true when usage should be
    /// fetched again.
    pub fn finish(&mut self, outcome: Result<AnalyzeResponse, ApiError>) -> bool {
        match outcome {
            Ok(response) => {
                self.state = AnalysisState::Described(response.description);
                true
            }
            Err(e) => {
                log::warn!("Analysis failed: {}", e);
                self.state = AnalysisState::Failed(e.analysis_message());
                false
            }
        }
    }
}

/// Obtains a bearer token and submits `file` for analysis.
pub async fn submit_analysis<A, C>(
    api: &A,
    credentials: &C,
    file: &A::File,
) -> Result<AnalyzeResponse, ApiError>
where
    A: DashboardApi + ?Sized,
    C: CredentialSource + ?Sized,
{
    let token = credentials.bearer_token().await?;
    api.analyze(&token, file).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct Upload(&'static str);

    struct NoToken;

    #[async_trait(?Send)]
    impl CredentialSource for NoToken {
        async fn bearer_token(&self) -> Result<String, ApiError> {
            Err(ApiError::Credential("signed out".into()))
        }
    }

    #[derive(Default)]
    struct CountingApi {
        analyzed: RefCell<Vec<&'static str>>,
    }

    #[async_trait(?Send)]
    impl DashboardApi for CountingApi {
        type File = Upload;

        async fn fetch_usage(&self, _token: &str) -> Result<crate::UsageSummary, ApiError> {
            unreachable!("analyze tests never fetch usage")
        }

        async fn analyze(&self, _token: &str, file: &Upload) -> Result<AnalyzeResponse, ApiError> {
            self.analyzed.borrow_mut().push(file.0);
            Ok(AnalyzeResponse::described("unused"))
        }
    }

    #[test]
    fn missing_credential_skips_request() {
        let api = CountingApi::default();
        let outcome = block_on(submit_analysis(&api, &NoToken, &Upload("a.png")));
        assert!(matches!(outcome, Err(ApiError::Credential(_))));
        assert!(api.analyzed.borrow().is_empty());
    }

    #[test]
    fn analyze_without_file_fails_validation() {
        let mut flow = AnalyzeFlow::<Upload>::new();
        assert_eq!(flow.begin_analyze(), Submit::NoFile);
        assert_eq!(flow.state().error(), Some(NO_FILE_MESSAGE));
        assert!(flow.can_submit());
    }

    #[test]
    fn selecting_a_file_clears_previous_outcome() {
        let mut flow = AnalyzeFlow::new();
        flow.begin_analyze();
        assert!(flow.state().error().is_some());

        flow.select_file(Upload("a.png"));
        assert_eq!(flow.state(), &AnalysisState::Idle);

        flow.begin_analyze();
        flow.finish(Ok(AnalyzeResponse::described("a cat")));
        flow.select_file(Upload("b.png"));
        assert_eq!(flow.state(), &AnalysisState::Idle);
        assert!(flow.preview().is_none());
    }

    #[test]
    fn failed_outcome_uses_fallback_message() {
        let mut flow = AnalyzeFlow::new();
        flow.select_file(Upload("a.png"));
        flow.begin_analyze();
        let refresh = flow.finish(Err(ApiError::Rejected {
            status: 500,
            detail: None,
        }));
        assert!(!refresh);
        assert_eq!(flow.state().error(), Some("Analysis failed"));
    }

    #[test]
    fn second_click_while_loading_is_ignored() {
        let mut flow = AnalyzeFlow::new();
        flow.select_file(Upload("a.png"));
        assert!(matches!(flow.begin_analyze(), Submit::Start(Upload("a.png"))));
        assert!(!flow.can_submit());
        assert_eq!(flow.begin_analyze(), Submit::Busy);
        assert!(flow.state().is_loading());
    }

    #[test]
    fn stale_preview_is_dropped() {
        let mut flow = AnalyzeFlow::new();
        let first = flow.select_file(Upload("a.png"));
        let second = flow.select_file(Upload("b.png"));

        assert!(!flow.preview_ready(first, "data:image/png;base64,AAAA".into()));
        assert!(flow.preview().is_none());
        assert!(flow.preview_ready(second, "data:image/png;base64,BBBB".into()));
        assert_eq!(flow.preview(), Some("data:image/png;base64,BBBB"));
    }

    #[test]
    fn preview_failure_marks_only_the_current_candidate() {
        let mut flow = AnalyzeFlow::new();
        let first = flow.select_file(Upload("a.png"));
        let second = flow.select_file(Upload("b.png"));

        assert!(!flow.preview_failed(first));
        assert_eq!(flow.candidate().map(|c| c.preview_failed), Some(false));

        assert!(flow.preview_failed(second));
        assert_eq!(flow.candidate().map(|c| c.preview_failed), Some(true));
        assert!(flow.preview().is_none());
        assert!(matches!(flow.begin_analyze(), Submit::Start(Upload("b.png"))));

        flow.select_file(Upload("c.png"));
        assert_eq!(flow.candidate().map(|c| c.preview_failed), Some(false));
    }

    #[test]
    fn selecting_while_loading_keeps_request_in_flight() {
        let mut flow = AnalyzeFlow::new();
        flow.select_file(Upload("a.png"));
        flow.begin_analyze();
        flow.select_file(Upload("b.png"));
        assert!(flow.state().is_loading());

        flow.finish(Ok(AnalyzeResponse::described("first image")));
        assert_eq!(flow.state().description(), Some("first image"));
        assert_eq!(flow.candidate().map(|c| c.file.clone()), Some(Upload("b.png")));
    }
}
