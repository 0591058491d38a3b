use super::analyze::{AnalyzeFlow, Submit};
use super::api::{ApiError, Router};
use super::gate::{AuthStatus, GateDecision, SessionGate};
use super::usage::UsageTracker;
use crate::{AnalyzeResponse, UsageSummary};

/// Work the host must start after an event. The host reports the result
/// back through `on_usage` or `on_settled`.
#[derive(Debug, PartialEq)]
pub enum Effect<F> {
    None,
    FetchUsage,
    Submit(F),
}

/// Everything the analyze page decides, independent of how requests are sent.
pub struct Dashboard<R, F> {
    gate: SessionGate<R>,
    flow: AnalyzeFlow<F>,
    usage: UsageTracker,
}

impl<R: Router, F: Clone> Dashboard<R, F> {
    pub fn new(router: R) -> Self {
        Self {
            gate: SessionGate::new(router),
            flow: AnalyzeFlow::new(),
            usage: UsageTracker::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.gate.is_open()
    }

    pub fn flow(&self) -> &AnalyzeFlow<F> {
        &self.flow
    }

    pub fn usage(&self) -> Option<&UsageSummary> {
        self.usage.summary()
    }

    /// Usage is fetched once, when the session first becomes available.
    /// A signed-out visitor is redirected and nothing is requested.
    pub fn on_auth(&mut self, status: AuthStatus) -> Effect<F> {
        match self.gate.observe(status) {
            GateDecision::Enter => Effect::FetchUsage,
            _ => Effect::None,
        }
    }

    pub fn select_file(&mut self, file: F) -> u64 {
        self.flow.select_file(file)
    }

    pub fn preview_ready(&mut self, ticket: u64, data_uri: String) -> bool {
        self.flow.preview_ready(ticket, data_uri)
    }

    pub fn preview_failed(&mut self, ticket: u64) -> bool {
        self.flow.preview_failed(ticket)
    }

    pub fn on_click(&mut self) -> Effect<F> {
        if !self.gate.is_open() {
            log::warn!("Analyze requested without a session");
            return Effect::None;
        }
        match self.flow.begin_analyze() {
            Submit::Start(file) => Effect::Submit(file),
            Submit::NoFile | Submit::Busy => Effect::None,
        }
    }

    pub fn on_settled(&mut self, outcome: Result<AnalyzeResponse, ApiError>) -> Effect<F> {
        if self.flow.finish(outcome) && self.gate.is_open() {
            Effect::FetchUsage
        } else {
            Effect::None
        }
    }

    pub fn on_usage(&mut self, outcome: Result<UsageSummary, ApiError>) -> bool {
        self.usage.apply(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tier;
    use crate::dashboard::analyze::{submit_analysis, AnalysisState};
    use crate::dashboard::api::{CredentialSource, DashboardApi};
    use crate::dashboard::usage::fetch_usage;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Upload(&'static str);

    #[derive(Clone, Default)]
    struct RecordingRouter(Rc<RefCell<Vec<String>>>);

    impl Router for RecordingRouter {
        fn redirect(&self, path: &str) {
            self.0.borrow_mut().push(path.to_string());
        }
    }

    struct Token;

    #[async_trait(?Send)]
    impl CredentialSource for Token {
        async fn bearer_token(&self) -> Result<String, ApiError> {
            Ok("session-token".into())
        }
    }

    struct StubApi {
        analyze_reply: Result<AnalyzeResponse, ApiError>,
        analyze_calls: RefCell<Vec<(String, &'static str)>>,
        usage_calls: Cell<usize>,
    }

    impl StubApi {
        fn new(analyze_reply: Result<AnalyzeResponse, ApiError>) -> Self {
            Self {
                analyze_reply,
                analyze_calls: RefCell::new(Vec::new()),
                usage_calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl DashboardApi for StubApi {
        type File = Upload;

        async fn fetch_usage(&self, _token: &str) -> Result<UsageSummary, ApiError> {
            self.usage_calls.set(self.usage_calls.get() + 1);
            Ok(UsageSummary::new(Tier::Free, self.analyze_calls.borrow().len() as u32))
        }

        async fn analyze(&self, token: &str, file: &Upload) -> Result<AnalyzeResponse, ApiError> {
            self.analyze_calls
                .borrow_mut()
                .push((token.to_string(), file.0));
            self.analyze_reply.clone()
        }
    }

    /// Performs an effect against the stub and feeds the result back, the
    /// way the page's message loop does.
    fn perform(
        dashboard: &mut Dashboard<RecordingRouter, Upload>,
        api: &StubApi,
        effect: Effect<Upload>,
    ) {
        match effect {
            Effect::None => {}
            Effect::FetchUsage => {
                dashboard.on_usage(block_on(fetch_usage(api, &Token)));
            }
            Effect::Submit(file) => {
                assert!(dashboard.flow().state().is_loading());
                let outcome = block_on(submit_analysis(api, &Token, &file));
                let next = dashboard.on_settled(outcome);
                perform(dashboard, api, next);
            }
        }
    }

    fn signed_in(api: &StubApi) -> Dashboard<RecordingRouter, Upload> {
        let mut dashboard = Dashboard::new(RecordingRouter::default());
        let effect = dashboard.on_auth(AuthStatus::SignedIn);
        perform(&mut dashboard, api, effect);
        dashboard
    }

    #[test]
    fn signed_out_visitor_is_redirected_and_nothing_is_requested() {
        let router = RecordingRouter::default();
        let api = StubApi::new(Ok(AnalyzeResponse::described("unused")));
        let mut dashboard = Dashboard::new(router.clone());

        assert_eq!(dashboard.on_auth(AuthStatus::Loading), Effect::None);
        assert_eq!(dashboard.on_auth(AuthStatus::SignedOut), Effect::None);
        dashboard.select_file(Upload("photo.png"));
        let effect = dashboard.on_click();
        assert_eq!(effect, Effect::None);
        perform(&mut dashboard, &api, effect);

        assert_eq!(*router.0.borrow(), vec!["/".to_string()]);
        assert!(!dashboard.is_open());
        assert_eq!(api.usage_calls.get(), 0);
        assert!(api.analyze_calls.borrow().is_empty());
        assert_eq!(dashboard.flow().state(), &AnalysisState::Idle);
    }

    #[test]
    fn entering_fetches_usage_once() {
        let api = StubApi::new(Ok(AnalyzeResponse::described("unused")));
        let mut dashboard = signed_in(&api);

        assert_eq!(api.usage_calls.get(), 1);
        assert_eq!(dashboard.usage().map(|s| s.analyses_used), Some(0));
        assert_eq!(dashboard.on_auth(AuthStatus::SignedIn), Effect::None);
    }

    #[test]
    fn analyze_without_file_sets_validation_error() {
        let api = StubApi::new(Ok(AnalyzeResponse::described("unused")));
        let mut dashboard = signed_in(&api);

        assert_eq!(dashboard.on_click(), Effect::None);

        assert_eq!(
            dashboard.flow().state().error(),
            Some("Please select an image first")
        );
        assert!(api.analyze_calls.borrow().is_empty());
        assert_eq!(api.usage_calls.get(), 1);
    }

    #[test]
    fn successful_settle_fetches_usage_exactly_once() {
        let api = StubApi::new(Ok(AnalyzeResponse::described(
            "A red bicycle against a brick wall.",
        )));
        let mut dashboard = signed_in(&api);
        dashboard.select_file(Upload("photo.png"));

        let effect = dashboard.on_click();
        assert_eq!(effect, Effect::Submit(Upload("photo.png")));
        perform(&mut dashboard, &api, effect);

        assert_eq!(
            dashboard.flow().state().description(),
            Some("A red bicycle against a brick wall.")
        );
        assert_eq!(
            *api.analyze_calls.borrow(),
            vec![("session-token".to_string(), "photo.png")]
        );
        assert_eq!(api.usage_calls.get(), 2);
        assert_eq!(dashboard.usage().map(|s| s.analyses_used), Some(1));
    }

    #[test]
    fn settle_returns_a_single_fetch_effect() {
        let api = StubApi::new(Ok(AnalyzeResponse::described("unused")));
        let mut dashboard = signed_in(&api);
        dashboard.select_file(Upload("photo.png"));
        dashboard.on_click();

        assert_eq!(
            dashboard.on_settled(Ok(AnalyzeResponse::described("a cat"))),
            Effect::FetchUsage
        );
    }

    #[test]
    fn rejected_analysis_surfaces_detail_and_keeps_usage() {
        let api = StubApi::new(Err(ApiError::Rejected {
            status: 429,
            detail: Some("Free tier limit reached".into()),
        }));
        let mut dashboard = signed_in(&api);
        dashboard.select_file(Upload("photo.png"));

        let effect = dashboard.on_click();
        perform(&mut dashboard, &api, effect);

        assert_eq!(dashboard.flow().state().error(), Some("Free tier limit reached"));
        assert_eq!(dashboard.flow().state().description(), None);
        assert_eq!(api.usage_calls.get(), 1);
        assert_eq!(dashboard.usage(), Some(&UsageSummary::new(Tier::Free, 0)));
    }

    #[test]
    fn transport_failure_surfaces_message_without_refetch() {
        let api = StubApi::new(Err(ApiError::Transport("connection refused".into())));
        let mut dashboard = signed_in(&api);
        dashboard.select_file(Upload("photo.png"));
        dashboard.on_click();

        let effect = dashboard.on_settled(Err(ApiError::Transport("connection refused".into())));

        assert_eq!(effect, Effect::None);
        assert_eq!(dashboard.flow().state().error(), Some("connection refused"));
    }

    #[test]
    fn second_click_while_loading_submits_nothing() {
        let api = StubApi::new(Ok(AnalyzeResponse::described("unused")));
        let mut dashboard = signed_in(&api);
        dashboard.select_file(Upload("photo.png"));

        assert!(matches!(dashboard.on_click(), Effect::Submit(_)));
        assert_eq!(dashboard.on_click(), Effect::None);
        assert!(dashboard.flow().state().is_loading());
    }
}
