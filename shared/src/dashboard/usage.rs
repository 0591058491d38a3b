use super::api::{ApiError, CredentialSource, DashboardApi};
use crate::UsageSummary;

/// Fetches the usage snapshot with a freshly obtained bearer token.
pub async fn fetch_usage<A, C>(api: &A, credentials: &C) -> Result<UsageSummary, ApiError>
where
    A: DashboardApi + ?Sized,
    C: CredentialSource + ?Sized,
{
    let token = credentials.bearer_token().await?;
    api.fetch_usage(&token).await
}

/// Last usage snapshot read from the backend. Display is best-effort.
#[derive(Debug, Default)]
pub struct UsageTracker {
    summary: Option<UsageSummary>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> Option<&UsageSummary> {
        self.summary.as_ref()
    }

    /// Returns true when the stored snapshot changed.
    pub fn apply(&mut self, outcome: Result<UsageSummary, ApiError>) -> bool {
        match outcome {
            Ok(summary) => {
                let changed = self.summary.as_ref() != Some(&summary);
                self.summary = Some(summary);
                changed
            }
            Err(e) => {
                log::warn!("Error fetching usage: {}", e);
                false
            }
        }
    }
}
