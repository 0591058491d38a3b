use async_trait::async_trait;

use crate::{AnalyzeResponse, UsageSummary};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("Request rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
    #[error("No credential available: {0}")]
    Credential(String),
}

impl ApiError {
    /// Message shown in the result panel when an analysis attempt fails.
    pub fn analysis_message(&self) -> String {
        match self {
            ApiError::Rejected { detail, .. } => detail
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "Analysis failed".to_string()),
            other => {
                let message = other.to_string();
                if message.is_empty() {
                    "An error occurred during analysis".to_string()
                } else {
                    message
                }
            }
        }
    }
}

/// Hands out the current bearer credential. Backed by the identity provider.
#[async_trait(?Send)]
pub trait CredentialSource {
    async fn bearer_token(&self) -> Result<String, ApiError>;
}

/// Client-side navigation.
pub trait Router {
    fn redirect(&self, path: &str);
}

/// The two backend endpoints the dashboard consumes.
#[async_trait(?Send)]
pub trait DashboardApi {
    type File;

    /// `GET /api/usage`
    async fn fetch_usage(&self, token: &str) -> Result<UsageSummary, ApiError>;

    /// `POST /api/analyze` with the file as multipart field `file`.
    async fn analyze(&self, token: &str, file: &Self::File) -> Result<AnalyzeResponse, ApiError>;
}
