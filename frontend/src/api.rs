use async_trait::async_trait;
use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::dashboard::{ApiError, CredentialSource, DashboardApi, Router};
use shared::{AnalyzeResponse, ErrorDetail, UsageSummary};
use web_sys::FormData;

use crate::auth;

/// Talks to the backend through the same-origin `/api` prefix.
pub struct HttpApi {
    base: String,
}

impl Default for HttpApi {
    fn default() -> Self {
        Self { base: "/api".into() }
    }
}

fn transport(err: gloo_net::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("Failed to parse response: {}", e)))
    } else {
        let status = response.status();
        let detail = response
            .json::<ErrorDetail>()
            .await
            .ok()
            .and_then(|body| body.detail);
        Err(ApiError::Rejected { status, detail })
    }
}

#[async_trait(?Send)]
impl DashboardApi for HttpApi {
    type File = GlooFile;

    async fn fetch_usage(&self, token: &str) -> Result<UsageSummary, ApiError> {
        let response = Request::get(&format!("{}/usage", self.base))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    async fn analyze(&self, token: &str, file: &GlooFile) -> Result<AnalyzeResponse, ApiError> {
        let form_data =
            FormData::new().map_err(|e| ApiError::Transport(format!("FormData: {:?}", e)))?;
        form_data
            .append_with_blob_and_filename("file", file.as_ref(), &file.name())
            .map_err(|e| ApiError::Transport(format!("FormData: {:?}", e)))?;

        log::info!("Submitting {} ({} bytes) for analysis", file.name(), file.size());

        let response = Request::post(&format!("{}/analyze", self.base))
            .header("Authorization", &bearer(token))
            .body(form_data)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }
}

/// Reads the token the sign-in redirect left in local storage.
pub struct StoredToken;

#[async_trait(?Send)]
impl CredentialSource for StoredToken {
    async fn bearer_token(&self) -> Result<String, ApiError> {
        auth::stored_token().ok_or_else(|| ApiError::Credential("not signed in".into()))
    }
}

pub struct BrowserRouter;

impl Router for BrowserRouter {
    fn redirect(&self, path: &str) {
        auth::navigate(path);
    }
}
