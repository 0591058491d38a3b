//! Transport-agnostic core of the analyze dashboard.
//!
//! The browser app feeds events into `Dashboard` and performs the effects
//! it returns with its own HTTP API, credential source and router. The same
//! pieces run natively under test with stub collaborators.

pub mod analyze;
pub mod api;
pub mod driver;
pub mod gate;
pub mod usage;

pub use analyze::{submit_analysis, AnalysisState, AnalyzeFlow, Submit, UploadCandidate};
pub use api::{ApiError, CredentialSource, DashboardApi, Router};
pub use driver::{Dashboard, Effect};
pub use gate::{AuthStatus, GateDecision, SessionGate};
pub use usage::{fetch_usage, UsageTracker};
