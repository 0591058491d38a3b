use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub mod dashboard;

/// Analyses a free account may run.
pub const FREE_TIER_LIMIT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Free,
    Premium,
}

impl Tier {
    pub fn limit(self) -> Limit {
        match self {
            Tier::Free => Limit::Count(FREE_TIER_LIMIT),
            Tier::Premium => Limit::Unlimited,
        }
    }
}

/// Either a number of analyses or the literal `"unlimited"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LimitRepr", into = "LimitRepr")]
pub enum Limit {
    Count(u32),
    Unlimited,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LimitRepr {
    Count(u32),
    Word(String),
}

impl TryFrom<LimitRepr> for Limit {
    type Error = String;

    fn try_from(repr: LimitRepr) -> Result<Self, Self::Error> {
        match repr {
            LimitRepr::Count(n) => Ok(Limit::Count(n)),
            LimitRepr::Word(w) if w == "unlimited" => Ok(Limit::Unlimited),
            LimitRepr::Word(w) => Err(format!("unknown limit value: {}", w)),
        }
    }
}

impl From<Limit> for LimitRepr {
    fn from(limit: Limit) -> Self {
        match limit {
            Limit::Count(n) => LimitRepr::Count(n),
            Limit::Unlimited => LimitRepr::Word("unlimited".into()),
        }
    }
}

impl Limit {
    pub fn label(&self) -> String {
        match self {
            Limit::Count(n) => n.to_string(),
            Limit::Unlimited => "∞".to_string(),
        }
    }
}

/// Snapshot returned by `GET /api/usage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub tier: Tier,
    pub analyses_used: u32,
    pub limit: Limit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Limit>,
}

impl UsageSummary {
    pub fn new(tier: Tier, analyses_used: u32) -> Self {
        let limit = tier.limit();
        let remaining = match limit {
            Limit::Count(n) => Limit::Count(n.saturating_sub(analyses_used)),
            Limit::Unlimited => Limit::Unlimited,
        };
        Self {
            tier,
            analyses_used,
            limit,
            user_id: None,
            remaining: Some(remaining),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn limit_label(&self) -> String {
        self.limit.label()
    }

    /// True once a counted limit has been used up.
    pub fn limit_reached(&self) -> bool {
        match self.limit {
            Limit::Count(n) => self.analyses_used >= n,
            Limit::Unlimited => false,
        }
    }
}

/// Body of a successful `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub description: String,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

fn default_success() -> bool {
    true
}

impl AnalyzeResponse {
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            success: true,
            user_id: None,
            tier: None,
            filename: None,
        }
    }
}

/// Error body shared by every non-2xx API response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn free_summary_at_limit_shows_warning() {
        let summary: UsageSummary =
            serde_json::from_str(r#"{"tier":"free","analyses_used":1,"limit":1}"#).unwrap();
        assert!(summary.limit_reached());
        assert_eq!(summary.limit_label(), "1");
    }

    #[test]
    fn premium_summary_is_unlimited() {
        let summary: UsageSummary =
            serde_json::from_str(r#"{"tier":"premium","analyses_used":5,"limit":"unlimited"}"#)
                .unwrap();
        assert_eq!(summary.tier, Tier::Premium);
        assert_eq!(summary.limit_label(), "∞");
        assert!(!summary.limit_reached());
    }

    #[test]
    fn unknown_limit_word_is_rejected() {
        let parsed = serde_json::from_str::<UsageSummary>(
            r#"{"tier":"free","analyses_used":0,"limit":"lots"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn summary_serializes_limit_and_remaining() {
        let summary = UsageSummary::new(Tier::Free, 1).with_user("user_1");
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["limit"], 1);
        assert_eq!(value["remaining"], 0);
        assert_eq!(value["user_id"], "user_1");

        let premium = serde_json::to_value(UsageSummary::new(Tier::Premium, 7)).unwrap();
        assert_eq!(premium["limit"], "unlimited");
        assert_eq!(premium["remaining"], "unlimited");
    }

    #[test]
    fn tier_parses_from_lowercase() {
        assert_eq!(Tier::from_str("premium").unwrap(), Tier::Premium);
        assert_eq!(Tier::Free.to_string(), "free");
    }

    #[test]
    fn analyze_response_needs_only_description() {
        let parsed: AnalyzeResponse =
            serde_json::from_str(r#"{"description":"A red bicycle against a brick wall."}"#)
                .unwrap();
        assert_eq!(parsed.description, "A red bicycle against a brick wall.");
        assert!(parsed.success);
    }

    #[test]
    fn error_detail_tolerates_missing_field() {
        let parsed: ErrorDetail = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.detail, None);
    }
}
