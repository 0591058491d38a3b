use serde::{Deserialize, Serialize};
use shared::Tier;

/// Caller identity attached to a request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub tier: Tier,
}

impl From<&Claims> for AuthUser {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            tier: claims.tier(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String, // User ID
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metadata: Option<PublicMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
}

impl Claims {
    /// `public_metadata.subscription_tier` wins; a free tier is upgraded
    /// when the subscription plan name mentions premium.
    pub fn tier(&self) -> Tier {
        let mut tier = self
            .public_metadata
            .as_ref()
            .and_then(|m| m.subscription_tier.clone())
            .unwrap_or_else(|| "free".to_string());

        if tier == "free" {
            let plan = self
                .subscription
                .as_ref()
                .and_then(|s| s.plan.as_deref())
                .unwrap_or_default();
            if plan.to_lowercase().contains("premium") {
                tier = "premium".to_string();
            }
        }

        if tier == "premium" {
            Tier::Premium
        } else {
            Tier::Free
        }
    }
}
