use shared::{Limit, Tier, UsageSummary};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory analysis counter per user. Counts reset when the process restarts.
#[derive(Clone, Default)]
pub struct UsageService {
    counts: Arc<Mutex<HashMap<String, u32>>>,
}

impl UsageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn analyses_used(&self, user_id: &str) -> u32 {
        self.counts.lock().await.get(user_id).copied().unwrap_or(0)
    }

    pub async fn has_capacity(&self, user_id: &str, tier: Tier) -> bool {
        match tier.limit() {
            Limit::Unlimited => true,
            Limit::Count(limit) => self.analyses_used(user_id).await < limit,
        }
    }

    /// Takes one analysis slot. Returns false when the tier limit is already
    /// reached. Premium users are never counted.
    pub async fn try_reserve(&self, user_id: &str, tier: Tier) -> bool {
        let limit = match tier.limit() {
            Limit::Unlimited => return true,
            Limit::Count(limit) => limit,
        };

        let mut counts = self.counts.lock().await;
        let current = counts.entry(user_id.to_string()).or_insert(0);
        if *current >= limit {
            return false;
        }
        *current += 1;
        true
    }

    /// Gives back a slot taken by `try_reserve` when the analysis failed.
    pub async fn release(&self, user_id: &str, tier: Tier) {
        if tier == Tier::Premium {
            return;
        }
        let mut counts = self.counts.lock().await;
        if let Some(current) = counts.get_mut(user_id) {
            *current = current.saturating_sub(1);
        }
    }

    pub async fn summary(&self, user_id: &str, tier: Tier) -> UsageSummary {
        UsageSummary::new(tier, self.analyses_used(user_id).await).with_user(user_id)
    }
}
