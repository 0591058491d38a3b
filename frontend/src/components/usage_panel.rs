use shared::{Tier, UsageSummary};
use yew::prelude::*;

/// Plan, usage count and the limit warning. Renders nothing until the
/// first snapshot arrives.
pub fn render_usage(summary: Option<&UsageSummary>) -> Html {
    let Some(usage) = summary else {
        return html! {};
    };

    let plan = match usage.tier {
        Tier::Premium => "⭐ Premium",
        Tier::Free => "🆓 Free",
    };

    html! {
        <div class="panel usage-panel">
            <div class="usage-row">
                <span class="usage-plan">{ format!("Plan: {}", plan) }</span>
                <span class="usage-count">
                    { format!("Usage: {} / {}", usage.analyses_used, usage.limit_label()) }
                </span>
            </div>
            if usage.limit_reached() {
                <div class="limit-warning">
                    {"⚠️ You've reached your free tier limit. Upgrade to Premium!"}
                </div>
            }
        </div>
    }
}
