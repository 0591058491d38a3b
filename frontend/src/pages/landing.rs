use crate::auth;
use shared::FREE_TIER_LIMIT;
use shared::dashboard::AuthStatus;
use yew::prelude::*;

#[function_component(Landing)]
pub fn landing() -> Html {
    let signed_in = auth::current_status() == AuthStatus::SignedIn;
    let on_sign_in = Callback::from(|_: MouseEvent| auth::sign_in());

    let call_to_action = if signed_in {
        html! { <a class="cta-button" href="/analyze">{"Launch Analyzer"}</a> }
    } else {
        html! {
            <button class="cta-button" onclick={on_sign_in}>{"Sign in to get started"}</button>
        }
    };

    let free_allowance = if FREE_TIER_LIMIT == 1 {
        "1 image analysis".to_string()
    } else {
        format!("{} image analyses", FREE_TIER_LIMIT)
    };

    html! {
        <div class="landing">
            <nav class="landing-nav">
                <h1><i class="fa-solid fa-eye"></i>{" AI Vision Analyzer"}</h1>
                { call_to_action.clone() }
            </nav>

            <section class="hero">
                <h2>{"Understand any image in seconds"}</h2>
                <p>
                    {"Upload a photo and get a detailed description of objects, colors and mood."}
                </p>
                { call_to_action }
            </section>

            <section class="features">
                <div class="panel feature-card">
                    <h3><i class="fa-solid fa-bolt"></i>{" Fast"}</h3>
                    <p>{"Results arrive in a few seconds."}</p>
                </div>
                <div class="panel feature-card">
                    <h3><i class="fa-solid fa-brain"></i>{" Detailed"}</h3>
                    <p>{"Descriptions cover objects, colors, mood and notable features."}</p>
                </div>
                <div class="panel feature-card">
                    <h3><i class="fa-solid fa-lock"></i>{" Private"}</h3>
                    <p>{"Images are analyzed and discarded, never stored."}</p>
                </div>
            </section>

            <section class="pricing">
                <div class="panel price-card">
                    <h3>{"🆓 Free"}</h3>
                    <p class="price">{"$0"}</p>
                    <p>{ free_allowance }</p>
                </div>
                <div class="panel price-card highlight">
                    <h3>{"⭐ Premium"}</h3>
                    <p class="price">{"$9/mo"}</p>
                    <p>{"Unlimited image analyses"}</p>
                </div>
            </section>
        </div>
    }
}
