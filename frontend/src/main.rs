mod api;
mod auth;
mod components;
mod pages;

use pages::{AnalyzePage, Landing};
use yew::prelude::*;

const ANALYZE_PATH: &str = "/analyze";

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

#[function_component(App)]
fn app() -> Html {
    if current_path().trim_end_matches('/') == ANALYZE_PATH {
        html! { <AnalyzePage /> }
    } else {
        html! { <Landing /> }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    auth::capture_token_from_url();
    yew::Renderer::<App>::new().render();
}
