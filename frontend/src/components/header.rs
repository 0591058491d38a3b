use crate::pages::analyze::{AnalyzePage, Msg};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_header(link: &Scope<AnalyzePage>) -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-eye"></i> {" AI Vision Analyzer"}</h1>
            <button
                class="logout-button"
                onclick={link.callback(|_| Msg::SignOut)}
                title="Sign out"
            >
                <i class="fa-solid fa-sign-out-alt"></i>
                {" Sign out"}
            </button>
        </header>
    }
}
