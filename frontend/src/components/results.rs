use shared::dashboard::AnalysisState;
use yew::prelude::*;

pub fn render_results(state: &AnalysisState) -> Html {
    let body = match state {
        AnalysisState::Idle => html! {
            <p class="placeholder">
                {"Upload an image and click Analyze to see the description here."}
            </p>
        },
        AnalysisState::Loading => html! {
            <p class="placeholder">
                <i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing your image..."}
            </p>
        },
        AnalysisState::Described(description) => html! {
            <p class="result-text">{ description }</p>
        },
        AnalysisState::Failed(message) => html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ message }</p>
            </div>
        },
    };

    html! {
        <div class="panel results-container">
            <h2>{"Analysis Result"}</h2>
            { body }
        </div>
    }
}
