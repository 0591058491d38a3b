use super::utils::{display_name, first_image};
use crate::pages::analyze::{AnalyzePage, Msg};
use gloo_file::File as GlooFile;
use shared::dashboard::AnalyzeFlow;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_upload_section(
    flow: &AnalyzeFlow<GlooFile>,
    is_dragging: bool,
    link: &Scope<AnalyzePage>,
) -> Html {
    html! {
        <div class="panel upload-section">
            <h2>{"Upload Image"}</h2>
            { render_file_input_area(is_dragging, link) }
            { render_preview(flow) }
            { render_analyze_button(flow, link) }
        </div>
    }
}

fn render_file_input_area(is_dragging: bool, link: &Scope<AnalyzePage>) -> Html {
    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_image);
        input.set_value("");
        file.map(Msg::FileSelected)
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);

    let trigger_file_input = Callback::from(|_: MouseEvent| {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(input) = input {
            input.click();
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/jpeg,image/png,image/webp"
                style="display: none;"
                onchange={handle_change}
            />
            <div
                id="drop-zone"
                class={classes!("upload-area", is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={trigger_file_input}
            >
                <i class="fa-solid fa-cloud-arrow-up"></i>
                <p>{"Drag & drop an image here, paste, or click to browse"}</p>
                <p class="file-types">{"JPG, PNG or WEBP, up to 5MB"}</p>
            </div>
        </>
    }
}

fn render_preview(flow: &AnalyzeFlow<GlooFile>) -> Html {
    let Some(candidate) = flow.candidate() else {
        return html! {};
    };

    match &candidate.preview {
        Some(data_uri) => html! {
            <img class="preview-image" src={data_uri.clone()} alt={candidate.file.name()} />
        },
        None if candidate.preview_failed => html! {
            <p class="placeholder">
                <i class="fa-solid fa-image"></i>
                { format!(" Preview unavailable for {}", display_name(&candidate.file.name())) }
            </p>
        },
        None => html! {
            <p class="placeholder">
                <i class="fa-solid fa-spinner fa-spin"></i>{" Loading preview..."}
            </p>
        },
    }
}

fn render_analyze_button(flow: &AnalyzeFlow<GlooFile>, link: &Scope<AnalyzePage>) -> Html {
    let label = if flow.state().is_loading() {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        let name = flow
            .candidate()
            .map(|c| format!(" Analyze \"{}\"", display_name(&c.file.name())))
            .unwrap_or_else(|| " Analyze Image".to_string());
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{ name }</> }
    };

    html! {
        <button
            class="analyze-btn"
            onclick={link.callback(|_| Msg::Analyze)}
            disabled={!flow.can_submit()}
        >
            { label }
        </button>
    }
}
