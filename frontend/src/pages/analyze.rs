use gloo_events::EventListener;
use gloo_file::File as GlooFile;
use gloo_file::callbacks::{read_as_data_url, FileReader};
use shared::dashboard::{fetch_usage, submit_analysis, ApiError, AuthStatus, Dashboard, Effect};
use shared::{AnalyzeResponse, UsageSummary};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

use crate::api::{BrowserRouter, HttpApi, StoredToken};
use crate::auth;
use crate::components::utils::first_image;
use crate::components::{header, results, upload_section, usage_panel};

pub enum Msg {
    AuthResolved(AuthStatus),

    // File operations
    FileSelected(GlooFile),
    PreviewDecoded(u64, String),
    PreviewFailed(u64),

    // Analysis operations
    Analyze,
    AnalysisSettled(Result<AnalyzeResponse, ApiError>),
    UsageFetched(Result<UsageSummary, ApiError>),

    // Input events
    SetDragging(bool),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
    SignOut,
}

/// The sign-in gated analyze page.
pub struct AnalyzePage {
    dashboard: Dashboard<BrowserRouter, GlooFile>,
    api: Rc<HttpApi>,
    credentials: Rc<StoredToken>,
    is_dragging: bool,
    preview_reader: Option<FileReader>,
    _paste_listener: Option<EventListener>,
}

impl Component for AnalyzePage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let paste_listener = web_sys::window().map(|window| {
            let link = ctx.link().clone();
            EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            })
        });

        ctx.link().send_message(Msg::AuthResolved(auth::current_status()));

        Self {
            dashboard: Dashboard::new(BrowserRouter),
            api: Rc::new(HttpApi::default()),
            credentials: Rc::new(StoredToken),
            is_dragging: false,
            preview_reader: None,
            _paste_listener: paste_listener,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::AuthResolved(status) => {
                let effect = self.dashboard.on_auth(status);
                self.perform(ctx, effect);
                true
            }

            Msg::FileSelected(file) => self.handle_file_selected(ctx, file),
            Msg::PreviewDecoded(ticket, data_uri) => {
                self.preview_reader = None;
                self.dashboard.preview_ready(ticket, data_uri)
            }
            Msg::PreviewFailed(ticket) => {
                self.preview_reader = None;
                self.dashboard.preview_failed(ticket)
            }

            Msg::Analyze => {
                let effect = self.dashboard.on_click();
                self.perform(ctx, effect);
                true
            }
            Msg::AnalysisSettled(outcome) => {
                let effect = self.dashboard.on_settled(outcome);
                self.perform(ctx, effect);
                true
            }
            Msg::UsageFetched(outcome) => self.dashboard.on_usage(outcome),

            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => {
                event.prevent_default();
                self.is_dragging = false;
                if let Some(files) = event.data_transfer().and_then(|dt| dt.files()) {
                    self.select_first_image(ctx, &files);
                }
                true
            }
            Msg::HandlePaste(event) => {
                match event.clipboard_data().and_then(|dt| dt.files()) {
                    Some(files) if files.length() > 0 => {
                        event.prevent_default();
                        self.select_first_image(ctx, &files);
                        true
                    }
                    _ => false,
                }
            }
            Msg::SignOut => {
                auth::sign_out();
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if !self.dashboard.is_open() {
            return html! {
                <div class="loading-screen">
                    <p>{"Loading..."}</p>
                </div>
            };
        }

        let link = ctx.link();
        let flow = self.dashboard.flow();
        html! {
            <div class="container">
                { header::render_header(link) }
                <main class="main-content">
                    { usage_panel::render_usage(self.dashboard.usage()) }
                    <div class="analyze-grid">
                        { upload_section::render_upload_section(flow, self.is_dragging, link) }
                        { results::render_results(flow.state()) }
                    </div>
                </main>
            </div>
        }
    }
}

impl AnalyzePage {
    fn handle_file_selected(&mut self, ctx: &Context<Self>, file: GlooFile) -> bool {
        log::info!("Selected {} ({})", file.name(), file.raw_mime_type());
        let ticket = self.dashboard.select_file(file.clone());

        let link = ctx.link().clone();
        let file_name = file.name();
        self.preview_reader = Some(read_as_data_url(&file, move |result| match result {
            Ok(data_uri) => link.send_message(Msg::PreviewDecoded(ticket, data_uri)),
            Err(e) => {
                log::warn!("Could not build preview for {}: {:?}", file_name, e);
                link.send_message(Msg::PreviewFailed(ticket));
            }
        }));

        true
    }

    /// Starts the request the dashboard asked for. Results come back as
    /// messages.
    fn perform(&self, ctx: &Context<Self>, effect: Effect<GlooFile>) {
        let api = self.api.clone();
        let credentials = self.credentials.clone();
        let link = ctx.link().clone();
        match effect {
            Effect::None => {}
            Effect::FetchUsage => spawn_local(async move {
                let outcome = fetch_usage(&*api, &*credentials).await;
                link.send_message(Msg::UsageFetched(outcome));
            }),
            Effect::Submit(file) => spawn_local(async move {
                let outcome = submit_analysis(&*api, &*credentials, &file).await;
                link.send_message(Msg::AnalysisSettled(outcome));
            }),
        }
    }

    fn select_first_image(&self, ctx: &Context<Self>, files: &FileList) {
        if let Some(file) = first_image(files) {
            ctx.link().send_message(Msg::FileSelected(file));
        }
    }
}
