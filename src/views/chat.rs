use crate::ai::{ModelGateway, OllamaGateway};
use crate::config::AppConfig;
use crate::models;
use crate::research::{DuckDuckGoSearch, PageExtractor, ReadabilityExtractor, SearchGateway};
use crate::session::{Orchestrator, Presenter};
use crate::types::{ChatMessage, Mode, Role};
use crate::views::shared::markdown_to_html;
use async_trait::async_trait;
use dioxus::events::Key;
use dioxus::prelude::*;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

const INPUT_PLACEHOLDER: &str = "Message Truffle or ask about an image";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryKind {
    User,
    Assistant,
    Notice,
}

/// One rendered row of the conversation area. This is display state only;
/// the durable log lives in the orchestrator.
#[derive(Clone, Debug, PartialEq)]
struct DisplayEntry {
    kind: EntryKind,
    content: String,
    has_image: bool,
    /// Tokens are still arriving for this entry.
    streaming: bool,
    /// The stream was cut short; the text shown is a partial reply that was
    /// never committed to history.
    aborted: bool,
    created_at: OffsetDateTime,
}

impl DisplayEntry {
    fn new(kind: EntryKind, content: String) -> Self {
        Self {
            kind,
            content,
            has_image: false,
            streaming: false,
            aborted: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

fn format_message_timestamp(timestamp: OffsetDateTime) -> Option<String> {
    let mut datetime = timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

/// Presenter writing straight into the view's signals. Pipelines run on the
/// UI executor, so every write lands between frames.
#[derive(Clone, Copy)]
struct UiPresenter {
    entries: Signal<Vec<DisplayEntry>>,
    input_enabled: Signal<bool>,
    image_status: Signal<Option<String>>,
}

impl UiPresenter {
    fn push(&self, entry: DisplayEntry) {
        let mut entries = self.entries;
        entries.with_mut(|list| list.push(entry));
    }

    fn update_streaming(&self, update: impl FnOnce(&mut DisplayEntry)) {
        let mut entries = self.entries;
        entries.with_mut(|list| {
            if let Some(entry) = list.iter_mut().rev().find(|entry| entry.streaming) {
                update(entry);
            }
        });
    }
}

#[async_trait(?Send)]
impl Presenter for UiPresenter {
    fn render_message(&self, message: &ChatMessage) {
        let kind = match message.role {
            Role::User => EntryKind::User,
            Role::Assistant => EntryKind::Assistant,
            Role::System => EntryKind::Notice,
        };
        let mut entry = DisplayEntry::new(kind, message.content.clone());
        entry.has_image = message.has_images();
        self.push(entry);
    }

    fn notice(&self, text: &str) {
        self.push(DisplayEntry::new(EntryKind::Notice, text.to_string()));
    }

    fn stream_started(&self) {
        let mut entry = DisplayEntry::new(EntryKind::Assistant, String::new());
        entry.streaming = true;
        self.push(entry);
    }

    fn stream_token(&self, token: &str) {
        self.update_streaming(|entry| entry.content.push_str(token));
    }

    fn stream_closed(&self, committed: bool) {
        self.update_streaming(|entry| {
            entry.streaming = false;
            entry.aborted = !committed;
        });
    }

    fn set_input_enabled(&self, enabled: bool) {
        let mut input_enabled = self.input_enabled;
        input_enabled.set(enabled);
    }

    fn image_status_changed(&self, file_name: Option<&str>) {
        let mut image_status = self.image_status;
        image_status.set(file_name.map(str::to_string));
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn pick_image(&self) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .add_filter("Image files", &["jpg", "jpeg", "png", "gif"])
            .pick_file()
            .await
            .map(|file| file.path().to_path_buf())
    }

    #[cfg(target_arch = "wasm32")]
    async fn pick_image(&self) -> Option<PathBuf> {
        None
    }
}

#[component]
pub fn ChatView() -> Element {
    let config = use_hook(|| Rc::new(AppConfig::load()));

    let entries = use_signal(Vec::<DisplayEntry>::new);
    let input_enabled = use_signal(|| true);
    let image_status = use_signal(|| Option::<String>::None);
    let mut mode = use_signal(|| Mode::Unset);
    let default_model = config.default_model.clone();
    let mut active_model = use_signal(move || default_model);
    let mut input = use_signal(String::new);
    let mut menu_open = use_signal(|| false);

    let orchestrator = use_hook({
        let config = config.clone();
        move || {
            let presenter = UiPresenter {
                entries,
                input_enabled,
                image_status,
            };
            let model: Arc<dyn ModelGateway> =
                Arc::new(OllamaGateway::new(config.ollama_base_url.clone()));
            let search: Arc<dyn SearchGateway> = Arc::new(DuckDuckGoSearch::new(&config));
            let extractor: Arc<dyn PageExtractor> = Arc::new(ReadabilityExtractor::new(&config));
            Rc::new(Orchestrator::new(presenter, model, search, extractor, &config))
        }
    });

    let set_web_mode = {
        let orchestrator = orchestrator.clone();
        move |_: ()| {
            orchestrator.set_mode(Mode::WebSearch);
            mode.set(orchestrator.mode());
            active_model.set(orchestrator.active_model());
        }
    };

    let set_image_mode = {
        let orchestrator = orchestrator.clone();
        move |_: ()| {
            orchestrator.set_mode(Mode::ImageAnalysis);
            mode.set(orchestrator.mode());
            active_model.set(orchestrator.active_model());
        }
    };

    let upload_image = {
        let orchestrator = orchestrator.clone();
        move |_| {
            let orchestrator = orchestrator.clone();
            spawn(async move {
                orchestrator.attach_image().await;
            });
        }
    };

    let entries_snapshot = entries();
    let current_model = active_model();
    let in_image_mode = matches!(mode(), Mode::ImageAnalysis);
    let image_status_text = match image_status() {
        Some(name) => format!("Selected image: {name}"),
        None => "No image selected".to_string(),
    };

    rsx! {
        div { class: "main-container",
            div { class: "toolbar",
                div { class: "model-menu",
                    button {
                        class: "model-menu-button",
                        r#type: "button",
                        onclick: move |_| menu_open.set(!menu_open()),
                        "MODELS ▼"
                    }
                    if menu_open() {
                        div { class: "model-menu-list",
                            for spec in models::CATALOG.iter() {
                                button {
                                    class: format_args!(
                                        "model-menu-item {}",
                                        if spec.id == current_model { "active" } else { "" }
                                    ),
                                    r#type: "button",
                                    onclick: {
                                        let orchestrator = orchestrator.clone();
                                        let id = spec.id;
                                        move |_| {
                                            orchestrator.select_model(id);
                                            active_model.set(orchestrator.active_model());
                                            menu_open.set(false);
                                        }
                                    },
                                    if spec.id == current_model {
                                        span { class: "model-check", "✓ " }
                                    }
                                    span { class: "model-id", "{spec.id}" }
                                    span { class: "model-size", " {spec.size}" }
                                }
                            }
                        }
                    }
                }
            }

            div { class: "hero",
                h1 { class: "hero-title", "Ask Truffle Anything" }
                p { class: "hero-tagline", "Local models, with optional web context" }
            }

            div { class: "tiles",
                FeatureTile {
                    emoji: "🌐",
                    title: "Web Search with Citations",
                    onopen: set_web_mode,
                }
                FeatureTile {
                    emoji: "📄",
                    title: "Image/Docs/Code Analysis",
                    onopen: set_image_mode,
                }
            }

            div { class: "chat-wrap",
                div { id: "chat-list", class: "chat-list",
                    for entry in entries_snapshot.iter() {
                        MessageRow { entry: entry.clone() }
                    }
                }
            }

            if in_image_mode {
                div { class: "image-status", "{image_status_text}" }
            }

            form { class: "composer",
                div { class: "composer-inner",
                    textarea {
                        rows: "1",
                        placeholder: INPUT_PLACEHOLDER,
                        value: "{input}",
                        oninput: move |ev| input.set(ev.value()),
                        onkeydown: {
                            let orchestrator = orchestrator.clone();
                            move |ev: KeyboardEvent| {
                                if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                    ev.prevent_default();
                                    submit_current(&orchestrator, input, input_enabled);
                                }
                            }
                        },
                        disabled: !input_enabled(),
                        autofocus: true,
                    }
                    div { class: "composer-tools",
                        button {
                            class: "btn",
                            r#type: "button",
                            disabled: !input_enabled(),
                            onclick: upload_image,
                            "📤 Upload"
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: !input_enabled() || input().trim().is_empty(),
                            onclick: {
                                let orchestrator = orchestrator.clone();
                                move |_| submit_current(&orchestrator, input, input_enabled)
                            },
                            "Send"
                        }
                    }
                }
            }
        }
    }
}

/// Clear the composer and hand its text to the orchestrator. The composer
/// stays disabled until the pipeline re-enables it.
fn submit_current(
    orchestrator: &Rc<Orchestrator<UiPresenter>>,
    mut input: Signal<String>,
    input_enabled: Signal<bool>,
) {
    let text = input().trim().to_string();
    if text.is_empty() || !input_enabled() {
        return;
    }
    input.set(String::new());
    let orchestrator = orchestrator.clone();
    spawn(async move {
        orchestrator.handle_submission(&text).await;
    });
}

#[component]
fn FeatureTile(emoji: &'static str, title: &'static str, onopen: EventHandler<()>) -> Element {
    rsx! {
        div { class: "tile",
            div { class: "tile-emoji", "{emoji}" }
            div { class: "tile-title", "{title}" }
            button {
                class: "btn",
                r#type: "button",
                onclick: move |_| onopen.call(()),
                "Open"
            }
        }
    }
}

#[component]
fn MessageRow(entry: DisplayEntry) -> Element {
    match entry.kind {
        EntryKind::Notice => rsx! {
            div { class: "notice-row",
                span { class: "notice-text", "System: {entry.content}" }
            }
        },
        EntryKind::User => {
            let marker = if entry.has_image { " [Image attached]" } else { "" };
            let timestamp = format_message_timestamp(entry.created_at);
            rsx! {
                div { class: "message-row user",
                    div { class: "message-stack",
                        div { class: "bubble user", "{entry.content}{marker}" }
                        if let Some(ts) = timestamp {
                            div { class: "message-meta align-end",
                                span { class: "message-timestamp", "{ts}" }
                            }
                        }
                    }
                }
            }
        }
        EntryKind::Assistant => {
            let timestamp = format_message_timestamp(entry.created_at);
            rsx! {
                div { class: "message-row assistant",
                    div { class: "avatar assistant", "T" }
                    div { class: "message-stack",
                        AssistantBubble {
                            content: entry.content.clone(),
                            streaming: entry.streaming,
                            aborted: entry.aborted,
                        }
                        if let Some(ts) = timestamp {
                            div { class: "message-meta align-start",
                                span { class: "message-timestamp", "{ts}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AssistantBubble(content: String, streaming: bool, aborted: bool) -> Element {
    let content_html = markdown_to_html(&content);
    let copy_payload = content.clone();
    let on_copy = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            {
                let _ = raw;
            }
        });
    };

    rsx! {
        div { class: format_args!("bubble assistant {}", if aborted { "aborted" } else { "" }),
            if streaming && content.is_empty() {
                div { class: "shimmer-line",
                    span { class: "shimmer-text", "Processing…" }
                }
            } else {
                div { class: "md", dangerous_inner_html: "{content_html}" }
            }
        }
        if !streaming && !content.is_empty() {
            div { class: "bubble-controls",
                button { class: "action-btn", title: "Copy markdown", onclick: on_copy, "Copy" }
            }
        }
    }
}
