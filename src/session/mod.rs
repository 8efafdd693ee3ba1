//! Conversation orchestration.
//!
//! One `Orchestrator` owns the session: the append-only conversation log,
//! the active mode, the active model, and the attached image. The UI hands
//! it raw submissions and renders whatever it reports back through the
//! `Presenter` boundary; all collaborator traffic (search, extraction,
//! model streaming) happens in here.
mod orchestrator;

pub use orchestrator::Orchestrator;

use crate::types::ChatMessage;
use async_trait::async_trait;
use std::path::PathBuf;

/// What the orchestrator needs from the presentation layer. The production
/// implementation writes Dioxus signals; tests record calls.
///
/// Pipelines run on the UI's executor, so implementations need not be Send.
#[async_trait(?Send)]
pub trait Presenter {
    /// A message was committed to the conversation log.
    fn render_message(&self, message: &ChatMessage);

    /// Display-only status line. Never part of model input.
    fn notice(&self, text: &str);

    /// An assistant reply is about to stream; show an in-progress bubble.
    fn stream_started(&self);

    /// One fragment of the in-progress assistant reply, in arrival order.
    fn stream_token(&self, token: &str);

    /// The token stream ended. When `committed` is true the accumulated
    /// text is now an assistant message in history and the bubble is final.
    /// When false the reply was cut short: whatever is on screen stays as a
    /// display artifact, but history gained nothing.
    fn stream_closed(&self, committed: bool);

    fn set_input_enabled(&self, enabled: bool);

    /// The attachment changed; `file_name` is the selected image's name.
    fn image_status_changed(&self, file_name: Option<&str>);

    /// Ask the user for an image file. `None` means the dialog was
    /// dismissed.
    async fn pick_image(&self) -> Option<PathBuf>;
}
