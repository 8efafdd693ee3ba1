/// Model gateway for Truffle.
///
/// The client talks to one locally-hosted inference server (Ollama) through
/// the `ModelGateway` trait. Replies are streamed: the gateway pushes text
/// fragments into a channel as they arrive and returns only once the stream
/// closes, so the caller decides what a half-finished reply is worth.
mod ollama;

pub use ollama::OllamaGateway;

use crate::types::ChatMessage;
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed stream chunk: {0}")]
    MalformedChunk(#[from] serde_json::Error),
    #[error("could not read image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type AiResult<T> = Result<T, AiError>;

/// A local inference service accepting a role-tagged message sequence and
/// returning a token stream.
///
/// Fragments are sent through `tokens` in arrival order; there is no
/// end-of-stream sentinel, the channel simply closes when the sender drops.
/// `Ok(())` means the stream closed cleanly and the accumulated reply is
/// complete; any `Err` means the reply was cut short.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn stream_chat(
        &self,
        model: String,
        messages: Vec<ChatMessage>,
        tokens: UnboundedSender<String>,
    ) -> AiResult<()>;
}
