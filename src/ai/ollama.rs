use super::{AiError, AiResult, ModelGateway};
use crate::types::{ChatMessage, Role};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::StreamExt;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

static SHARED_HTTP: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

pub struct OllamaGateway {
    http: Client,
    base_url: String,
}

impl OllamaGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: SHARED_HTTP.clone(),
            base_url: base_url.into(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Serialize, Debug)]
struct OllamaMessage {
    role: Role,
    content: String,
    /// Base64-encoded image bytes; Ollama's vision API takes no file paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
struct StreamChunkMessage {
    content: String,
}

/// Streaming response: each line is one of these JSON objects.
#[derive(Deserialize, Debug)]
struct StreamChunk {
    message: Option<StreamChunkMessage>,
    done: Option<bool>,
}

/// Parse one line of Ollama's line-delimited JSON stream. `None` for blank
/// lines; a parse error is surfaced so the caller can abort the stream
/// instead of silently dropping text.
fn parse_stream_line(line_with_ws: &str) -> Option<Result<(String, bool), serde_json::Error>> {
    let line = line_with_ws.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str::<StreamChunk>(line).map(|parsed| {
        let piece = parsed
            .message
            .map(|msg| msg.content)
            .unwrap_or_default();
        (piece, parsed.done.unwrap_or(false))
    }))
}

fn encode_message(msg: &ChatMessage) -> AiResult<OllamaMessage> {
    let images = if msg.images.is_empty() {
        None
    } else {
        let mut encoded = Vec::with_capacity(msg.images.len());
        for path in &msg.images {
            let bytes = std::fs::read(path).map_err(|source| AiError::Image {
                path: path.display().to_string(),
                source,
            })?;
            encoded.push(BASE64.encode(bytes));
        }
        Some(encoded)
    };
    Ok(OllamaMessage {
        role: msg.role,
        content: msg.content.clone(),
        images,
    })
}

#[async_trait]
impl ModelGateway for OllamaGateway {
    async fn stream_chat(
        &self,
        model: String,
        messages: Vec<ChatMessage>,
        tokens: UnboundedSender<String>,
    ) -> AiResult<()> {
        let wire_messages = messages
            .iter()
            .map(encode_message)
            .collect::<AiResult<Vec<_>>>()?;

        let response = self
            .http
            .post(self.chat_url())
            .json(&OllamaChatRequest {
                model: &model,
                messages: wire_messages,
                stream: true,
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status { status, body });
        }

        // Ollama streams line-delimited JSON
        let mut buffer = String::new();
        let mut stream = response.bytes_stream();
        while let Some(item) = stream.next().await {
            let bytes = item?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));
            while let Some(pos) = buffer.find('\n') {
                let line = buffer[..pos].to_string();
                buffer = buffer[pos + 1..].to_string();
                match parse_stream_line(&line) {
                    None => {}
                    Some(Ok((piece, done))) => {
                        if !piece.is_empty() {
                            let _ = tokens.send(piece);
                        }
                        if done {
                            return Ok(());
                        }
                    }
                    Some(Err(err)) => return Err(AiError::MalformedChunk(err)),
                }
            }
        }

        Ok(())
    }
}
