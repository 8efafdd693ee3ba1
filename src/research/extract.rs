use super::{PageExtractor, ResearchError, ResearchResult};
use crate::config::AppConfig;
use async_trait::async_trait;
use html2text::from_read;
use reqwest::Client;
use std::time::Duration;

/// Fetches a page and reduces it to readable plain text.
///
/// The request timeout doubles as the per-URL bound of the search pipeline:
/// one slow host costs at most `extract_timeout_secs`, never the whole run.
pub struct ReadabilityExtractor {
    http: Client,
}

impl ReadabilityExtractor {
    pub fn new(config: &AppConfig) -> Self {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.extract_timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self { http }
    }
}

#[async_trait]
impl PageExtractor for ReadabilityExtractor {
    async fn extract(&self, url: &str) -> ResearchResult<String> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::Status {
                url: url.to_string(),
                status,
            });
        }
        let html = response.text().await?;
        readable_text(&html).ok_or_else(|| ResearchError::EmptyExtraction {
            url: url.to_string(),
        })
    }
}

fn readable_text(html: &str) -> Option<String> {
    let text = from_read(html.as_bytes(), 80);
    let content = text.trim().to_string();
    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_down_to_text() {
        let html = "<html><body><h1>Forecast</h1><p>Sunny, 21 degrees.</p></body></html>";
        let text = readable_text(html).expect("content");
        assert!(text.contains("Forecast"));
        assert!(text.contains("Sunny, 21 degrees."));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(readable_text("").is_none());
        assert!(readable_text("<html><body></body></html>").is_none());
    }
}
