use super::{ResearchError, ResearchResult, SearchGateway};
use crate::config::AppConfig;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

/// Search gateway backed by DuckDuckGo's HTML interface, which needs no API
/// key and keeps provider ranking in document order.
pub struct DuckDuckGoSearch {
    http: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(config: &AppConfig) -> Self {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.extract_timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            endpoint: config.search_endpoint.clone(),
        }
    }
}

#[async_trait]
impl SearchGateway for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> ResearchResult<Vec<String>> {
        let url = format!("{}?q={}", self.endpoint, urlencoding::encode(query));
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::Status {
                url: self.endpoint.clone(),
                status,
            });
        }
        let html = response.text().await?;
        Ok(parse_result_urls(&html, max_results))
    }
}

// Result links carry the class "result__a"; the href is usually a redirect
// wrapping the target in a uddg= parameter.
static RESULT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"class="result__a"[^>]*href="([^"]*)""#).expect("result link regex")
});

fn parse_result_urls(html: &str, max_results: usize) -> Vec<String> {
    RESULT_LINK
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| unwrap_redirect(m.as_str())))
        .filter(|url| !url.is_empty())
        .take(max_results)
        .collect()
}

fn unwrap_redirect(href: &str) -> String {
    let href = html_decode(href);
    if let Some(encoded) = href.split("uddg=").nth(1) {
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        if let Ok(decoded) = urlencoding::decode(encoded) {
            return decoded.into_owned();
        }
    }
    href
}

/// Basic HTML entity decoding
fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}
