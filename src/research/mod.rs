//! Web retrieval for search-augmented chat.
//!
//! Two small collaborators: a search gateway that turns a query into ranked
//! result URLs, and a page extractor that turns one URL into readable text.
//! Both are traits so the orchestrator can be exercised without a network.
mod extract;
mod search;

pub use extract::ReadabilityExtractor;
pub use search::DuckDuckGoSearch;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("no readable text at {url}")]
    EmptyExtraction { url: String },
}

pub type ResearchResult<T> = Result<T, ResearchError>;

/// A web search provider returning ranked result URLs, best first. Order is
/// significant downstream: synthesized search context preserves it.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> ResearchResult<Vec<String>>;
}

/// Downloads one page and extracts its main readable text.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> ResearchResult<String>;
}
