//! DuckDuckGo HTML search

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::domain::{DomainError, WebResult, WebSearchProvider};
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_DUCKDUCKGO_URL: &str = "https://html.duckduckgo.com";

/// Search provider scraping DuckDuckGo's HTML endpoint. Needs no credentials.
#[derive(Debug)]
pub struct DuckDuckGoSearchProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> DuckDuckGoSearchProvider<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_DUCKDUCKGO_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/html/", self.base_url)
    }
}

fn selector(css: &str) -> Result<Selector, DomainError> {
    Selector::parse(css)
        .map_err(|e| DomainError::internal(format!("Invalid selector '{}': {}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract organic results from a DuckDuckGo HTML page
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<WebResult>, DomainError> {
    let result_selector = selector("div.result")?;
    let title_selector = selector("a.result__a")?;
    let snippet_selector = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let results = document
        .select(&result_selector)
        .filter(|el| !el.value().classes().any(|c| c == "result--ad"))
        .filter_map(|el| {
            let link = el.select(&title_selector).next()?;
            let title = element_text(link);
            let snippet = el
                .select(&snippet_selector)
                .next()
                .map(element_text)
                .unwrap_or_default();

            if title.is_empty() && snippet.is_empty() {
                return None;
            }

            let mut result = WebResult::new(title, snippet);
            if let Some(href) = link.value().attr("href") {
                result = result.with_url(href);
            }
            Some(result)
        })
        .take(max_results)
        .collect();

    Ok(results)
}

#[async_trait]
impl<C: HttpClientTrait> WebSearchProvider for DuckDuckGoSearchProvider<C> {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<WebResult>, DomainError> {
        let html = self
            .client
            .get_text(&self.search_url(), vec![("Accept", "text/html")], &[("q", query)])
            .await?;

        let results = parse_results(&html, max_results)?;
        debug!(count = results.len(), "DuckDuckGo search finished");
        Ok(results)
    }

    fn provider_name(&self) -> &'static str {
        "duck_duck_go"
    }
}
