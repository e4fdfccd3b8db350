//! Tavily search API

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{DomainError, WebResult, WebSearchProvider};
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com";

#[derive(Debug)]
pub struct TavilySearchProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> TavilySearchProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_TAVILY_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> WebSearchProvider for TavilySearchProvider<C> {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<WebResult>, DomainError> {
        let body = serde_json::json!({
            "query": query,
            "max_results": max_results,
            "search_depth": "basic",
        });

        let response = self
            .client
            .post_json(&self.search_url(), self.headers(), &body)
            .await?;

        let parsed: TavilyResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::invalid_response("tavily", e.to_string())
        })?;

        Ok(parsed
            .results
            .into_iter()
            .take(max_results)
            .map(|r| {
                let result = WebResult::new(r.title, r.content);
                match r.url {
                    Some(url) => result.with_url(url),
                    None => result,
                }
            })
            .collect())
    }

    fn provider_name(&self) -> &'static str {
        "tavily"
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::HttpClient;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn response() -> serde_json::Value {
        serde_json::json!({
            "query": "weather",
            "results": [
                { "title": "Forecast", "url": "https://a.example", "content": "Rain later", "score": 0.9 },
                { "title": "Radar", "url": "https://b.example", "content": "Clouds", "score": 0.5 }
            ]
        })
    }

    #[tokio::test]
    async fn test_search() {
        let client =
            MockHttpClient::new().with_response("https://api.tavily.com/search", response());
        let provider = TavilySearchProvider::new(client, "tvly-key");

        let results = provider.search("weather", 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Forecast");
        assert_eq!(results[0].snippet, "Rain later");
        assert_eq!(results[0].url.as_deref(), Some("https://a.example"));
        assert_eq!(provider.client.posted_bodies()[0].1["max_results"], 1);
    }

    #[tokio::test]
    async fn test_missing_results_field() {
        let client = MockHttpClient::new()
            .with_response("https://api.tavily.com/search", serde_json::json!({}));
        let provider = TavilySearchProvider::new(client, "k");

        assert!(provider.search("q", 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_against_http_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("Authorization", "Bearer tvly-key"))
            .and(body_partial_json(serde_json::json!({"query": "weather"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(response()))
            .mount(&server)
            .await;

        let provider = TavilySearchProvider::with_base_url(HttpClient::new(), "tvly-key", server.uri());
        let results = provider.search("weather", 2).await.unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let provider = TavilySearchProvider::with_base_url(HttpClient::new(), "nope", server.uri());

        assert!(provider.search("q", 1).await.is_err());
    }

    #[tokio::test]
    async fn test_unreadable_results() {
        let client = MockHttpClient::new().with_response(
            "https://api.tavily.com/search",
            serde_json::json!({ "results": [{ "title": 7 }] }),
        );
        let provider = TavilySearchProvider::new(client, "k");

        let err = provider.search("q", 1).await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidResponse { .. }));
        assert!(!err.is_retryable());
    }
}
