//! Web search provider implementations

mod duckduckgo;
mod tavily;

pub use duckduckgo::{parse_results, DuckDuckGoSearchProvider, DEFAULT_DUCKDUCKGO_URL};
pub use tavily::{TavilySearchProvider, DEFAULT_TAVILY_URL};
