//! Strict parsers for classifier output
//!
//! Small models decorate the requested single word with quotes, trailing
//! punctuation or a JSON wrapper. Anything else is malformed.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{BinaryScore, ClassificationError, Route};

static EDGE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[\s"'`*.,:;!]+|[\s"'`*.,:;!]+$"#).unwrap());

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_\-]+").unwrap());

/// Trim, lowercase and strip surrounding quotes and punctuation
pub fn normalize_label(raw: &str) -> String {
    EDGE_NOISE.replace_all(raw.trim(), "").to_lowercase()
}

/// Parse router output into a route
pub fn parse_route(raw: &str) -> Result<Route, ClassificationError> {
    let label = json_field(raw, &["datasource", "route"]).unwrap_or_else(|| raw.to_string());
    let normalized = normalize_label(&label);
    let compact = SEPARATORS.replace_all(&normalized, "");

    match compact.as_ref() {
        "vectorstore" => Ok(Route::Vectorstore),
        "websearch" => Ok(Route::Websearch),
        "directanswer" | "direct" | "ask" => Ok(Route::DirectAnswer),
        _ => Err(ClassificationError::malformed("router", raw)),
    }
}

/// Parse grader output into a binary score
pub fn parse_binary_score(classifier: &str, raw: &str) -> Result<BinaryScore, ClassificationError> {
    let label = json_field(raw, &["binary_score", "score"]).unwrap_or_else(|| raw.to_string());

    match normalize_label(&label).as_str() {
        "yes" | "true" => Ok(BinaryScore::Yes),
        "no" | "false" => Ok(BinaryScore::No),
        _ => Err(ClassificationError::malformed(classifier, raw)),
    }
}

/// Read the first present key of a JSON object embedded in the text
fn json_field(raw: &str, keys: &[&str]) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if start >= end {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(&raw[start..=end]).ok()?;
    keys.iter().find_map(|key| match value.get(*key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  \"WebSearch\".\n"), "websearch");
        assert_eq!(normalize_label("**Yes**"), "yes");
        assert_eq!(normalize_label("no"), "no");
    }

    #[test]
    fn test_parse_route_labels() {
        assert_eq!(parse_route("vectorstore").unwrap(), Route::Vectorstore);
        assert_eq!(parse_route(" Vectorstore\n").unwrap(), Route::Vectorstore);
        assert_eq!(parse_route("web search").unwrap(), Route::Websearch);
        assert_eq!(parse_route("'websearch'").unwrap(), Route::Websearch);
        assert_eq!(parse_route("ask").unwrap(), Route::DirectAnswer);
        assert_eq!(parse_route("direct_answer").unwrap(), Route::DirectAnswer);
    }

    #[test]
    fn test_parse_route_json() {
        let raw = r#"Sure: {"datasource": "vectorstore"}"#;
        assert_eq!(parse_route(raw).unwrap(), Route::Vectorstore);
    }

    #[test]
    fn test_parse_route_rejects_unknown() {
        let err = parse_route("I think the vectorstore is best").unwrap_err();
        assert!(err.is_malformed());
        assert!(parse_route("").is_err());
        assert!(parse_route("database").is_err());
    }

    #[test]
    fn test_parse_binary_score() {
        assert_eq!(parse_binary_score("g", "yes").unwrap(), BinaryScore::Yes);
        assert_eq!(parse_binary_score("g", "No.").unwrap(), BinaryScore::No);
        assert_eq!(parse_binary_score("g", "TRUE").unwrap(), BinaryScore::Yes);
        assert_eq!(
            parse_binary_score("g", r#"{"binary_score": "no"}"#).unwrap(),
            BinaryScore::No
        );
        assert_eq!(
            parse_binary_score("g", r#"{"score": true}"#).unwrap(),
            BinaryScore::Yes
        );
    }

    #[test]
    fn test_parse_binary_score_rejects_prose() {
        let err = parse_binary_score("relevance_grader", "yes, mostly").unwrap_err();
        assert_eq!(
            err,
            ClassificationError::malformed("relevance_grader", "yes, mostly")
        );
        assert!(parse_binary_score("g", "maybe").is_err());
    }
}
