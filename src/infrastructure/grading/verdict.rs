//! Parsing of binary grader replies

use serde::Deserialize;
use serde_json::Value;

use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
struct VerdictResponse {
    score: Value,
}

/// Extract the outermost JSON object from a reply that may wrap it in prose
/// or a markdown fence
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn interpret(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "oui" | "true" => Some(true),
        "no" | "non" | "false" => Some(false),
        _ => None,
    }
}

/// Read a `{"score": "yes" | "no"}` verdict.
///
/// French `oui`/`non` and JSON booleans are accepted. A reply without a JSON
/// object is read as a bare word. Anything else is a validation error.
pub fn parse_verdict(reply: &str) -> Result<bool, DomainError> {
    let Some(json) = extract_json(reply) else {
        return interpret(reply)
            .ok_or_else(|| DomainError::validation(format!("Unreadable verdict: {}", reply)));
    };

    let parsed: VerdictResponse = serde_json::from_str(json)
        .map_err(|e| DomainError::validation(format!("Invalid verdict format: {}", e)))?;

    let verdict = match parsed.score {
        Value::Bool(b) => Some(b),
        Value::String(ref s) => interpret(s),
        _ => None,
    };

    verdict.ok_or_else(|| DomainError::validation(format!("Unknown verdict score: {}", parsed.score)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        assert!(parse_verdict(r#"{"score": "yes"}"#).unwrap());
        assert!(!parse_verdict(r#"{"score": "no"}"#).unwrap());
    }

    #[test]
    fn test_french_and_boolean_scores() {
        assert!(parse_verdict(r#"{"score": "oui"}"#).unwrap());
        assert!(!parse_verdict(r#"{"score": "Non"}"#).unwrap());
        assert!(parse_verdict(r#"{"score": true}"#).unwrap());
    }

    #[test]
    fn test_json_inside_prose() {
        let reply = "Here is my grade:\n```json\n{\"score\": \"yes\"}\n```";
        assert!(parse_verdict(reply).unwrap());
    }

    #[test]
    fn test_bare_word() {
        assert!(parse_verdict(" Yes ").unwrap());
        assert!(!parse_verdict("no").unwrap());
    }

    #[test]
    fn test_unreadable_replies() {
        assert!(parse_verdict("maybe").is_err());
        assert!(parse_verdict(r#"{"score": "perhaps"}"#).is_err());
        assert!(parse_verdict(r#"{"grade": "yes"}"#).is_err());
        assert!(parse_verdict(r#"{"score": 1}"#).is_err());
    }
}
