//! Tolerant decoding of model output.
//!
//! Models asked for JSON often wrap it in prose or code fences. Parsing tries
//! the whole text first, then each balanced `{...}` or `[...]` span in order,
//! and otherwise settles for a default. It never fails.

use serde::de::DeserializeOwned;

/// A decoded value, or the default used in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiResult<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> AiResult<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, AiResult::Fallback(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            AiResult::Parsed(value) | AiResult::Fallback(value) => value,
        }
    }
}

/// Decodes `text` as `T`, falling back to `default`.
pub fn parse_response<T: DeserializeOwned>(text: &str, default: T) -> AiResult<T> {
    let text = text.trim();
    if let Ok(value) = serde_json::from_str(text) {
        return AiResult::Parsed(value);
    }

    for span in balanced_spans(text) {
        if let Ok(value) = serde_json::from_str(span) {
            return AiResult::Parsed(value);
        }
    }

    tracing::debug!("Model output did not contain usable JSON; using default");
    AiResult::Fallback(default)
}

/// Every balanced bracket span in `text`, by start position.
fn balanced_spans(text: &str) -> impl Iterator<Item = &str> {
    let bytes = text.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'{' || b == b'[')
        .filter_map(move |(start, _)| balanced_end(bytes, start).map(|end| &text[start..end]))
}

/// End (exclusive) of the bracket group opened at `start`.
///
/// Brackets inside string literals do not count. Delimiters are ASCII, so
/// byte offsets always fall on char boundaries.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut expected = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => expected.push(b'}'),
            b'[' => expected.push(b']'),
            b'}' | b']' => {
                if expected.pop() != Some(b) {
                    return None;
                }
                if expected.is_empty() {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_strict_json() {
        let result = parse_response::<Value>(r#"{"verse": "v"}"#, json!({}));
        assert_eq!(result, AiResult::Parsed(json!({"verse": "v"})));
    }

    #[test]
    fn test_json_inside_code_fence() {
        let text = "Here you go:\n```json\n{\"analysis\": \"a\", \"prayer\": \"p\"}\n```\nBlessings!";
        let result = parse_response::<Value>(text, json!({}));
        assert_eq!(result, AiResult::Parsed(json!({"analysis": "a", "prayer": "p"})));
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        let text = r#"Result: {"message": "He said {peace} [to you]", "verse": "約 14:27"} end"#;
        let result = parse_response::<Value>(text, json!({})).into_inner();
        assert_eq!(result["message"], "He said {peace} [to you]");
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"x {"message": "say \"hi}\" now"} y"#;
        let result = parse_response::<Value>(text, json!({})).into_inner();
        assert_eq!(result["message"], "say \"hi}\" now");
    }

    #[test]
    fn test_array_of_topics() {
        let text = "Topics:\n[\"What is grace?\", \"Where did you see God this week?\"]";
        let result = parse_response::<Vec<String>>(text, Vec::new());
        assert_eq!(
            result.into_inner(),
            vec!["What is grace?", "Where did you see God this week?"]
        );
    }

    #[test]
    fn test_first_decodable_span_wins() {
        let text = "[broken {\"a\": 1} {\"a\": 2}";
        let result = parse_response::<Value>(text, json!(null));
        assert_eq!(result, AiResult::Parsed(json!({"a": 1})));
    }

    #[test]
    fn test_falls_back_on_prose() {
        let result = parse_response::<Value>("I cannot help with that.", json!({"x": 1}));
        assert!(result.is_fallback());
        assert_eq!(result.into_inner(), json!({"x": 1}));
    }

    #[test]
    fn test_falls_back_on_wrong_shape() {
        let result = parse_response::<Vec<String>>(r#"{"topics": 3}"#, vec!["default".to_string()]);
        assert_eq!(result, AiResult::Fallback(vec!["default".to_string()]));
    }

    #[test]
    fn test_unbalanced_input() {
        let result = parse_response::<Value>("{\"a\": [1, 2}", json!({}));
        assert!(result.is_fallback());
    }
}
