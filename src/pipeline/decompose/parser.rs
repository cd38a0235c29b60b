use serde_json::Value;

/// Pull the JSON payload out of a model response.
///
/// Handles the wrapping artifacts models actually produce: prose before a
/// fenced block, ```json fences, stray backticks. Returns the item values;
/// a bare object is coerced into a one-element sequence, so decomposition
/// always yields a sequence, never a bare record. `None` means the response
/// carried no usable JSON at all.
pub fn parse_payload(response: &str) -> Option<Vec<Value>> {
    let stripped = strip_wrapping(response);
    let value: Value = serde_json::from_str(&stripped).ok()?;
    match value {
        Value::Array(items) => Some(items),
        obj @ Value::Object(_) => Some(vec![obj]),
        _ => None,
    }
}

/// Strip code-fence wrapping, keeping only the fenced body when one exists.
fn strip_wrapping(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        // Skip a language tag line ("json\n"); a fence with no newline has
        // its body immediately after
        let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after[body_start..];
        let body_end = body.find("```").unwrap_or(body.len());
        return body[..body_end].trim().to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let items = parse_payload(r#"[{"title": "a"}, {"title": "b"}]"#).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn coerces_single_object_to_sequence() {
        let items = parse_payload(r#"{"title": "only one"}"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "only one");
    }

    #[test]
    fn strips_json_fences() {
        let response = "```json\n[{\"title\": \"fenced\"}]\n```";
        let items = parse_payload(response).unwrap();
        assert_eq!(items[0]["title"], "fenced");
    }

    #[test]
    fn strips_fences_with_leading_prose() {
        let response = "Here is the decomposition:\n\n```json\n[{\"title\": \"x\"}]\n```\nDone.";
        let items = parse_payload(response).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn plain_fence_without_language_tag() {
        let response = "```\n[{\"title\": \"x\"}]\n```";
        assert_eq!(parse_payload(response).unwrap().len(), 1);
    }

    #[test]
    fn garbage_returns_none() {
        assert!(parse_payload("the model refused to answer").is_none());
        assert!(parse_payload("```json\n{broken\n```").is_none());
    }

    #[test]
    fn scalar_json_returns_none() {
        assert!(parse_payload("42").is_none());
        assert!(parse_payload("\"just a string\"").is_none());
    }
}
