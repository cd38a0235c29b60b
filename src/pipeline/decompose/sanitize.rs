// Prepare raw text before embedding it in the model prompt: strip invisible
// Unicode, drop control characters, bound the length.

/// Maximum input length submitted to the model (characters, not tokens).
/// Truncation is char-boundary and lossy by design.
pub const MAX_INPUT_CHARS: usize = 6_000;

/// Sanitize text for model consumption.
pub fn sanitize_for_model(raw: &str) -> String {
    let cleaned = remove_invisible_chars(raw);
    truncate_chars(cleaned.trim(), MAX_INPUT_CHARS)
}

/// Remove invisible Unicode characters that could manipulate model behavior.
/// Preserves standard whitespace (space, newline, tab).
fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if *c == ' ' || *c == '\n' || *c == '\t' || *c == '\r' {
                return true;
            }
            if matches!(
                *c,
                '\u{200B}'  // Zero-width space
                | '\u{200C}' // Zero-width non-joiner
                | '\u{200D}' // Zero-width joiner
                | '\u{200E}' // Left-to-right mark
                | '\u{200F}' // Right-to-left mark
                | '\u{202A}'..='\u{202E}' // Directional embedding/override
                | '\u{2060}' // Word joiner
                | '\u{FEFF}' // BOM / zero-width no-break space
            ) {
                return false;
            }
            !c.is_control()
        })
        .collect()
}

/// Truncate to at most `max` characters at a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_zero_width_and_bom() {
        let dirty = "黄金\u{200B}大涨\u{FEFF}";
        assert_eq!(sanitize_for_model(dirty), "黄金大涨");
    }

    #[test]
    fn preserves_newlines_and_tabs() {
        assert_eq!(sanitize_for_model("a\n\tb"), "a\n\tb");
    }

    #[test]
    fn drops_control_chars() {
        assert_eq!(sanitize_for_model("a\u{0007}b"), "ab");
    }

    #[test]
    fn truncates_at_char_boundary() {
        // Multibyte input must not be cut mid-character
        let input = "美联储意外降息".repeat(2_000);
        let out = sanitize_for_model(&input);
        assert_eq!(out.chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn short_input_unchanged() {
        assert_eq!(truncate_chars("短文本", 20), "短文本");
    }
}
