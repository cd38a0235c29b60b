use super::decompose::sanitize::truncate_chars;

/// Length bound for filename slugs (characters).
const MAX_SLUG_CHARS: usize = 20;

/// Turn a record title into a vault-safe filename fragment.
///
/// Spaces become underscores, path and markdown-hostile characters are
/// dropped, length is bounded. Two dispatches in the same second with the
/// same title therefore compute the same filename and the later write wins,
/// a known, accepted collision (vault history keeps both versions).
pub fn title_slug(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            '/' | '\\' => Some('-'),
            '|' | '#' | '?' | ':' | '*' | '"' | '<' | '>' | '[' | ']' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    let bounded = truncate_chars(&cleaned, MAX_SLUG_CHARS);
    if bounded.is_empty() {
        "untitled".to_string()
    } else {
        bounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(title_slug("大摩翻多 NVDA"), "大摩翻多_NVDA");
    }

    #[test]
    fn hostile_characters_dropped() {
        assert_eq!(title_slug("A|B#C?D[E]"), "ABCDE");
        assert_eq!(title_slug("a/b\\c"), "a-b-c");
    }

    #[test]
    fn length_bounded() {
        let slug = title_slug(&"长".repeat(50));
        assert_eq!(slug.chars().count(), 20);
    }

    #[test]
    fn empty_title_gets_placeholder() {
        assert_eq!(title_slug(""), "untitled");
        assert_eq!(title_slug("###"), "untitled");
    }
}
