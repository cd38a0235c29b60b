use serde_json::Value;

use super::sanitize::truncate_chars;
use crate::models::{Bias, Category, DeepAnalysis, RecordDraft};

/// Fixed sentinel when no usable conclusion exists anywhere in the item.
pub const NO_CONCLUSION: &str = "暂无结论";

/// Titles the model emits when it has nothing to say. Treated as missing.
const TITLE_PLACEHOLDERS: &[&str] = &["无结论", "无标题", "no conclusion", "no title"];

/// Hard bound on stored title length (characters).
pub const MAX_TITLE_CHARS: usize = 20;

/// Prefix of the raw input used to synthesize a missing summary.
const SUMMARY_PREFIX_CHARS: usize = 40;

/// Build a normalized draft from one model-output item.
///
/// The model is untrusted, so every field is defended here, at the
/// deserialization boundary, rather than scattered through later code.
/// Non-object items yield `None` and are dropped by the caller.
pub fn draft_from_value(value: &Value, raw_input: &str) -> Option<RecordDraft> {
    let obj = value.as_object()?;

    let str_field = |key: &str| -> String {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("")
            .to_string()
    };

    let mut summary = str_field("summary");
    if summary.is_empty() {
        summary = synthesize_summary(raw_input);
    }

    let logic_chain = str_field("logic_chain");
    let title = resolve_title(&str_field("title"), &summary, &logic_chain);

    let mut publication_date = str_field("publication_date");
    if publication_date.is_empty() {
        publication_date = "Unknown".to_string();
    }

    Some(RecordDraft {
        category: Category::parse_lenient(&str_field("category")),
        bias: Bias::parse_lenient(&str_field("bias")),
        title,
        summary,
        logic_chain,
        tags: parse_tags(obj.get("tags")),
        publication_date,
        deep_analysis: parse_deep_analysis(obj.get("deep_analysis")),
    })
}

/// Three-tier title fallback: title → summary → logic chain → sentinel.
/// The display layer depends on this exact chain; the result is bounded to
/// `MAX_TITLE_CHARS`.
pub fn resolve_title(title: &str, summary: &str, logic_chain: &str) -> String {
    let title = title.trim();
    let resolved = if !title.is_empty() && !is_placeholder(title) {
        title
    } else if !summary.trim().is_empty() {
        summary.trim()
    } else if !logic_chain.trim().is_empty() {
        logic_chain.trim()
    } else {
        NO_CONCLUSION
    };
    truncate_chars(resolved, MAX_TITLE_CHARS)
}

fn is_placeholder(title: &str) -> bool {
    let lower = title.to_lowercase();
    TITLE_PLACEHOLDERS.iter().any(|p| lower == *p)
}

/// Synthesize a summary from a prefix of the raw input, whitespace
/// collapsed so a pasted article doesn't produce a multi-line cell.
pub fn synthesize_summary(raw_input: &str) -> String {
    let collapsed = raw_input.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, SUMMARY_PREFIX_CHARS)
}

/// Tags arrive as a JSON array on good days, a stringified list on bad
/// ones. Anything unusable degrades to no tags, never to a parse failure.
fn parse_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(raw)) => {
            serde_json::from_str::<Vec<String>>(&raw.replace('\'', "\"")).unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

fn parse_deep_analysis(value: Option<&Value>) -> DeepAnalysis {
    let Some(obj) = value.and_then(Value::as_object) else {
        return DeepAnalysis::default();
    };
    let field = |key: &str| -> String {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("")
            .to_string()
    };
    DeepAnalysis {
        facts: field("facts"),
        opinions: field("opinions"),
        logic: field("logic"),
        assumptions: field("assumptions"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_falls_back_to_summary() {
        assert_eq!(resolve_title("", "X", ""), "X");
    }

    #[test]
    fn placeholder_title_falls_back_to_logic_chain() {
        assert_eq!(resolve_title("无结论", "", "A->B"), "A->B");
    }

    #[test]
    fn all_empty_yields_sentinel() {
        assert_eq!(resolve_title("", "", ""), NO_CONCLUSION);
    }

    #[test]
    fn english_placeholders_also_downgrade() {
        assert_eq!(resolve_title("No Title", "summary wins", ""), "summary wins");
    }

    #[test]
    fn valid_title_passes_through() {
        assert_eq!(resolve_title("央行降准", "s", "l"), "央行降准");
    }

    #[test]
    fn long_title_truncated_to_bound() {
        let long = "这是一个远远超过二十个字符上限的超长标题需要被截断处理";
        let resolved = resolve_title(long, "", "");
        assert_eq!(resolved.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn missing_summary_synthesized_from_input() {
        let draft = draft_from_value(
            &json!({"category": "MACRO", "title": "t"}),
            "央行意外降准 50bp，超出预期的全面降准",
        )
        .unwrap();
        assert_eq!(draft.summary, "央行意外降准 50bp，超出预期的全面降准");
    }

    #[test]
    fn synthesized_summary_collapses_whitespace() {
        assert_eq!(synthesize_summary("a\n\n  b\tc"), "a b c");
    }

    #[test]
    fn full_item_normalizes() {
        let value = json!({
            "category": "radar",
            "title": "NVDA 财报超预期",
            "summary": "指引上调",
            "bias": "看多",
            "tags": ["#Semi", "#NVDA"],
            "logic_chain": "业绩 -> 估值 -> 股价",
            "publication_date": "2026-08-01",
            "deep_analysis": {
                "facts": "数据中心收入翻倍",
                "opinions": "市场仍低估需求",
                "logic": "供给受限下定价权在手",
                "assumptions": "CapEx 周期不逆转"
            }
        });
        let draft = draft_from_value(&value, "raw").unwrap();
        assert_eq!(draft.category, Category::Radar);
        assert_eq!(draft.bias, Bias::Bullish);
        assert_eq!(draft.tags, vec!["#Semi", "#NVDA"]);
        assert_eq!(draft.deep_analysis.facts, "数据中心收入翻倍");
    }

    #[test]
    fn unknown_category_defaults_to_macro() {
        let draft = draft_from_value(&json!({"category": "CRYPTO", "title": "t"}), "raw").unwrap();
        assert_eq!(draft.category, Category::Macro);
    }

    #[test]
    fn stringified_tags_are_repaired() {
        let draft =
            draft_from_value(&json!({"title": "t", "tags": "['#a', '#b']"}), "raw").unwrap();
        assert_eq!(draft.tags, vec!["#a", "#b"]);
    }

    #[test]
    fn missing_publication_date_is_unknown() {
        let draft = draft_from_value(&json!({"title": "t"}), "raw").unwrap();
        assert_eq!(draft.publication_date, "Unknown");
    }

    #[test]
    fn non_object_item_dropped() {
        assert!(draft_from_value(&json!("just a string"), "raw").is_none());
        assert!(draft_from_value(&json!(42), "raw").is_none());
    }

    #[test]
    fn tags_ignore_non_string_entries() {
        let draft =
            draft_from_value(&json!({"title": "t", "tags": ["#ok", 3, null]}), "raw").unwrap();
        assert_eq!(draft.tags, vec!["#ok"]);
    }
}
