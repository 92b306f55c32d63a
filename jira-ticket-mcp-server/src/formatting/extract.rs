//! Display values for polymorphic JIRA fields
//!
//! Every function here is total: unexpected shapes degrade to `None`, an
//! empty string or a fixed fallback text, never to an error.

use crate::issue::{DocNode, FieldValue, RichText};
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fmt::Write;

/// Shown when the development field exists but cannot be decoded
pub const DEVELOPMENT_FALLBACK: &str = "Development information available (view in JIRA)";

static REPOSITORY_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"repository=\{count=(\d+)").expect("valid repository regex"));

static EMBEDDED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"json=\{").expect("valid embedded json regex"));

/// Scalar or option-like value as text; lists are comma-joined
pub fn extract_value(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Scalar(s) | FieldValue::Named(s) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        FieldValue::List(items) => extract_list(items),
        FieldValue::Absent | FieldValue::Unrecognized => None,
    }
}

/// Comma-joined display values in input order, `None` when nothing is left
pub fn extract_list(items: &[FieldValue]) -> Option<String> {
    let values: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            // one level only: nested lists are not a JIRA shape
            FieldValue::List(_) => None,
            other => extract_value(other),
        })
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Document node types that live inside a line of text
const INLINE_NODES: &[&str] = &[
    "text",
    "hardBreak",
    "mention",
    "emoji",
    "inlineCard",
    "date",
    "status",
];

/// Plain text of a document tree
///
/// Text nodes yield their text. Paragraphs, and any container holding only
/// inline nodes (a heading, say), concatenate their children; other
/// containers separate their block children with a blank line.
pub fn extract_document_text(node: &DocNode) -> String {
    let inline_only = node
        .content
        .iter()
        .all(|child| INLINE_NODES.contains(&child.node_type.as_str()));

    match node.node_type.as_str() {
        "text" => node.text.clone().unwrap_or_default(),
        "hardBreak" => "\n".to_string(),
        "paragraph" => node.content.iter().map(extract_document_text).collect(),
        _ if node.content.is_empty() => String::new(),
        _ if inline_only => node.content.iter().map(extract_document_text).collect(),
        _ => node
            .content
            .iter()
            .map(extract_document_text)
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// Text of a description or comment body
pub fn rich_text_to_string(text: &RichText) -> String {
    match text {
        RichText::Plain(s) => s.clone(),
        RichText::Document(doc) => extract_document_text(doc),
    }
}

/// Summary of the development panel field
///
/// The field is a string such as
/// `{repository={count=2, dataType=repository}, json={"cachedValue":{...}}}`.
/// The repository count comes from the `repository=` section when present,
/// the embedded JSON supplies `lastUpdated` (and the count otherwise).
pub fn extract_development_summary(raw: &str, date_format: &str) -> Option<String> {
    let mut count = REPOSITORY_COUNT
        .captures(raw)
        .and_then(|caps| caps[1].parse::<u64>().ok());
    let mut last_updated = None;

    if let Some(found) = EMBEDDED_JSON.find(raw) {
        let json_start = found.end() - 1;
        let mut stream =
            serde_json::Deserializer::from_str(&raw[json_start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(json)) => {
                if let Some(overall) = json.pointer("/cachedValue/summary/repository/overall") {
                    count = count.or_else(|| overall.get("count").and_then(Value::as_u64));
                    last_updated = overall
                        .get("lastUpdated")
                        .and_then(Value::as_str)
                        .map(|date| format_timestamp(date, date_format));
                }
            }
            _ => return Some(DEVELOPMENT_FALLBACK.to_string()),
        }
    }

    let count = count?;
    let noun = if count == 1 {
        "repository"
    } else {
        "repositories"
    };

    Some(match last_updated {
        Some(date) => format!("{count} {noun}, last updated {date}"),
        None => format!("{count} {noun}"),
    })
}

/// Render a JIRA timestamp with `date_format`, in the timestamp's own offset
///
/// Plain `YYYY-MM-DD` dates are rendered with the same format. Anything that
/// does not parse, or a format chrono cannot apply (time fields on a plain
/// date), leaves the input unchanged.
pub fn format_timestamp(raw: &str, date_format: &str) -> String {
    let mut rendered = String::new();
    let written = if let Ok(timestamp) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
    {
        write!(rendered, "{}", timestamp.format(date_format))
    } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        write!(rendered, "{}", date.format(date_format))
    } else {
        return raw.to_string();
    };

    match written {
        Ok(()) => rendered,
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn doc(value: Value) -> DocNode {
        DocNode::from(&value)
    }

    #[test]
    fn test_extract_value_shapes() {
        assert_eq!(extract_value(&FieldValue::Scalar("x".into())), Some("x".into()));
        assert_eq!(extract_value(&FieldValue::Named("Pix".into())), Some("Pix".into()));
        assert_eq!(extract_value(&FieldValue::Scalar("  ".into())), None);
        assert_eq!(extract_value(&FieldValue::Absent), None);
        assert_eq!(extract_value(&FieldValue::Unrecognized), None);
    }

    #[test]
    fn test_extract_list_drops_unextractable_items() {
        let items = FieldValue::from(json!([{"name": "Team A"}, {"id": 1}, null, "", 5]));
        assert_eq!(extract_value(&items), Some("Team A, 5".into()));
        assert_eq!(extract_list(&[]), None);
        assert_eq!(extract_list(&[FieldValue::Absent, FieldValue::Unrecognized]), None);
    }

    #[test]
    fn test_document_paragraphs() {
        let node = doc(json!({
            "type": "doc",
            "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Hello "},
                    {"type": "text", "text": "world"}
                ]},
                {"type": "paragraph", "content": [{"type": "text", "text": "Second"}]}
            ]
        }));
        assert_eq!(extract_document_text(&node), "Hello world\n\nSecond");
    }

    #[test]
    fn test_document_inline_containers_are_not_split() {
        let node = doc(json!({
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [
                    {"type": "text", "text": "Hello "},
                    {"type": "text", "text": "world"}
                ]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "line one"},
                    {"type": "hardBreak"},
                    {"type": "text", "text": "line two"}
                ]},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "first"}]}
                    ]},
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "second"}]}
                    ]}
                ]}
            ]
        }));
        assert_eq!(
            extract_document_text(&node),
            "Hello world\n\nline one\nline two\n\nfirst\n\nsecond"
        );
    }

    #[test]
    fn test_document_unknown_leaves_are_empty() {
        let node = doc(json!({
            "type": "paragraph",
            "content": [
                {"type": "text", "text": "a"},
                {"type": "mention", "attrs": {"id": "1"}},
                {"type": "text", "text": "b"}
            ]
        }));
        assert_eq!(extract_document_text(&node), "ab");
        assert_eq!(extract_document_text(&DocNode::default()), "");
    }

    #[test]
    fn test_development_summary_from_count_and_json() {
        let raw = r#"{repository={count=2, dataType=repository}, json={"cachedValue":{"errors":[],"summary":{"repository":{"overall":{"count":2,"lastUpdated":"2024-01-15T10:30:00.000-0300","dataType":"repository"}}}},"isStale":true}}"#;
        assert_eq!(
            extract_development_summary(raw, "%d/%m/%Y %H:%M"),
            Some("2 repositories, last updated 15/01/2024 10:30".into())
        );
    }

    #[test]
    fn test_development_summary_json_only() {
        let raw = r#"{json={"cachedValue":{"summary":{"repository":{"overall":{"count":1}}}}}}"#;
        assert_eq!(
            extract_development_summary(raw, "%d/%m/%Y"),
            Some("1 repository".into())
        );
    }

    #[test]
    fn test_development_summary_count_only() {
        assert_eq!(
            extract_development_summary("{repository={count=3, dataType=repository}}", "%d/%m/%Y"),
            Some("3 repositories".into())
        );
    }

    #[test]
    fn test_development_summary_malformed_json_falls_back() {
        let raw = r#"{repository={count=1}, json={"cachedValue": oops}}"#;
        assert_eq!(
            extract_development_summary(raw, "%d/%m/%Y"),
            Some(DEVELOPMENT_FALLBACK.into())
        );
    }

    #[test]
    fn test_development_summary_no_match() {
        assert_eq!(extract_development_summary("{}", "%d/%m/%Y"), None);
        assert_eq!(extract_development_summary("", "%d/%m/%Y"), None);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-03-05T08:09:10.000+0000", "%d/%m/%Y %H:%M"),
            "05/03/2024 08:09"
        );
        assert_eq!(
            format_timestamp("2024-03-05T08:09:10Z", "%Y-%m-%d"),
            "2024-03-05"
        );
        assert_eq!(format_timestamp("yesterday", "%d/%m/%Y"), "yesterday");
    }

    #[test]
    fn test_format_plain_date() {
        assert_eq!(format_timestamp("2024-03-05", "%d/%m/%Y"), "05/03/2024");
        assert_eq!(format_timestamp("2024-03-05", "%d/%m/%Y %H:%M"), "2024-03-05");
        assert_eq!(format_timestamp("2024-02-30", "%d/%m/%Y"), "2024-02-30");
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            ".*".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("(value|name|type|text|content|[a-z]{1,4})", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_extraction_is_total(value in arb_json()) {
            let _ = extract_value(&FieldValue::from(value.clone()));
            let _ = rich_text_to_string(&RichText::from(value.clone()));
            let _ = extract_development_summary(&value.to_string(), "%d/%m/%Y");
        }

        #[test]
        fn prop_list_preserves_order(names in prop::collection::vec("[A-Za-z][A-Za-z ]{0,8}[A-Za-z]", 1..6)) {
            let items: Vec<FieldValue> = names.iter().map(|n| FieldValue::from(json!({"name": n}))).collect();
            prop_assert_eq!(extract_list(&items), Some(names.join(", ")));
        }

        #[test]
        fn prop_paragraph_documents(paragraphs in prop::collection::vec(prop::collection::vec("[a-z ]{0,6}", 1..4), 1..4)) {
            let content: Vec<Value> = paragraphs
                .iter()
                .map(|texts| json!({
                    "type": "paragraph",
                    "content": texts.iter().map(|t| json!({"type": "text", "text": t})).collect::<Vec<_>>()
                }))
                .collect();
            let node = doc(json!({"type": "doc", "content": content}));
            let expected = paragraphs.iter().map(|texts| texts.concat()).collect::<Vec<_>>().join("\n\n");
            prop_assert_eq!(extract_document_text(&node), expected);
        }
    }
}
