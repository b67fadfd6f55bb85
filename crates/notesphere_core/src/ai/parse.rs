//! Output schema validation for model responses.
//!
//! Accepted shapes:
//! - `{ "ideas": [{ "title", "details", "type"? }] }`
//! - `{ "relatedNotes": ["..."] }` (earliest response variant)
//!
//! Anything else yields an empty list. Items lacking a non-empty `title` or
//! `details` string are dropped; kept items are returned unmodified.

use crate::model::suggestion::SuggestionItem;
use log::warn;
use serde_json::Value;

pub fn parse_suggestions(output: &Value) -> Vec<SuggestionItem> {
    if let Some(ideas) = output.get("ideas").and_then(Value::as_array) {
        let items = ideas.iter().filter_map(parse_idea).collect::<Vec<_>>();
        if items.len() < ideas.len() {
            warn!(
                "event=ai_parse module=ai status=partial dropped={}",
                ideas.len() - items.len()
            );
        }
        return items;
    }

    if let Some(related) = output.get("relatedNotes").and_then(Value::as_array) {
        return related
            .iter()
            .filter_map(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(|text| SuggestionItem::new(text, text))
            .collect();
    }

    warn!("event=ai_parse module=ai status=error reason=missing_ideas");
    Vec::new()
}

fn parse_idea(idea: &Value) -> Option<SuggestionItem> {
    let title = non_empty_str(idea.get("title"))?;
    let details = non_empty_str(idea.get("details"))?;
    let kind = idea
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(SuggestionItem {
        title: title.to_string(),
        details: details.to_string(),
        kind,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_ideas_field_yields_empty_list() {
        assert!(parse_suggestions(&json!({ "answer": "ok" })).is_empty());
        assert!(parse_suggestions(&json!(["not", "an", "object"])).is_empty());
        assert!(parse_suggestions(&json!({ "ideas": "nope" })).is_empty());
    }

    #[test]
    fn malformed_items_are_dropped() {
        let items = parse_suggestions(&json!({
            "ideas": [
                { "title": "ok", "details": "body", "type": "Comando" },
                { "title": "", "details": "body" },
                { "title": "no details" },
                { "title": "bad type", "details": "body", "type": 3 }
            ]
        }));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind.as_deref(), Some("Comando"));
        assert_eq!(items[1].kind, None);
    }

    #[test]
    fn related_notes_variant_is_accepted() {
        let items = parse_suggestions(&json!({ "relatedNotes": ["a", " ", "b"] }));
        assert_eq!(items, vec![SuggestionItem::new("a", "a"), SuggestionItem::new("b", "b")]);
    }
}
