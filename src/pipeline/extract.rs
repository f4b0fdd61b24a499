//! Schema-free record discovery in tree-shaped API responses.
//!
//! The source APIs wrap their payloads under arbitrary, inconsistent
//! envelope keys that have changed across revisions, so nothing here
//! assumes a container name. The decoded JSON is walked depth-first and
//! any mapping carrying both a recognizable identity field and a
//! recognizable title field is treated as a record. A matched record is a
//! leaf: its children are never searched again.

use serde_json::Value;

use crate::models::ExtractConfig;

/// Fields pulled from a single record node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub identity: String,
    pub title: String,
    pub date_label: Option<String>,
}

/// Matcher over ranked, case-insensitive field-name synonym tables.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    identity_keys: Vec<String>,
    title_keys: Vec<String>,
    date_keys: Vec<String>,
    pinned_keys: Vec<String>,
}

impl FieldMatcher {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            identity_keys: lowercase(&config.identity_keys),
            title_keys: lowercase(&config.title_keys),
            date_keys: lowercase(&config.date_keys),
            pinned_keys: lowercase(&config.pinned_keys),
        }
    }

    fn is_pinned(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.pinned_keys.iter().any(|pinned| *pinned == key)
    }

    /// Find a scalar value under the first matching synonym, in rank order.
    fn find_scalar(&self, map: &serde_json::Map<String, Value>, keys: &[String]) -> Option<String> {
        for wanted in keys {
            for (key, value) in map {
                if key.to_ascii_lowercase() == *wanted {
                    if let Some(text) = scalar_text(value) {
                        return Some(text);
                    }
                }
            }
        }
        None
    }

    /// Test whether a mapping node is a record.
    ///
    /// A node lacking either field is not a record; the traversal descends
    /// into it instead.
    fn match_record(&self, map: &serde_json::Map<String, Value>) -> Option<RecordFields> {
        let identity = self.find_scalar(map, &self.identity_keys)?;
        let title = self.find_scalar(map, &self.title_keys)?;
        Some(RecordFields {
            identity,
            title,
            date_label: self.find_scalar(map, &self.date_keys),
        })
    }
}

/// Non-empty text form of a scalar value. Composite values never qualify
/// as a field match.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lowercase(keys: &[String]) -> Vec<String> {
    keys.iter().map(|k| k.to_ascii_lowercase()).collect()
}

/// Extract every record from a decoded response body.
///
/// Records are emitted in document order, except that branches under a
/// pinned envelope key are visited before their siblings at the same
/// level, keeping pinned collections ahead of regular ones.
pub fn extract_records(root: &Value, matcher: &FieldMatcher) -> Vec<RecordFields> {
    let mut records = Vec::new();
    visit(root, matcher, &mut records);
    records
}

fn visit(value: &Value, matcher: &FieldMatcher, records: &mut Vec<RecordFields>) {
    match value {
        Value::Object(map) => {
            if let Some(record) = matcher.match_record(map) {
                records.push(record);
                return;
            }
            for (key, child) in map {
                if matcher.is_pinned(key) {
                    visit(child, matcher, records);
                }
            }
            for (key, child) in map {
                if !matcher.is_pinned(key) {
                    visit(child, matcher, records);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                visit(item, matcher, records);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractConfig;
    use serde_json::json;

    fn matcher() -> FieldMatcher {
        FieldMatcher::new(&ExtractConfig::default())
    }

    fn titles(records: &[RecordFields]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn finds_records_under_arbitrary_envelopes() {
        let body = json!({
            "root": [{
                "noticeList": [{"seq": 1, "subject": "A"}],
                "list": [{"seq": 2, "subject": "B"}]
            }]
        });

        let records = extract_records(&body, &matcher());
        assert_eq!(titles(&records), vec!["A", "B"]);
        assert_eq!(records[0].identity, "1");
        assert_eq!(records[1].identity, "2");
    }

    #[test]
    fn pinned_branch_precedes_regular_regardless_of_document_order() {
        let body = json!({
            "list": [{"seq": 2, "subject": "regular"}],
            "noticeList": [{"seq": 1, "subject": "pinned"}]
        });

        let records = extract_records(&body, &matcher());
        assert_eq!(titles(&records), vec!["pinned", "regular"]);
    }

    #[test]
    fn record_is_a_leaf() {
        let body = json!({
            "seq": 1,
            "subject": "outer",
            "detail": {"seq": 9, "subject": "nested"}
        });

        let records = extract_records(&body, &matcher());
        assert_eq!(titles(&records), vec!["outer"]);
    }

    #[test]
    fn node_without_title_is_descended_into() {
        let body = json!({
            "seq": 0,
            "payload": {"seq": 7, "subject": "inner"}
        });

        let records = extract_records(&body, &matcher());
        assert_eq!(titles(&records), vec!["inner"]);
        assert_eq!(records[0].identity, "7");
    }

    #[test]
    fn field_names_match_case_insensitively() {
        let body = json!([{"SEQ": "77", "Subject": "대소문자"}]);

        let records = extract_records(&body, &matcher());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity, "77");
    }

    #[test]
    fn ranked_synonyms_prefer_earlier_keys() {
        let body = json!({"id": "fallback", "seq": 5, "subject": "ranked"});

        let records = extract_records(&body, &matcher());
        assert_eq!(records[0].identity, "5");
    }

    #[test]
    fn date_label_is_captured_when_present() {
        let body = json!({"list": [{"seq": 3, "subject": "공지", "regdate": "2026-02-02"}]});

        let records = extract_records(&body, &matcher());
        assert_eq!(records[0].date_label.as_deref(), Some("2026-02-02"));
    }

    #[test]
    fn empty_title_does_not_qualify() {
        let body = json!({"list": [{"seq": 4, "subject": "  "}]});

        let records = extract_records(&body, &matcher());
        assert!(records.is_empty());
    }

    #[test]
    fn scalars_and_empty_trees_yield_nothing() {
        assert!(extract_records(&json!("text"), &matcher()).is_empty());
        assert!(extract_records(&json!({}), &matcher()).is_empty());
        assert!(extract_records(&json!([1, 2, 3]), &matcher()).is_empty());
    }
}
