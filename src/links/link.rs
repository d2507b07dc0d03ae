//! Hypermedia link types

use crate::core::shaping::{ShapedRecord, to_field_value};
use serde::{Deserialize, Serialize};

/// A relation from one representation to another resource or action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URI of the target
    pub href: String,

    /// Relation name (e.g., "self", "nextPage", "courses")
    pub rel: String,

    /// HTTP method to use on `href`
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.into(),
        }
    }
}

/// Append a `links` field to a shaped record
pub fn with_links(record: ShapedRecord, links: &[Link]) -> ShapedRecord {
    record.with_field("links", to_field_value(links))
}

/// Collection envelope used by hypermedia representations
///
/// ```json
/// { "value": [ { "id": "...", "links": [...] } ], "links": [...] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedCollection {
    pub value: Vec<ShapedRecord>,
    pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_links_is_appended_last() {
        let mut record = ShapedRecord::new();
        record.insert("id", json!(1));
        let record = with_links(record, &[Link::new("http://x/api", "self", "GET")]);

        assert_eq!(record.field_names().collect::<Vec<_>>(), ["id", "links"]);
        assert_eq!(
            record.get("links"),
            Some(&json!([{ "href": "http://x/api", "rel": "self", "method": "GET" }]))
        );
    }

    #[test]
    fn test_envelope_shape() {
        let envelope = LinkedCollection {
            value: vec![],
            links: vec![Link::new("http://x/api/authors", "self", "GET")],
        };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "value": [],
                "links": [{ "href": "http://x/api/authors", "rel": "self", "method": "GET" }]
            })
        );
    }
}
