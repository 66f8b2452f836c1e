//! Query filter construction.
//!
//! The filter shape is fixed by the attribute slug:
//! - `name` -> `{"full_name": {"$eq": value}}`
//! - `linkedin` -> `{"value": {"$contains": <profile slug>}}`
//! - anything else -> `{"value": {"$eq": value}}`

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};

lazy_static! {
    /// Profile slug following /in/, up to the next slash or query string.
    static ref LINKEDIN_USERNAME: Regex = Regex::new(r"linkedin\.com/in/([^/?]+)").unwrap();
}

/// Rows requested per search; the first row wins.
pub const SEARCH_LIMIT: u32 = 1;

/// Filter applied to one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// Exact match on the structured `full_name` sub-field.
    FullNameEquals(String),
    /// Substring match on the attribute value.
    ValueContains(String),
    /// Exact match on the attribute value.
    ValueEquals(String),
}

impl SearchFilter {
    /// Filter for `value` on the attribute with slug `attribute`.
    pub fn for_attribute(attribute: &str, value: &str) -> Self {
        match attribute {
            "name" => SearchFilter::FullNameEquals(value.to_string()),
            // Stored LinkedIn URLs vary in scheme, www. and trailing slash.
            "linkedin" => SearchFilter::ValueContains(linkedin_username(value).to_string()),
            _ => SearchFilter::ValueEquals(value.to_string()),
        }
    }

    /// Operand the API compares against.
    pub fn operand(&self) -> &str {
        match self {
            SearchFilter::FullNameEquals(v)
            | SearchFilter::ValueContains(v)
            | SearchFilter::ValueEquals(v) => v,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            SearchFilter::FullNameEquals(v) => json!({"full_name": {"$eq": v}}),
            SearchFilter::ValueContains(v) => json!({"value": {"$contains": v}}),
            SearchFilter::ValueEquals(v) => json!({"value": {"$eq": v}}),
        }
    }
}

/// Profile slug of a LinkedIn URL, or the input unchanged when it has none.
pub fn linkedin_username(value: &str) -> &str {
    LINKEDIN_USERNAME
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(value)
}

/// Body of a top-1 record query on a single attribute.
pub fn build_query(attribute: &str, filter: &SearchFilter) -> Value {
    let mut by_attribute = Map::new();
    by_attribute.insert(attribute.to_string(), filter.to_json());

    json!({
        "filter": Value::Object(by_attribute),
        "limit": SEARCH_LIMIT,
    })
}
