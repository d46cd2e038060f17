//! Shape normalization for untrusted catalog documents.
//!
//! Remote catalogs arrive in several known shapes: a bare array of items, an
//! object wrapping the array under `apps` or `data`, or (degenerate case) a
//! single item object. The shape is decided once, as a tagged union, and each
//! raw element is mapped through ordered candidate-field tables where the
//! first non-empty value wins. Normalization is one-way and lossy: unknown
//! fields are ignored and nothing round-trips.

use serde_json::Value;

use crate::types::Item;

/// Placeholder display name when no candidate field is populated.
pub const UNKNOWN_ITEM_NAME: &str = "Unknown App";

const NAME_FIELDS: &[&str] = &["name", "title"];
const IDENTIFIER_FIELDS: &[&str] = &["bundleIdentifier", "bundleID"];
const DESCRIPTION_FIELDS: &[&str] = &["description", "subtitle"];
const VERSION_FIELDS: &[&str] = &["version"];
const SIZE_FIELDS: &[&str] = &["size"];
const ICON_FIELDS: &[&str] = &["iconURL", "icon", "image"];
const DOWNLOAD_FIELDS: &[&str] = &["downloadURL", "download", "url"];

/// Recognized catalog document shapes, decided exactly once per document.
#[derive(Debug, PartialEq)]
pub enum DocumentShape<'a> {
    /// The document is the item list itself.
    BareList(&'a [Value]),
    /// The item list sits under a known wrapper field (`apps` or `data`).
    Wrapped {
        field: &'static str,
        entries: &'a [Value],
    },
    /// The document is one item object (has name-like and url-like fields).
    SingleItem(&'a Value),
    /// Nothing recognizable; normalizes to an empty list, not an error.
    Unrecognized,
}

impl<'a> DocumentShape<'a> {
    pub fn classify(document: &'a Value) -> Self {
        if let Some(entries) = document.as_array() {
            return DocumentShape::BareList(entries);
        }
        for field in ["apps", "data"] {
            if let Some(entries) = document.get(field).and_then(Value::as_array) {
                return DocumentShape::Wrapped { field, entries };
            }
        }
        if looks_like_single_item(document) {
            return DocumentShape::SingleItem(document);
        }
        DocumentShape::Unrecognized
    }
}

fn looks_like_single_item(document: &Value) -> bool {
    document.is_object()
        && first_string(document, NAME_FIELDS).is_some()
        && first_string(document, DOWNLOAD_FIELDS).is_some()
}

/// Extract a canonical item list from an arbitrary catalog document.
///
/// Elements map 1:1 in order; an unrecognized document yields an empty list,
/// which callers render as "no items found" rather than as an error.
pub fn normalize(document: &Value) -> Vec<Item> {
    match DocumentShape::classify(document) {
        DocumentShape::BareList(entries) => entries.iter().map(normalize_item).collect(),
        DocumentShape::Wrapped { entries, .. } => entries.iter().map(normalize_item).collect(),
        DocumentShape::SingleItem(raw) => vec![normalize_item(raw)],
        DocumentShape::Unrecognized => Vec::new(),
    }
}

/// Resolve one raw element into an [`Item`] through the candidate tables.
pub fn normalize_item(raw: &Value) -> Item {
    Item {
        display_name: first_string(raw, NAME_FIELDS)
            .unwrap_or_else(|| UNKNOWN_ITEM_NAME.to_string()),
        identifier: first_string(raw, IDENTIFIER_FIELDS),
        description: first_string(raw, DESCRIPTION_FIELDS),
        version: first_string(raw, VERSION_FIELDS),
        size: first_string(raw, SIZE_FIELDS),
        icon_url: first_string(raw, ICON_FIELDS),
        download_url: first_string(raw, DOWNLOAD_FIELDS),
    }
}

/// First candidate field holding a non-empty displayable value.
///
/// Numbers are accepted and coerced to their decimal form; some catalogs
/// carry `size` as a byte count rather than a preformatted string.
fn first_string(raw: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|field| {
        match raw.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    })
}
