//! Core types for the catalog browser.

use serde::{Deserialize, Serialize};

/// One configured catalog endpoint.
///
/// Parsed from the first-party source registry document. `name` is a display
/// label and is not guaranteed unique across the registry; all internal
/// addressing goes by index into the registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display label.
    pub name: String,
    /// Absolute HTTP(S) address of the remote catalog document.
    pub url: String,
}

/// One normalized installable/downloadable entry.
///
/// Derived fresh from a catalog document on every fetch; never mutated in
/// place. Every field except `display_name` is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Always present; falls back to a fixed placeholder when no candidate
    /// field is populated.
    pub display_name: String,
    /// Bundle identifier, when the catalog carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display-only version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Display-only size string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Absence is a valid, renderable state (disabled download action), not
    /// an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Best-effort reachability of a source, for status indication only.
///
/// Binary by contract: "pending" is the pre-probe UI default, never a
/// returned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
}
