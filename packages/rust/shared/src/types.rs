//! Core domain types shared between the graph client and the resolvers.

use serde::{Deserialize, Serialize};

/// Display name used when the content graph omits one.
pub const UNTITLED: &str = "Untitled";

// ---------------------------------------------------------------------------
// ContentItem
// ---------------------------------------------------------------------------

/// A content item as returned by the content graph, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Opaque content key.
    pub key: String,
    /// Editor-facing name; [`UNTITLED`] when absent upstream.
    pub display_name: String,
    /// Canonical public URL. May be empty.
    pub canonical_url: String,
    /// Slash-delimited position in the content tree.
    pub hierarchical_url: String,
}

// ---------------------------------------------------------------------------
// SiblingPage
// ---------------------------------------------------------------------------

/// One entry of a sibling listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingPage {
    pub key: String,
    pub display_name: String,
    /// Canonical URL; unique within one listing.
    pub url: String,
    pub hierarchical_path: String,
    /// Segment count of `hierarchical_path`.
    pub depth: usize,
}

/// Result of a sibling resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingPages {
    /// Parent whose direct children are listed. Empty when resolution failed.
    pub parent_path: String,
    /// The path the caller asked about, echoed back unchanged.
    pub current_path: String,
    /// Direct children of `parent_path`, sorted by display name.
    pub pages: Vec<SiblingPage>,
}

// ---------------------------------------------------------------------------
// ContentUrl
// ---------------------------------------------------------------------------

/// Published location of a content item, looked up by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUrl {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hierarchical_path: Option<String>,
}
