//! Hierarchical path segmentation and parent resolution.
//!
//! Paths are compared by their segments, never by string length: leading,
//! trailing and doubled slashes all normalize away.

use serde::Serialize;

/// A slash-delimited path split into its non-empty segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HierarchicalPath {
    segments: Vec<String>,
}

impl HierarchicalPath {
    /// Split on `/` and drop empty segments.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    /// Number of segments. Root items have depth 1.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The first `len` segments (clamped to the available count).
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }

    /// Rejoin with a leading slash. The empty path renders as `/`.
    pub fn to_path_string(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl std::fmt::Display for HierarchicalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_path_string())
    }
}

/// Segment count of a slash-delimited path.
pub fn segment_depth(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

// ---------------------------------------------------------------------------
// ParentResolution
// ---------------------------------------------------------------------------

/// Where to look for the siblings of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentResolution {
    /// Parent segments; at least one unless the input itself was empty.
    pub parent_segments: HierarchicalPath,
    /// `/` + segments.
    pub parent_path: String,
    /// `parent_path` with exactly one trailing slash; the query scope.
    pub parent_path_with_trailing_slash: String,
}

impl ParentResolution {
    /// Depth every direct child of this parent has.
    pub fn child_depth(&self) -> usize {
        self.parent_segments.depth() + 1
    }
}

/// Ascend `depth` levels from `current_path`, never above the first segment.
///
/// Flooring at one segment keeps a shallow path from widening the sibling
/// query to the whole site. A `depth` of zero is treated as one. Total for
/// every input: `""` resolves to the root, `/`.
pub fn resolve_parent(current_path: &str, depth: usize) -> ParentResolution {
    let segments = HierarchicalPath::parse(current_path);
    let keep = segments.depth().saturating_sub(depth.max(1)).max(1);
    let parent_segments = segments.prefix(keep);
    let parent_path = parent_segments.to_path_string();

    let parent_path_with_trailing_slash = if parent_path.ends_with('/') {
        parent_path.clone()
    } else {
        format!("{parent_path}/")
    };

    ParentResolution {
        parent_segments,
        parent_path,
        parent_path_with_trailing_slash,
    }
}
