//! Navigation logic for the content site's presentation layer.
//!
//! This crate turns content-graph answers into what the page chrome shows:
//! - [`path`] — hierarchical path segmentation and parent resolution
//! - [`siblings`] — sibling listing: one scoped query, depth filter, URL dedup, collation sort
//! - [`content_url`] — canonical URL lookup by content key
//! - [`collation`] — locale-aware display-name ordering
//! - [`breadcrumbs`], [`navigation`] — breadcrumb trail and sidebar model
//! - [`comments`] — paragraph comment markers and the selected-comment state

pub mod breadcrumbs;
pub mod collation;
pub mod comments;
pub mod content_url;
pub mod navigation;
pub mod path;
pub mod siblings;

pub use content_url::resolve_content_url;
pub use path::{HierarchicalPath, ParentResolution, resolve_parent};
pub use siblings::{SiblingQuery, resolve_siblings};
