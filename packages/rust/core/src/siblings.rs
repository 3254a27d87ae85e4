//! Sibling page resolution.
//!
//! Given the page being viewed, list the other pages under the same parent:
//! one query scoped to the parent path, then an exact-depth filter, URL
//! dedup, and a locale-aware sort by display name.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use sitenav_graph::{ContentGraph, GraphLocale, fetch_sibling_items};
use sitenav_shared::{
    ContentItem, Degraded, FailSoft, SiblingConfig, SiblingPage, SiblingPages,
};

use crate::collation::LocaleCollator;
use crate::path::{ParentResolution, resolve_parent, segment_depth};

/// Input to [`resolve_siblings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingQuery {
    /// Path of the page being viewed.
    pub current_path: String,
    /// App-level locale; picks both the query language and the collation.
    pub locale: Option<String>,
    /// Levels to ascend to reach the common parent. Defaults to 1.
    pub depth: usize,
}

impl SiblingQuery {
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            locale: None,
            depth: 1,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }
}

/// Resolve the sibling pages of `query.current_path`.
///
/// Issues exactly one graph query. On any graph failure the degraded value
/// has an empty `parent_path`, the caller's `current_path` and no pages.
#[instrument(skip_all, fields(current_path = %query.current_path, depth = query.depth))]
pub async fn resolve_siblings<G: ContentGraph + ?Sized>(
    query: &SiblingQuery,
    graph: &G,
    config: &SiblingConfig,
) -> FailSoft<SiblingPages> {
    let parent = resolve_parent(&query.current_path, query.depth);
    let graph_locale = query.locale.as_deref().and_then(GraphLocale::from_app_locale);

    debug!(parent = %parent.parent_path, "resolved parent path");

    let items = match fetch_sibling_items(
        graph,
        &parent.parent_path_with_trailing_slash,
        graph_locale.as_ref(),
        config.page_limit,
    )
    .await
    {
        Ok(items) => items,
        Err(error) => {
            warn!(%error, "error fetching sibling pages");
            return Err(Degraded::new(
                SiblingPages {
                    parent_path: String::new(),
                    current_path: query.current_path.clone(),
                    pages: Vec::new(),
                },
                error,
            ));
        }
    };

    let pages = sort_siblings(
        select_siblings(items, &parent),
        query.locale.as_deref(),
        &config.collation_fallback,
    );

    Ok(SiblingPages {
        parent_path: parent.parent_path,
        current_path: query.current_path.clone(),
        pages,
    })
}

/// Keep direct children of `parent`, first occurrence per non-empty URL,
/// in received order.
pub fn select_siblings(items: Vec<ContentItem>, parent: &ParentResolution) -> Vec<SiblingPage> {
    let child_depth = parent.child_depth();
    let received = items.len();

    let children: Vec<SiblingPage> = items
        .into_iter()
        .map(|item| SiblingPage {
            depth: segment_depth(&item.hierarchical_url),
            key: item.key,
            display_name: item.display_name,
            url: item.canonical_url,
            hierarchical_path: item.hierarchical_url,
        })
        .filter(|page| page.depth == child_depth)
        .collect();
    let direct = children.len();

    let mut seen = HashSet::new();
    let pages: Vec<SiblingPage> = children
        .into_iter()
        .filter(|page| !page.url.is_empty() && seen.insert(page.url.clone()))
        .collect();

    debug!(received, direct, unique = pages.len(), "filtered sibling candidates");
    pages
}

/// Stable sort by display name under `locale`, or `fallback` when unset.
pub fn sort_siblings(
    mut pages: Vec<SiblingPage>,
    locale: Option<&str>,
    fallback: &str,
) -> Vec<SiblingPage> {
    let collator = LocaleCollator::with_fallback(locale, fallback);
    pages.sort_by(|a, b| collator.compare(&a.display_name, &b.display_name));
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use sitenav_graph::StaticGraph;
    use sitenav_shared::SitenavError;

    fn item(name: &str, url: &str, hierarchical: &str) -> Value {
        json!({
            "_metadata": {
                "key": format!("key-{name}"),
                "displayName": name,
                "url": { "default": url, "hierarchical": hierarchical }
            }
        })
    }

    fn graph_with(items: Vec<Value>) -> StaticGraph {
        StaticGraph::with_data(json!({ "pages": { "items": items } }))
    }

    fn names(pages: &[SiblingPage]) -> Vec<&str> {
        pages.iter().map(|p| p.display_name.as_str()).collect()
    }

    #[tokio::test]
    async fn end_to_end_fixture() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/sibling-pages.fixture.json")
            .expect("read sibling fixture");
        let data: Value = serde_json::from_str(&fixture).expect("parse fixture");
        let graph = StaticGraph::with_data(data);

        let query = SiblingQuery::new("/kollektivavtal/apoteksavtalet/standard22");
        let result = resolve_siblings(&query, &graph, &SiblingConfig::default())
            .await
            .unwrap();

        assert_eq!(result.parent_path, "/kollektivavtal/apoteksavtalet");
        assert_eq!(result.current_path, "/kollektivavtal/apoteksavtalet/standard22");
        // Parent (depth 2) and grandchild (depth 4) dropped, duplicate URL
        // collapsed onto its first occurrence, Ö after S under "sv".
        assert_eq!(names(&result.pages), ["Arbetstid", "Standard 22", "Övertid"]);
        assert!(result.pages.iter().all(|p| p.depth == 3));

        let calls = graph.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].variables["parentPath"], "/kollektivavtal/apoteksavtalet/");
        assert_eq!(calls[0].variables["limit"], 100);
    }

    #[tokio::test]
    async fn only_direct_children_survive() {
        let graph = graph_with(vec![
            item("Parent", "/en/a/", "/a/"),
            item("Child", "/en/a/b/", "/a/b/"),
            item("Grandchild", "/en/a/b/c/", "/a/b/c/"),
        ]);

        let result = resolve_siblings(&SiblingQuery::new("/a/b"), &graph, &SiblingConfig::default())
            .await
            .unwrap();

        assert_eq!(names(&result.pages), ["Child"]);
    }

    #[tokio::test]
    async fn first_duplicate_url_wins() {
        let graph = graph_with(vec![
            item("First", "/en/a/x/", "/a/x/"),
            item("Second", "/en/a/x/", "/a/x/"),
        ]);

        let result = resolve_siblings(&SiblingQuery::new("/a/y"), &graph, &SiblingConfig::default())
            .await
            .unwrap();

        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.pages[0].key, "key-First");
    }

    #[tokio::test]
    async fn empty_urls_are_dropped() {
        let graph = graph_with(vec![
            item("No URL", "", "/a/x/"),
            item("Also no URL", "", "/a/z/"),
            item("Has URL", "/en/a/y/", "/a/y/"),
        ]);

        let result = resolve_siblings(&SiblingQuery::new("/a/y"), &graph, &SiblingConfig::default())
            .await
            .unwrap();

        assert_eq!(names(&result.pages), ["Has URL"]);
    }

    #[tokio::test]
    async fn sorts_with_swedish_collation_by_default() {
        let graph = graph_with(vec![
            item("Örnen", "/en/djur/ornen/", "/djur/ornen/"),
            item("Anka", "/en/djur/anka/", "/djur/anka/"),
            item("Åsna", "/en/djur/asna/", "/djur/asna/"),
            item("Bäver", "/en/djur/baver/", "/djur/baver/"),
            item("Ärla", "/en/djur/arla/", "/djur/arla/"),
        ]);

        let result =
            resolve_siblings(&SiblingQuery::new("/djur/anka"), &graph, &SiblingConfig::default())
                .await
                .unwrap();

        assert_eq!(names(&result.pages), ["Anka", "Bäver", "Åsna", "Ärla", "Örnen"]);
    }

    #[tokio::test]
    async fn requested_locale_drives_query_and_collation() {
        let graph = graph_with(vec![
            item("Örnen", "/en/djur/ornen/", "/djur/ornen/"),
            item("Zebra", "/en/djur/zebra/", "/djur/zebra/"),
        ]);

        let query = SiblingQuery::new("/djur/zebra").with_locale("en");
        let result = resolve_siblings(&query, &graph, &SiblingConfig::default())
            .await
            .unwrap();

        assert_eq!(names(&result.pages), ["Örnen", "Zebra"]);
        assert_eq!(graph.calls()[0].variables["locale"], "en");
    }

    #[tokio::test]
    async fn deeper_ascent_widens_parent() {
        let graph = graph_with(vec![item("B", "/en/a/b/", "/a/b/")]);

        let query = SiblingQuery::new("/a/b/c").with_depth(2);
        let result = resolve_siblings(&query, &graph, &SiblingConfig::default())
            .await
            .unwrap();

        assert_eq!(result.parent_path, "/a");
        assert_eq!(names(&result.pages), ["B"]);
        assert_eq!(graph.calls()[0].variables["parentPath"], "/a/");
    }

    #[tokio::test]
    async fn graph_failure_degrades() {
        let graph = StaticGraph::failing("connection refused");

        let query = SiblingQuery::new("/a/b");
        let degraded = resolve_siblings(&query, &graph, &SiblingConfig::default())
            .await
            .unwrap_err();

        assert!(degraded.fallback.pages.is_empty());
        assert_eq!(degraded.fallback.parent_path, "");
        assert_eq!(degraded.fallback.current_path, "/a/b");
        assert!(matches!(degraded.error, SitenavError::Transport(_)));
    }

    #[tokio::test]
    async fn malformed_response_degrades() {
        let graph = StaticGraph::with_data(json!({ "pages": { "items": 42 } }));

        let degraded = resolve_siblings(&SiblingQuery::new("/a/b"), &graph, &SiblingConfig::default())
            .await
            .unwrap_err();

        assert!(degraded.error.is_transport());
        assert!(degraded.fallback.pages.is_empty());
    }

    #[tokio::test]
    async fn identical_inputs_give_identical_output() {
        let items = vec![
            item("Gamma", "/en/a/g/", "/a/g/"),
            item("alpha", "/en/a/a/", "/a/a/"),
            item("Beta", "/en/a/b/", "/a/b/"),
            item("Beta", "/en/a/b2/", "/a/b2/"),
        ];
        let query = SiblingQuery::new("/a/g");
        let config = SiblingConfig::default();

        let first = resolve_siblings(&query, &graph_with(items.clone()), &config)
            .await
            .unwrap();
        let second = resolve_siblings(&query, &graph_with(items), &config)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        // Equal names keep their received order.
        assert_eq!(first.pages[1].url, "/en/a/b/");
        assert_eq!(first.pages[2].url, "/en/a/b2/");
    }
}
