//! Canonical URL lookup by content key.
//!
//! Preview requests arrive on a generic preview route; this resolves where
//! the previewed item is actually published.

use tracing::{instrument, warn};

use sitenav_graph::{ContentGraph, GraphLocale, fetch_content_url};
use sitenav_shared::{ContentUrl, Degraded, FailSoft};

/// Resolve the published URL of the item with `key`.
///
/// No match yields `Ok` with both fields `None`. A graph failure yields the
/// same null value as the degraded fallback.
#[instrument(skip(graph))]
pub async fn resolve_content_url<G: ContentGraph + ?Sized>(
    key: &str,
    locale: Option<&str>,
    graph: &G,
) -> FailSoft<ContentUrl> {
    let graph_locale = locale.and_then(GraphLocale::from_app_locale);

    fetch_content_url(graph, key, graph_locale.as_ref())
        .await
        .map_err(|error| {
            warn!(%error, "error fetching content URL");
            Degraded::new(ContentUrl::default(), error)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sitenav_graph::StaticGraph;

    #[tokio::test]
    async fn resolves_first_item() {
        let graph = StaticGraph::with_data(json!({
            "content": { "items": [
                { "_metadata": { "key": "abc", "url": {
                    "default": "/sv/kollektivavtal/apoteksavtalet/",
                    "hierarchical": "/kollektivavtal/apoteksavtalet/"
                } } }
            ] }
        }));

        let url = resolve_content_url("abc", Some("sv"), &graph).await.unwrap();

        assert_eq!(url.url.as_deref(), Some("/sv/kollektivavtal/apoteksavtalet/"));
        assert_eq!(
            url.hierarchical_path.as_deref(),
            Some("/kollektivavtal/apoteksavtalet/")
        );
        assert_eq!(graph.calls()[0].variables, json!({ "key": "abc", "locale": "sv" }));
    }

    #[tokio::test]
    async fn not_found_is_not_an_error() {
        let graph = StaticGraph::with_data(json!({ "content": { "items": [] } }));

        let url = resolve_content_url("missing", None, &graph).await.unwrap();

        assert_eq!(url, ContentUrl::default());
    }

    #[tokio::test]
    async fn failure_degrades_to_nulls() {
        let graph = StaticGraph::failing("timeout");

        let degraded = resolve_content_url("abc", None, &graph).await.unwrap_err();

        assert!(degraded.fallback.url.is_none());
        assert!(degraded.fallback.hierarchical_path.is_none());
        assert!(degraded.error.to_string().contains("timeout"));
    }
}
