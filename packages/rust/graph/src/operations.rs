//! Named graph operations and typed fetchers.
//!
//! Each fetcher issues exactly one query and decodes the `data` object into
//! domain types. Missing or null fields are tolerated the way the graph
//! actually returns them: a page without a display name is "Untitled", a page
//! without a URL gets an empty one and is filtered out further up.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use sitenav_shared::{ContentItem, ContentUrl, Result, SitenavError, UNTITLED};

use crate::{ContentGraph, GraphLocale};

/// A named GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOperation {
    /// `operationName` sent with the request.
    pub name: &'static str,
    /// The GraphQL document.
    pub document: &'static str,
}

/// Pages whose hierarchical URL starts with `$parentPath`.
pub const SIBLING_PAGES: GraphOperation = GraphOperation {
    name: "getSiblingPages",
    document: r#"query getSiblingPages($parentPath: String!, $locale: [Locales], $limit: Int) {
  pages: _Page(
    where: { _metadata: { url: { hierarchical: { startsWith: $parentPath } } } }
    locale: $locale
    limit: $limit
  ) {
    items {
      _metadata {
        key
        displayName
        url { default hierarchical }
      }
    }
  }
}"#,
};

/// A single content item by key.
pub const CONTENT_URL: GraphOperation = GraphOperation {
    name: "getContentUrl",
    document: r#"query getContentUrl($key: String!, $locale: [Locales]) {
  content: _Content(
    where: { _metadata: { key: { eq: $key } } }
    locale: $locale
    limit: 1
  ) {
    items {
      _metadata {
        key
        url { default hierarchical }
      }
    }
  }
}"#,
};

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct ItemCollection {
    #[serde(default)]
    items: Option<Vec<Option<RawItem>>>,
}

#[derive(Debug, Deserialize)]
struct SiblingPagesData {
    #[serde(default)]
    pages: Option<ItemCollection>,
}

#[derive(Debug, Deserialize)]
struct ContentUrlData {
    #[serde(default)]
    content: Option<ItemCollection>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "_metadata", default)]
    metadata: Option<RawMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    url: Option<RawUrl>,
}

#[derive(Debug, Deserialize)]
struct RawUrl {
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    hierarchical: Option<String>,
}

impl ItemCollection {
    /// Non-null items in received order.
    fn into_items(self) -> impl Iterator<Item = RawItem> {
        self.items.unwrap_or_default().into_iter().flatten()
    }
}

impl From<RawItem> for ContentItem {
    fn from(item: RawItem) -> Self {
        let meta = item.metadata;
        let url = meta.as_ref().and_then(|m| m.url.as_ref());
        Self {
            key: meta.as_ref().and_then(|m| m.key.clone()).unwrap_or_default(),
            display_name: meta
                .as_ref()
                .and_then(|m| m.display_name.clone())
                .unwrap_or_else(|| UNTITLED.to_string()),
            canonical_url: url.and_then(|u| u.default.clone()).unwrap_or_default(),
            hierarchical_url: url.and_then(|u| u.hierarchical.clone()).unwrap_or_default(),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(operation: &GraphOperation, data: Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| SitenavError::decode(format!("{}: unexpected shape: {e}", operation.name)))
}

fn with_locale(mut vars: Map<String, Value>, locale: Option<&GraphLocale>) -> Value {
    if let Some(locale) = locale {
        vars.insert("locale".into(), Value::String(locale.to_string()));
    }
    Value::Object(vars)
}

// ---------------------------------------------------------------------------
// Fetchers
// ---------------------------------------------------------------------------

/// Fetch every item whose hierarchical URL starts with `parent_path`.
///
/// `parent_path` should carry a trailing slash so `/a/b/` does not also match
/// `/a/b-2/`. No pagination: at most `limit` items come back.
#[instrument(skip(graph, locale), fields(locale = ?locale.map(GraphLocale::as_str)))]
pub async fn fetch_sibling_items<G: ContentGraph + ?Sized>(
    graph: &G,
    parent_path: &str,
    locale: Option<&GraphLocale>,
    limit: u32,
) -> Result<Vec<ContentItem>> {
    let mut vars = Map::new();
    vars.insert("parentPath".into(), Value::String(parent_path.to_string()));
    vars.insert("limit".into(), Value::from(limit));

    let data = graph.query(&SIBLING_PAGES, with_locale(vars, locale)).await?;
    let decoded: SiblingPagesData = decode(&SIBLING_PAGES, data)?;

    let items: Vec<ContentItem> = decoded
        .pages
        .unwrap_or_default()
        .into_items()
        .map(ContentItem::from)
        .collect();

    debug!(count = items.len(), "sibling candidates received");
    Ok(items)
}

/// Look up the published URL of one content item.
///
/// Zero matches is not an error: both fields come back `None`.
#[instrument(skip(graph, locale), fields(locale = ?locale.map(GraphLocale::as_str)))]
pub async fn fetch_content_url<G: ContentGraph + ?Sized>(
    graph: &G,
    key: &str,
    locale: Option<&GraphLocale>,
) -> Result<ContentUrl> {
    let mut vars = Map::new();
    vars.insert("key".into(), Value::String(key.to_string()));

    let data = graph.query(&CONTENT_URL, with_locale(vars, locale)).await?;
    let decoded: ContentUrlData = decode(&CONTENT_URL, data)?;

    let url = decoded
        .content
        .unwrap_or_default()
        .into_items()
        .next()
        .and_then(|item| item.metadata)
        .and_then(|meta| meta.url);

    Ok(match url {
        Some(url) => ContentUrl {
            url: url.default,
            hierarchical_path: url.hierarchical,
        },
        None => {
            debug!("no content item matched key");
            ContentUrl::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticGraph;
    use serde_json::json;

    #[tokio::test]
    async fn decodes_fixture_and_skips_null_items() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/sibling-pages.fixture.json")
            .expect("read sibling fixture");
        let data: Value = serde_json::from_str(&fixture).expect("parse fixture");
        let graph = StaticGraph::with_data(data);

        let items = fetch_sibling_items(&graph, "/kollektivavtal/apoteksavtalet/", None, 100)
            .await
            .unwrap();

        // The fixture carries one null entry.
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].display_name, "Standard 22");
        assert_eq!(items[0].hierarchical_url, "/kollektivavtal/apoteksavtalet/standard22/");
    }

    #[tokio::test]
    async fn missing_metadata_gets_defaults() {
        let graph = StaticGraph::with_data(json!({
            "pages": { "items": [ { "_metadata": null }, { "_metadata": { "key": "k1" } } ] }
        }));

        let items = fetch_sibling_items(&graph, "/a/", None, 100).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].display_name, UNTITLED);
        assert_eq!(items[0].canonical_url, "");
        assert_eq!(items[1].key, "k1");
        assert_eq!(items[1].hierarchical_url, "");
    }

    #[tokio::test]
    async fn sends_parent_path_limit_and_locale() {
        let graph = StaticGraph::with_data(json!({ "pages": { "items": [] } }));
        let locale = GraphLocale::from_app_locale("en");

        fetch_sibling_items(&graph, "/a/b/", locale.as_ref(), 100).await.unwrap();

        let calls = graph.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].operation, "getSiblingPages");
        assert_eq!(
            calls[0].variables,
            json!({ "parentPath": "/a/b/", "limit": 100, "locale": "en" })
        );
    }

    #[tokio::test]
    async fn omits_locale_when_absent() {
        let graph = StaticGraph::with_data(json!({ "content": { "items": [] } }));

        fetch_content_url(&graph, "abc", None).await.unwrap();

        assert_eq!(graph.calls()[0].variables, json!({ "key": "abc" }));
    }

    #[tokio::test]
    async fn content_url_takes_first_item() {
        let graph = StaticGraph::with_data(json!({
            "content": { "items": [
                { "_metadata": { "key": "abc", "url": { "default": "/en/a/", "hierarchical": "/a/" } } },
                { "_metadata": { "key": "abc", "url": { "default": "/sv/a/", "hierarchical": "/a/" } } }
            ] }
        }));

        let url = fetch_content_url(&graph, "abc", None).await.unwrap();

        assert_eq!(url.url.as_deref(), Some("/en/a/"));
        assert_eq!(url.hierarchical_path.as_deref(), Some("/a/"));
    }

    #[tokio::test]
    async fn content_url_not_found_is_empty() {
        let graph = StaticGraph::with_data(json!({ "content": null }));

        let url = fetch_content_url(&graph, "missing", None).await.unwrap();

        assert_eq!(url, ContentUrl::default());
    }

    #[tokio::test]
    async fn wrong_shape_is_decode_error() {
        let graph = StaticGraph::with_data(json!({ "pages": { "items": "not-a-list" } }));

        let err = fetch_sibling_items(&graph, "/a/", None, 100).await.unwrap_err();

        assert!(matches!(err, SitenavError::Decode { .. }));
    }
}
