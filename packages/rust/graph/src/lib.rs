//! Content graph collaborator.
//!
//! The presentation layer never talks HTTP itself. It hands a named GraphQL
//! operation and a variables bag to a [`ContentGraph`] and gets the `data`
//! object back. Transport, authentication and caching live behind that trait.
//!
//! This crate provides:
//! - [`ContentGraph`] — the `query(operation, variables) -> data` contract
//! - [`HttpGraphClient`] — the reqwest-backed implementation
//! - [`operations`] — the named documents plus typed fetchers that decode
//!   their results into [`ContentItem`](sitenav_shared::ContentItem)s
//! - [`GraphLocale`] — app locale → graph locale mapping
//! - [`StaticGraph`] — canned in-memory graph for tests and demos

mod client;
mod locale;
pub mod operations;
mod static_graph;

use async_trait::async_trait;
use serde_json::Value;
use sitenav_shared::Result;

pub use client::{GraphClientOptions, HttpGraphClient};
pub use locale::GraphLocale;
pub use operations::{
    CONTENT_URL, GraphOperation, SIBLING_PAGES, fetch_content_url, fetch_sibling_items,
};
pub use static_graph::{RecordedQuery, StaticGraph};

/// A queryable content graph.
///
/// Implementations return the GraphQL `data` object on success. Any failure
/// (network, HTTP status, GraphQL `errors`, unreadable body) is an `Err`.
#[async_trait]
pub trait ContentGraph: Send + Sync {
    async fn query(&self, operation: &GraphOperation, variables: Value) -> Result<Value>;
}

#[async_trait]
impl<G: ContentGraph + ?Sized> ContentGraph for std::sync::Arc<G> {
    async fn query(&self, operation: &GraphOperation, variables: Value) -> Result<Value> {
        (**self).query(operation, variables).await
    }
}
