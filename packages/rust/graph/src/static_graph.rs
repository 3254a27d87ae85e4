//! In-memory content graph with a canned answer.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use sitenav_shared::{Result, SitenavError};

use crate::ContentGraph;
use crate::operations::GraphOperation;

/// One query as received by [`StaticGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub operation: &'static str,
    pub variables: Value,
}

#[derive(Debug)]
enum Canned {
    Data(Value),
    Fail(String),
}

/// A [`ContentGraph`] that answers every query with the same `data` object
/// (or the same transport failure) and records what it was asked.
#[derive(Debug)]
pub struct StaticGraph {
    canned: Canned,
    calls: Mutex<Vec<RecordedQuery>>,
}

impl StaticGraph {
    /// Answer every query with `data`.
    pub fn with_data(data: Value) -> Self {
        Self {
            canned: Canned::Data(data),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every query with a transport error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            canned: Canned::Fail(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContentGraph for StaticGraph {
    async fn query(&self, operation: &GraphOperation, variables: Value) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedQuery {
                operation: operation.name,
                variables,
            });
        }

        match &self.canned {
            Canned::Data(data) => Ok(data.clone()),
            Canned::Fail(message) => Err(SitenavError::Transport(message.clone())),
        }
    }
}
