//! HTTP GraphQL client for the content graph.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use sitenav_shared::{AppConfig, Result, SitenavError, resolve_single_key};

use crate::ContentGraph;
use crate::operations::GraphOperation;

/// Default timeout in seconds for graph requests.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User-Agent string for graph requests.
const USER_AGENT: &str = concat!("sitenav/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for [`HttpGraphClient`].
#[derive(Debug, Clone)]
pub struct GraphClientOptions {
    /// GraphQL endpoint.
    pub endpoint: String,
    /// Single key sent as `Authorization: epi-single <key>`. Anonymous when `None`.
    pub single_key: Option<String>,
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl GraphClientOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            single_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl From<&AppConfig> for GraphClientOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            endpoint: config.graph.endpoint.clone(),
            single_key: resolve_single_key(config),
            timeout_secs: config.graph.timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphRequest<'a> {
    query: &'a str,
    operation_name: &'a str,
    variables: &'a Value,
}

#[derive(Deserialize)]
struct GraphResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphErrorEntry>,
}

#[derive(Deserialize)]
struct GraphErrorEntry {
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// reqwest-backed [`ContentGraph`].
#[derive(Debug, Clone)]
pub struct HttpGraphClient {
    client: Client,
    endpoint: Url,
    single_key: Option<String>,
}

impl HttpGraphClient {
    /// Build a client. Fails if the endpoint is not an absolute URL.
    pub fn new(opts: GraphClientOptions) -> Result<Self> {
        let endpoint = Url::parse(&opts.endpoint).map_err(|e| {
            SitenavError::validation(format!("invalid graph endpoint '{}': {e}", opts.endpoint))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| SitenavError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            single_key: opts.single_key,
        })
    }

    /// Build a client from the loaded application config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(GraphClientOptions::from(config))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ContentGraph for HttpGraphClient {
    #[instrument(skip_all, fields(operation = operation.name))]
    async fn query(&self, operation: &GraphOperation, variables: Value) -> Result<Value> {
        let body = GraphRequest {
            query: operation.document,
            operation_name: operation.name,
            variables: &variables,
        };

        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(key) = &self.single_key {
            request = request.header(reqwest::header::AUTHORIZATION, format!("epi-single {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SitenavError::Transport(format!("{}: {e}", operation.name)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitenavError::Transport(format!(
                "{}: HTTP {status}",
                operation.name
            )));
        }

        let parsed: GraphResponse = response.json().await.map_err(|e| {
            SitenavError::decode(format!("{}: unreadable response: {e}", operation.name))
        })?;

        if let Some(first) = parsed.errors.first() {
            return Err(SitenavError::Transport(format!(
                "{}: {} ({} GraphQL error(s))",
                operation.name,
                first.message,
                parsed.errors.len()
            )));
        }

        match parsed.data {
            Some(data) if !data.is_null() => {
                debug!("graph query succeeded");
                Ok(data)
            }
            _ => Err(SitenavError::decode(format!(
                "{}: response has no data",
                operation.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{CONTENT_URL, SIBLING_PAGES};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, key: Option<&str>) -> HttpGraphClient {
        let mut opts = GraphClientOptions::new(format!("{}/content/v2", server.uri()));
        opts.single_key = key.map(String::from);
        HttpGraphClient::new(opts).unwrap()
    }

    #[test]
    fn rejects_relative_endpoint() {
        let err = HttpGraphClient::new(GraphClientOptions::new("/content/v2")).unwrap_err();
        assert!(err.to_string().contains("invalid graph endpoint"));
    }

    #[tokio::test]
    async fn posts_named_operation_with_single_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/content/v2"))
            .and(header("authorization", "epi-single test-key"))
            .and(body_partial_json(json!({
                "operationName": "getSiblingPages",
                "variables": { "parentPath": "/a/", "limit": 100 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "pages": { "items": [] } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("test-key"));
        let data = client
            .query(&SIBLING_PAGES, json!({ "parentPath": "/a/", "limit": 100 }))
            .await
            .unwrap();

        assert_eq!(data["pages"]["items"], json!([]));
    }

    #[tokio::test]
    async fn http_error_is_transport() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.query(&CONTENT_URL, json!({ "key": "k" })).await.unwrap_err();

        assert!(matches!(err, SitenavError::Transport(_)));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn graphql_errors_are_transport() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Unknown argument \"foo\"" }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.query(&CONTENT_URL, json!({ "key": "k" })).await.unwrap_err();

        assert!(matches!(err, SitenavError::Transport(_)));
        assert!(err.to_string().contains("Unknown argument"));
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.query(&CONTENT_URL, json!({ "key": "k" })).await.unwrap_err();

        assert!(matches!(err, SitenavError::Decode { .. }));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn missing_data_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.query(&CONTENT_URL, json!({ "key": "k" })).await.unwrap_err();

        assert!(err.to_string().contains("no data"));
    }
}
