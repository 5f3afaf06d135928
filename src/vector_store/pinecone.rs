//! Pinecone vector store backed by the REST data-plane API.

use super::{QueryMatch, RecordMetadata, VectorRecord, VectorStore};
use crate::error::{Result, TalkRagError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Control-plane endpoint used to look up an index's data-plane host.
pub const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

const API_VERSION: &str = "2024-07";

/// A [`VectorStore`] backed by a hosted Pinecone index.
pub struct PineconeVectorStore {
    client: reqwest::Client,
    api_key: String,
    host: Url,
    namespace: Option<String>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Deserialize)]
struct PineconeMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
}

impl PineconeVectorStore {
    /// Create a store talking to a known data-plane host.
    pub fn new(
        host: &str,
        api_key: &str,
        namespace: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Self::http_client(timeout)?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            host: Self::parse_host(host)?,
            namespace: namespace.filter(|ns| !ns.is_empty()),
        })
    }

    /// Create a store for `index_name`, resolving its host when not given.
    pub async fn connect(
        index_name: &str,
        api_key: &str,
        host: Option<&str>,
        namespace: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let host = match host {
            Some(h) => h.to_string(),
            None => {
                let client = Self::http_client(timeout)?;
                Self::resolve_host(&client, CONTROL_PLANE_URL, api_key, index_name).await?
            }
        };
        info!("Using Pinecone index '{}' at {}", index_name, host);
        Self::new(&host, api_key, namespace, timeout)
    }

    /// Ask the control plane for the data-plane host of an index.
    pub async fn resolve_host(
        client: &reqwest::Client,
        control_plane: &str,
        api_key: &str,
        index_name: &str,
    ) -> Result<String> {
        let url = Self::parse_host(control_plane)?
            .join(&format!("indexes/{}", index_name))
            .map_err(|e| TalkRagError::Config(format!("Invalid index name: {}", e)))?;

        let response = client
            .get(url)
            .header("Api-Key", api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TalkRagError::Config(format!(
                "Cannot describe index '{}' ({}): {}",
                index_name, status, body
            )));
        }

        let description: IndexDescription = response.json().await?;
        Ok(description.host)
    }

    fn http_client(timeout: Duration) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TalkRagError::Config(format!("Failed to create HTTP client: {}", e)))
    }

    /// Accept hosts with or without a scheme, as the control plane omits it.
    fn parse_host(host: &str) -> Result<Url> {
        let with_scheme = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };
        let normalized = format!("{}/", with_scheme.trim_end_matches('/'));
        Url::parse(&normalized)
            .map_err(|e| TalkRagError::Config(format!("Invalid index host '{}': {}", host, e)))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.host
            .join(path)
            .map_err(|e| TalkRagError::VectorStore(format!("Invalid endpoint {}: {}", path, e)))
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TalkRagError::ProviderStatus {
                service: format!("Pinecone {}", path),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let request = UpsertRequest {
            vectors: records,
            namespace: self.namespace.as_deref(),
        };
        let response: UpsertResponse = self.post("vectors/upsert", &request).await?;

        debug!("Upserted {} records", response.upserted_count);
        Ok(response.upserted_count)
    }

    #[instrument(skip(self, vector))]
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };
        let response: QueryResponse = self.post("query", &request).await?;

        let matches = response
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.and_then(|value| {
                    serde_json::from_value::<RecordMetadata>(value)
                        .map_err(|e| warn!("Match {} has unexpected metadata: {}", m.id, e))
                        .ok()
                });
                QueryMatch {
                    id: m.id,
                    score: m.score,
                    metadata,
                }
            })
            .collect::<Vec<_>>();

        debug!("Query returned {} matches", matches.len());
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use mockito::Matcher;
    use serde_json::json;

    fn store(url: &str, namespace: Option<&str>) -> PineconeVectorStore {
        PineconeVectorStore::new(
            url,
            "pc-test",
            namespace.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn record(id: &str) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            values: vec![0.1, 0.2],
            metadata: RecordMetadata {
                talk_id: "1".to_string(),
                title: "T".to_string(),
                text: "Title: T\nSpeaker: S\nContent: hi".to_string(),
            },
        }
    }

    #[test]
    fn test_parse_host_adds_scheme() {
        let url = PineconeVectorStore::parse_host("talks-abc123.svc.pinecone.io").unwrap();
        assert_eq!(url.as_str(), "https://talks-abc123.svc.pinecone.io/");

        let url = PineconeVectorStore::parse_host("http://localhost:5080/").unwrap();
        assert_eq!(url.join("query").unwrap().as_str(), "http://localhost:5080/query");
    }

    #[tokio::test]
    async fn test_upsert_sends_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/vectors/upsert")
            .match_header("api-key", "pc-test")
            .match_body(Matcher::PartialJson(json!({
                "vectors": [{
                    "id": "1_0",
                    "metadata": {"talk_id": "1", "title": "T"}
                }],
                "namespace": "talks"
            })))
            .with_status(200)
            .with_body(r#"{"upsertedCount": 1}"#)
            .create_async()
            .await;

        let written = store(&server.url(), Some("talks"))
            .upsert(&[record("1_0")])
            .await
            .unwrap();

        assert_eq!(written, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upsert_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/vectors/upsert")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let err = store(&server.url(), None)
            .upsert(&[record("1_0")])
            .await
            .unwrap_err();
        assert!(matches!(err, TalkRagError::ProviderStatus { status: 503, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_query_preserves_rank_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/query")
            .match_body(Matcher::PartialJson(json!({
                "topK": 2,
                "includeMetadata": true
            })))
            .with_status(200)
            .with_body(
                json!({
                    "matches": [
                        {"id": "7_3", "score": 0.91,
                         "metadata": {"talk_id": "7", "title": "B", "text": "second talk"}},
                        {"id": "1_0", "score": 0.85,
                         "metadata": {"talk_id": "1", "title": "A", "text": "first talk"}}
                    ],
                    "namespace": ""
                })
                .to_string(),
            )
            .create_async()
            .await;

        let matches = store(&server.url(), None)
            .query(&[0.1, 0.2], 2, true)
            .await
            .unwrap();

        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["7_3", "1_0"]);
        assert_eq!(matches[0].metadata.as_ref().unwrap().title, "B");
    }

    #[tokio::test]
    async fn test_query_without_matches() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/query")
            .with_status(200)
            .with_body(r#"{"matches": [], "namespace": ""}"#)
            .create_async()
            .await;

        let matches = store(&server.url(), None).query(&[0.1], 5, true).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_host() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/indexes/talks")
            .match_header("api-key", "pc-test")
            .with_status(200)
            .with_body(r#"{"name": "talks", "host": "talks-abc123.svc.pinecone.io"}"#)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let host = PineconeVectorStore::resolve_host(&client, &server.url(), "pc-test", "talks")
            .await
            .unwrap();
        assert_eq!(host, "talks-abc123.svc.pinecone.io");
    }

    #[tokio::test]
    async fn test_resolve_unknown_index() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/indexes/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let err = PineconeVectorStore::resolve_host(&client, &server.url(), "pc-test", "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, TalkRagError::Config(_)));
    }

    #[tokio::test]
    async fn test_rejected_upsert_is_attempted_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/vectors/upsert")
            .with_status(400)
            .with_body("Vector dimension 2 does not match the dimension of the index 1536")
            .expect(1)
            .create_async()
            .await;

        let store = store(&server.url(), None);
        let records = [record("1_0")];
        let err = RetryPolicy::new(5, Duration::ZERO)
            .run("upsert", || store.upsert(&records))
            .await
            .unwrap_err();

        assert!(matches!(err, TalkRagError::ProviderStatus { status: 400, .. }));
        assert!(err.to_string().contains("dimension"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unavailable_upsert_uses_retry_budget() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/vectors/upsert")
            .with_status(503)
            .with_body("unavailable")
            .expect(3)
            .create_async()
            .await;

        let store = store(&server.url(), None);
        let records = [record("1_0")];
        let result = RetryPolicy::new(3, Duration::ZERO)
            .run("upsert", || store.upsert(&records))
            .await;

        assert!(result.is_err());
        mock.assert_async().await;
    }
}
