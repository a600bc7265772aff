use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::dom::Document;
use crate::error::LookupError;
use crate::util::append_query;

/// PhEDEx data-service call listing the file replicas of a dataset.
pub const FILE_REPLICAS_URL: &str = "https://cmsweb.cern.ch/phedex/datasvc/xml/prod/FileReplicas";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// FileReplicas endpoint; the dataset is appended as `?dataset=<name>`.
    pub endpoint: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: FILE_REPLICAS_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    endpoint: String,
    http: HttpClient,
}

impl Client {
    /// Creates a client for the production PhEDEx endpoint.
    ///
    /// This is equivalent to `Client::with_config(ClientConfig::default())`.
    pub fn new() -> Result<Self, LookupError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(cfg: ClientConfig) -> Result<Self, LookupError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("phedex-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("phedex-rs")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            endpoint: cfg.endpoint,
            http,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request URL for `dataset`. The name is inserted as given, without escaping.
    pub fn replicas_url(&self, dataset: &str) -> String {
        append_query(&self.endpoint, &[("dataset", dataset)])
    }

    /// Fetches and parses the replica listing of `dataset`.
    ///
    /// One GET is issued, with no retry. Connection failures, non-success
    /// statuses and unparsable bodies are returned unchanged.
    pub fn file_replicas(&self, dataset: &str) -> Result<Document, LookupError> {
        let url = self.replicas_url(dataset);
        tracing::debug!(%url, "fetching file replicas");

        let resp = self.http.get(&url).send()?.error_for_status()?;
        let body = resp.bytes()?;
        Ok(Document::parse_bytes(&body)?)
    }
}

/// Fetches the replica listing of `dataset` from the production endpoint.
pub fn get_file_replicas(dataset: &str) -> Result<Document, LookupError> {
    Client::new()?.file_replicas(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url_points_at_production_service() {
        let client = Client::new().unwrap();
        assert_eq!(client.endpoint(), FILE_REPLICAS_URL);
        assert_eq!(
            client.replicas_url("/MinimumBias/Run2011A-v1/RAW"),
            "https://cmsweb.cern.ch/phedex/datasvc/xml/prod/FileReplicas?dataset=/MinimumBias/Run2011A-v1/RAW"
        );
    }

    #[test]
    fn dataset_is_interpolated_verbatim() {
        let client = Client::new().unwrap().with_endpoint("http://localhost:9/FileReplicas");
        assert_eq!(
            client.replicas_url("/a b/c&node=T1#x"),
            "http://localhost:9/FileReplicas?dataset=/a b/c&node=T1#x"
        );
    }

    #[test]
    fn config_endpoint_is_used() {
        let cfg = ClientConfig {
            endpoint: "http://mirror.example/FileReplicas".to_string(),
        };
        let client = Client::with_config(cfg).unwrap();
        assert_eq!(
            client.replicas_url("/A/B/C"),
            "http://mirror.example/FileReplicas?dataset=/A/B/C"
        );
    }

    #[test]
    fn unreachable_host_returns_transport_error() {
        // Port 1 on loopback refuses connections.
        let client = Client::new()
            .unwrap()
            .with_endpoint("http://127.0.0.1:1/FileReplicas");
        match client.file_replicas("/A/B/C") {
            Err(LookupError::Http(e)) => {
                assert!(e.is_connect(), "expected connect error, got {e:?}");
                assert!(e.status().is_none());
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
