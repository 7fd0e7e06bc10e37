//! HTTP suggestion source for backend search endpoints.

use std::time::Duration;

use reqwest::Url;
use shopsearch_core::{RemoteConfig, SearchError, SuggestionEntry};

use crate::source::{SearchFuture, SourceKind, SuggestionSource};

/// Sends the query verbatim to a search endpoint and trusts the server's order.
///
/// `GET {endpoint}?{query_param}={query}` must answer with a JSON array of
/// entries.
#[derive(Debug, Clone)]
pub struct HttpSuggestionSource {
    http: reqwest::Client,
    endpoint: Url,
    query_param: String,
    timeout: Duration,
}

impl HttpSuggestionSource {
    /// Create a source from remote configuration.
    pub fn new(config: &RemoteConfig) -> Result<Self, SearchError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|e| SearchError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                message: e.to_string(),
            })?;
        let timeout = config.timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            query_param: config.query_param.clone(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl SuggestionSource for HttpSuggestionSource {
    fn search(&self, query: String) -> SearchFuture {
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        let query_param = self.query_param.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            if query.is_empty() {
                return Ok(Vec::new());
            }

            tracing::debug!("GET {} ({}={:?})", endpoint, query_param, query);
            let resp = http
                .get(endpoint)
                .query(&[(query_param.as_str(), query.as_str())])
                .send()
                .await
                .map_err(|e| request_error(e, timeout))?;

            if !resp.status().is_success() {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                return Err(SearchError::Status { status, body });
            }

            resp.json::<Vec<SuggestionEntry>>()
                .await
                .map_err(|e| request_error(e, timeout))
        })
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }
}

fn request_error(e: reqwest::Error, timeout: Duration) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout { duration: timeout }
    } else if e.is_decode() {
        SearchError::Decode(e.to_string())
    } else {
        SearchError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source_for(server: &MockServer) -> HttpSuggestionSource {
        let config = RemoteConfig::new(format!("{}/api/products/search", server.uri()));
        HttpSuggestionSource::new(&config).unwrap()
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = HttpSuggestionSource::new(&RemoteConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, SearchError::InvalidEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_search_preserves_server_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/search"))
            .and(query_param("q", "lap top"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 2, "label": "Laptop Stand", "slug": "laptop-stand", "price": 30.0 },
                { "id": 1, "label": "Laptop", "slug": "laptop", "price": 999.0, "salePrice": 899.0 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server).await;
        assert_eq!(source.kind(), SourceKind::Remote);

        let entries = source.search("lap top".to_string()).await.unwrap();
        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Laptop Stand", "Laptop"]);
        assert_eq!(entries[1].sale_price, Some(899.0));
        assert_eq!(entries[1].target.as_deref(), Some("laptop"));
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let source = source_for(&server).await;
        let entries = source.search("xyz123notfound".to_string()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let source = source_for(&server).await;
        let err = source.search("laptop".to_string()).await.unwrap_err();
        match err {
            SearchError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "oops": true })))
            .mount(&server)
            .await;

        let source = source_for(&server).await;
        let err = source.search("laptop".to_string()).await.unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = RemoteConfig::new(format!("{}/search", server.uri()));
        config.timeout_ms = 50;
        let source = HttpSuggestionSource::new(&config).unwrap();

        let err = source.search("laptop".to_string()).await.unwrap_err();
        assert!(matches!(err, SearchError::Timeout { .. }));
    }
}
