use super::Item;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_REDIRECTS: usize = 3;

/// Message shown for any non-success HTTP status.
///
/// The response body is never surfaced to the user.
pub const STATUS_ERROR_MESSAGE: &str = "Failed to fetch data";

/// Errors that can occur while fetching the catalog.
///
/// Everything except [`FetchError::HttpStatus`] is a transport-class failure
/// whose message is shown to the user verbatim.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    /// Transport failure reported by a source that does not use reqwest
    #[error("{0}")]
    Connection(String),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not a JSON list of items
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
    /// HTTP response with non-2xx status code
    #[error("Failed to fetch data")]
    HttpStatus(u16),
}

impl FetchError {
    /// True when the request completed but the server refused it.
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::HttpStatus(_))
    }
}

/// Opaque provider of the flat item list.
///
/// Object-safe so the session can hold an `Arc<dyn ItemSource>` and tests
/// can substitute an in-memory source.
pub trait ItemSource: Send + Sync {
    fn fetch_items(&self) -> BoxFuture<'_, Result<Vec<Item>, FetchError>>;
}

/// Fetches the catalog with a single `GET` against a fixed endpoint.
pub struct HttpItemSource {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpItemSource {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self::with_client(client, endpoint, timeout))
    }

    pub fn with_client(client: reqwest::Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The timeout covers the whole exchange, body included.
    async fn fetch(&self) -> Result<Vec<Item>, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching catalog");

        tokio::time::timeout(self.timeout, self.fetch_unbounded())
            .await
            .map_err(|_| {
                tracing::warn!(endpoint = %self.endpoint, timeout = ?self.timeout, "Catalog request timed out");
                FetchError::Timeout
            })?
    }

    async fn fetch_unbounded(&self) -> Result<Vec<Item>, FetchError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %self.endpoint, status = %status, "Catalog request rejected");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_BODY_SIZE).await?;
        let items: Vec<Item> = serde_json::from_slice(&bytes)?;
        tracing::info!(count = items.len(), "Catalog fetched");
        Ok(items)
    }
}

impl ItemSource for HttpItemSource {
    fn fetch_items(&self) -> BoxFuture<'_, Result<Vec<Item>, FetchError>> {
        self.fetch().boxed()
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CATALOG: &str = r#"[
        {"id":"1","creator":"Adam","title":"Coat","pricingOption":0,"imagePath":"1.png","price":120.5},
        {"id":"2","creator":"Bea","title":"Hat","pricingOption":1,"imagePath":"2.png","price":30}
    ]"#;

    fn source_for(server: &MockServer) -> HttpItemSource {
        let endpoint = Url::parse(&format!("{}/items", server.uri())).unwrap();
        HttpItemSource::new(endpoint, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(CATALOG)
                    .insert_header("Content-Type", "application/json"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let items = source_for(&mock_server).fetch_items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].creator, "Adam");
        assert_eq!(items[1].pricing, super::super::PricingKind::Free);
    }

    #[tokio::test]
    async fn test_status_error_ignores_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database exploded"))
            .expect(1) // No retries
            .mount(&mock_server)
            .await;

        let err = source_for(&mock_server).fetch_items().await.unwrap_err();
        assert!(err.is_status());
        assert_eq!(err.to_string(), STATUS_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_404_is_status_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        match source_for(&mock_server).fetch_items().await.unwrap_err() {
            FetchError::HttpStatus(404) => {}
            e => panic!("Expected HttpStatus(404), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&mock_server)
            .await;

        let err = source_for(&mock_server).fetch_items().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(!err.is_status());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let mock_server = MockServer::start().await;
        let source = source_for(&mock_server);
        drop(mock_server);

        let err = source.fetch_items().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
        assert_ne!(err.to_string(), STATUS_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(CATALOG)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let endpoint = Url::parse(&format!("{}/items", mock_server.uri())).unwrap();
        let source = HttpItemSource::new(endpoint, Duration::from_millis(50)).unwrap();

        let err = source.fetch_items().await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout));
        assert_eq!(err.to_string(), "Request timed out");
    }

    #[tokio::test]
    async fn test_stalled_body_times_out() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Headers promise 1000 bytes, then the body stops after a few
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 1000\r\n\r\n[{\"id\"",
                )
                .await
                .unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let endpoint = Url::parse(&format!("http://{}/items", addr)).unwrap();
        let source = HttpItemSource::new(endpoint, Duration::from_millis(200)).unwrap();

        let err = source.fetch_items().await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout));
        server.abort();
    }
}
