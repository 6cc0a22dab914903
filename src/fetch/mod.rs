//! Dataset download.
//!
//! [`HttpClient`] is the transport seam, [`Fetcher`] is what the cleaner
//! calls on a cache miss. [`HttpFetcher`] ties the two together and
//! persists the response body to the raw cache.

mod basic;

pub use basic::BasicClient;

use crate::error::{Error, FetchError, Result};
use async_trait::async_trait;
use reqwest::{Request, Response};
use std::path::PathBuf;
use tracing::{debug, info};

/// Sends a prepared request. Wrappers can adjust the request before
/// delegating to an inner client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Issues a GET for `url` and returns the body as text.
///
/// A non-success status is treated as a transport failure.
pub async fn fetch_text<C: HttpClient>(client: &C, url: &str) -> std::result::Result<String, FetchError> {
    let parsed = url.parse().map_err(|_| FetchError::InvalidUrl {
        url: url.to_string(),
    })?;
    let req = Request::new(reqwest::Method::GET, parsed);

    let http_err = |source| FetchError::Http {
        url: url.to_string(),
        source,
    };

    let resp = client
        .execute(req)
        .await
        .and_then(Response::error_for_status)
        .map_err(http_err)?;

    resp.text().await.map_err(http_err)
}

/// Populates the raw cache with a fresh copy of the dataset.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Downloads the dataset, writes it to the raw cache and returns the text.
    async fn fetch(&self) -> Result<String>;
}

/// [`Fetcher`] backed by an [`HttpClient`].
pub struct HttpFetcher<C> {
    client: C,
    url: String,
    cache_path: PathBuf,
}

impl<C: HttpClient> HttpFetcher<C> {
    pub fn new(client: C, url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            url: url.into(),
            cache_path: cache_path.into(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> Fetcher for HttpFetcher<C> {
    #[tracing::instrument(skip(self), fields(url = %self.url, cache = %self.cache_path.display()))]
    async fn fetch(&self) -> Result<String> {
        debug!("Downloading dataset");
        let body = fetch_text(&self.client, &self.url).await?;

        std::fs::write(&self.cache_path, &body).map_err(|e| Error::io(&self.cache_path, e))?;
        info!(bytes = body.len(), "Raw cache written");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}/auto-mpg.data")
    }

    fn local_client() -> BasicClient {
        BasicClient::from_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn test_http_fetcher_writes_cache_verbatim() {
        let body = "18.0   8   307.0\t\"chevy malibu\"\n";
        let url = serve_once("HTTP/1.1 200 OK", body).await;
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("raw.txt");
        std::fs::write(&cache, "stale").unwrap();

        let fetcher = HttpFetcher::new(local_client(), url, &cache);
        let text = fetcher.fetch().await.unwrap();

        assert_eq!(text, body);
        assert_eq!(std::fs::read_to_string(&cache).unwrap(), body);
    }

    #[tokio::test]
    async fn test_http_fetcher_rejects_error_status() {
        let url = serve_once("HTTP/1.1 404 Not Found", "missing").await;
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("raw.txt");

        let fetcher = HttpFetcher::new(local_client(), url, &cache);
        let err = fetcher.fetch().await.unwrap_err();

        assert!(matches!(err, Error::Fetch(FetchError::Http { .. })));
        assert!(!cache.exists());
    }

    #[tokio::test]
    async fn test_fetch_text_invalid_url() {
        let err = fetch_text(&BasicClient::new(), "not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
