//! Loading result sheets from disk or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Fetches the body of `url` through `client`, failing on non-success statuses.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads a result sheet from a local file path or fetches it over HTTP.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let client = BasicClient::new();
        fetch_bytes(&client, source)
            .await
            .with_context(|| format!("failed to download {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Result sheet loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::env;
    use std::fs;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Client that ignores proxy settings so requests reach the local server.
    struct DirectClient(reqwest::Client);

    #[async_trait]
    impl HttpClient for DirectClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.0.execute(req).await
        }
    }

    fn direct_client() -> DirectClient {
        DirectClient(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    /// Answers a single request with `response` and returns the URL to hit.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/results.csv")
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_error_status() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let err = fetch_bytes(&direct_client(), &url).await.unwrap_err();
        let status = err
            .downcast_ref::<reqwest::Error>()
            .and_then(|e| e.status())
            .unwrap();
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 8\r\nConnection: close\r\n\r\na,b\n1,2\n",
        )
        .await;

        let bytes = fetch_bytes(&direct_client(), &url).await.unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let path = format!("{}/exam_report_test_source.csv", env::temp_dir().display());
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let bytes = load_source(&path).await.unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_missing_file() {
        let result = load_source("/nonexistent/exam_report/sheet.csv").await;
        assert!(result.is_err());
    }
}
