// src/testutil.rs
// Shared helpers for in-crate tests.

use anyhow::Result;
use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,bossdex=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Client that never routes loopback traffic through an env-configured proxy.
pub fn test_client() -> Result<Client> {
    Ok(Client::builder().no_proxy().build()?)
}

/// Answer a single HTTP request on a loopback port with `status` and `body`.
/// Returns a directory URL on that server to resolve references against.
pub async fn serve_once(status: &'static str, body: &'static str) -> Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let Ok((mut sock, _)) = listener.accept().await else {
            return;
        };

        // drain the request head before answering
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match sock.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }

        let resp = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/csv; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = sock.write_all(resp.as_bytes()).await;
        let _ = sock.shutdown().await;
    });

    Ok(Url::parse(&format!("http://{addr}/wiki/"))?)
}
