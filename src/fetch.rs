// src/fetch.rs

use anyhow::{bail, Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use url::Url;

/// Where relative CSV references are resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base {
    /// The page lives on a web server; references join onto this URL.
    Url(Url),
    /// The page lives on disk; references are paths under this directory.
    Dir(PathBuf),
}

impl Base {
    /// `http(s)://` strings become URL bases, anything else a directory.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if is_http(&url) => Base::Url(url),
            _ => Base::Dir(PathBuf::from(raw)),
        }
    }

    /// Base for references found in a shell page stored at `page`.
    pub fn for_page_file(page: &Path) -> Self {
        let dir = page
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Base::Dir(dir.to_path_buf())
    }
}

impl Default for Base {
    fn default() -> Self {
        Base::Dir(PathBuf::from("."))
    }
}

/// A CSV reference after resolution against a [`Base`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvSource {
    Remote(Url),
    Local(PathBuf),
}

impl CsvSource {
    pub fn resolve(reference: &str, base: &Base) -> Result<Self> {
        if let Ok(url) = Url::parse(reference) {
            if is_http(&url) {
                return Ok(CsvSource::Remote(url));
            }
            if url.scheme() == "file" {
                let path = url
                    .to_file_path()
                    .map_err(|_| anyhow::anyhow!("not a local file URL: {}", reference))?;
                return Ok(CsvSource::Local(path));
            }
        }

        match base {
            Base::Url(base) => {
                let url = base
                    .join(reference)
                    .with_context(|| format!("joining {} onto {}", reference, base))?;
                Ok(CsvSource::Remote(url))
            }
            Base::Dir(dir) => Ok(CsvSource::Local(dir.join(reference))),
        }
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Retrieves CSV text for page roots. Cheap to clone; clones share the client.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base: Base,
}

impl Fetcher {
    pub fn new(client: Client, base: Base) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    /// Resolve `reference` and return the document body as text.
    ///
    /// A non-success HTTP status is an error; there is no retry.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_text(&self, reference: &str) -> Result<String> {
        let source = CsvSource::resolve(reference, &self.base)?;
        debug!(?source, "resolved csv reference");

        let text = match &source {
            CsvSource::Remote(url) => {
                let resp = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("GET {}", url))?;
                let status = resp.status();
                if !status.is_success() {
                    bail!("CSV load failed: {}", status);
                }
                resp.text()
                    .await
                    .with_context(|| format!("reading body from {}", url))?
            }
            CsvSource::Local(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("CSV load failed: reading {:?}", path))?,
        };

        info!(bytes = text.len(), "fetched csv");
        Ok(text)
    }
}
