use crate::error::{Result, SchemaError};
use crate::index::SchemaIndex;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// One-shot OpenAPI download.
///
/// HTTP error statuses fail immediately. Transport failures (connect, DNS,
/// timeout) are retried `retries` times with exponential backoff; the default
/// of zero retries means a single request.
#[derive(Debug, Clone)]
pub struct SchemaFetcher {
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for SchemaFetcher {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl SchemaFetcher {
    pub async fn fetch(&self, url: &str) -> Result<SchemaIndex> {
        let body = self.fetch_text(url).await?;
        SchemaIndex::parse(&body, url)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(SchemaError::Client)?;

        let mut attempt = 0u32;
        loop {
            log::info!("Fetching schema: GET {url}");
            match self.get_once(&client, url).await {
                Err(SchemaError::Transport { url, source }) if attempt < self.retries => {
                    let delay = self.backoff.saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    log::warn!(
                        "GET {url} failed ({source}); retry {attempt}/{} in {}ms",
                        self.retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    async fn get_once(&self, client: &Client, url: &str) -> Result<String> {
        let transport = |source: reqwest::Error| SchemaError::Transport {
            url: url.to_string(),
            source,
        };

        let response = client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SchemaError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}

/// Read an OpenAPI document from disk instead of the network
pub fn load_schema_file(path: &Path) -> Result<SchemaIndex> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SchemaIndex::parse(&text, &path.display().to_string())
}
