//! Blocking HTTP helpers shared by the adapters.
//!
//! One `reqwest::blocking::Client` per adapter; clones share the
//! connection pool, so fan-out workers each take a clone.

use log::debug;
use reqwest::blocking::Client;
use std::io::Write;

use crate::config::SourceConfig;
use crate::error::{IngestError, Result};

pub fn build_client(config: &SourceConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| IngestError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Validates a URL assembled from caller input.
pub fn parse_url(url: &str) -> Result<reqwest::Url> {
    reqwest::Url::parse(url).map_err(|e| IngestError::InvalidUrl(format!("{}: {}", url, e)))
}

/// GETs `url` and returns the body as text. Transport failures and
/// non-2xx statuses are attributed to `station`.
pub fn get_text(client: &Client, url: &reqwest::Url, station: &str) -> Result<String> {
    debug!("GET {}", url);

    let response = client
        .get(url.clone())
        .header("Accept", "application/json")
        .send()
        .map_err(|source| IngestError::Transport {
            station: station.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(IngestError::HttpStatus {
            station: station.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(|source| IngestError::Transport {
        station: station.to_string(),
        source,
    })
}

/// Streams the body of `url` into `out`. Every failure, including a
/// non-2xx status, is a `Download` error naming the URL.
pub fn download_to<W: Write>(client: &Client, url: &reqwest::Url, out: &mut W) -> Result<u64> {
    debug!("Downloading {}", url);

    let download_err = |reason: String| IngestError::Download {
        url: url.to_string(),
        reason,
    };

    let mut response = client
        .get(url.clone())
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| download_err(e.to_string()))?;

    let bytes = response
        .copy_to(out)
        .map_err(|e| download_err(e.to_string()))?;
    out.flush().map_err(|e| download_err(e.to_string()))?;

    Ok(bytes)
}
