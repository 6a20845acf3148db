//! HAR capture source
//!
//! Replays a HAR 1.2 archive (what browser network panels export) as a
//! sequence of `NetworkExchange`s. Only the fields the pipeline reads are
//! modeled; everything else in the archive is ignored.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::logic::capture::{CapturedResponse, NetworkExchange};

#[derive(Debug, Error)]
pub enum HarError {
    #[error("failed to read HAR file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid HAR document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarArchive {
    pub log: HarLog,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarEntry {
    pub request: HarRequest,
    #[serde(default)]
    pub response: Option<HarResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarResponse {
    /// 0 for aborted or blocked requests
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub content: HarContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarContent {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl HarContent {
    /// Decoded text body. Base64 content (binary responses) reads as none.
    pub fn body(&self) -> Option<String> {
        match self.encoding.as_deref() {
            Some(enc) if enc.eq_ignore_ascii_case("base64") => None,
            _ => self.text.clone(),
        }
    }
}

impl HarArchive {
    pub fn from_path(path: &Path) -> Result<Self, HarError> {
        let json = std::fs::read_to_string(path)?;
        let archive = Self::from_str(&json)?;
        log::info!("Loaded {} HAR entries from {}", archive.log.entries.len(), path.display());
        Ok(archive)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, HarError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.log.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.entries.is_empty()
    }

    pub fn into_exchanges(self) -> Vec<NetworkExchange> {
        self.log.entries.into_iter().map(HarEntry::into_exchange).collect()
    }
}

impl HarEntry {
    pub fn into_exchange(self) -> NetworkExchange {
        let url = self.request.url;
        match self.response {
            Some(response) => {
                // Out-of-range statuses fall outside the accepted window anyway
                let status = u16::try_from(response.status).unwrap_or(0);
                let body = response.content.body();
                NetworkExchange::new(
                    url,
                    CapturedResponse::with_body(status, response.content.mime_type, body),
                )
            }
            None => NetworkExchange::without_response(url),
        }
    }
}
