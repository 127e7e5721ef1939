//! Image resolution
//!
//! Turns a raw image reference from the product table into bytes, or into an
//! explicit "unavailable" signal. Resolution never fails: every problem is
//! folded into [`ImageAsset::Unavailable`] so a single broken picture can only
//! ever produce a placeholder.

use crate::types::*;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

/// Per-request timeout for image downloads
pub const IMAGE_FETCH_TIMEOUT_SECS: u64 = 10;

/// Host marker identifying Google Drive share links
const DRIVE_HOST: &str = "drive.google.com";

const DRIVE_DIRECT_URL: &str = "https://drive.google.com/uc?export=view&id=";

static DRIVE_PATH_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/d/([^/?#&]+)").expect("valid drive path regex"));

static DRIVE_QUERY_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]id=([^&#]+)").expect("valid drive query regex"));

/// Why an image could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    Blank,
    InvalidUrl(String),
    Transport(String),
    Status(u16),
    NotAnImage(String),
}

/// Outcome of resolving one image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageAsset {
    Bytes(Vec<u8>),
    Unavailable(Unavailable),
}

impl ImageAsset {
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            ImageAsset::Bytes(bytes) => Some(bytes),
            ImageAsset::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ImageAsset::Bytes(_))
    }
}

/// Minimal view of an HTTP response
#[derive(Debug, Clone, Default)]
pub struct FetchedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// HTTP GET capability used by the resolver
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Transport failures are reported as the error string
    async fn get(&self, url: &str) -> std::result::Result<FetchedResponse, String>;
}

/// [`HttpFetch`] over a `reqwest` client with a fixed timeout
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(IMAGE_FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str) -> std::result::Result<FetchedResponse, String> {
        let response = self.client.get(url).send().await.map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|e| e.to_string())?.to_vec();
        Ok(FetchedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// True for empty references and the literal `nan` left by tabular tooling
pub fn is_blank_reference(reference: &str) -> bool {
    let trimmed = reference.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

/// Extract the file id from a Google Drive share link
pub fn drive_file_id(reference: &str) -> Option<&str> {
    if !reference.contains(DRIVE_HOST) {
        return None;
    }
    DRIVE_PATH_ID
        .captures(reference)
        .or_else(|| DRIVE_QUERY_ID.captures(reference))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rewrite known share links to their direct-content URL; other references
/// are returned trimmed but otherwise untouched.
pub fn rewrite_share_link(reference: &str) -> String {
    let trimmed = reference.trim();
    match drive_file_id(trimmed) {
        Some(id) => format!("{}{}", DRIVE_DIRECT_URL, id),
        None => trimmed.to_string(),
    }
}

/// Resolves image references one at a time. Holds no cache: every call
/// performs its own fetch.
pub struct ImageResolver<F: HttpFetch> {
    fetcher: F,
}

impl ImageResolver<ReqwestFetcher> {
    /// Resolver over a `reqwest` client with the default timeout
    pub fn http() -> Result<Self> {
        Ok(Self::new(ReqwestFetcher::new()?))
    }
}

impl<F: HttpFetch> ImageResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn resolve(&self, reference: &str) -> ImageAsset {
        if is_blank_reference(reference) {
            return ImageAsset::Unavailable(Unavailable::Blank);
        }

        let url = rewrite_share_link(reference);
        match url::Url::parse(&url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                tracing::debug!("Skipping invalid image reference: {}", reference);
                return ImageAsset::Unavailable(Unavailable::InvalidUrl(url));
            }
        }

        tracing::debug!("Fetching image: {}", url);
        let response = match self.fetcher.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Image fetch failed for {}: {}", url, e);
                return ImageAsset::Unavailable(Unavailable::Transport(e));
            }
        };

        if response.status != 200 {
            tracing::warn!("Image fetch for {} returned status {}", url, response.status);
            return ImageAsset::Unavailable(Unavailable::Status(response.status));
        }

        let content_type = response.content_type.unwrap_or_default();
        if !content_type.contains("image") {
            tracing::warn!("Image fetch for {} returned content type '{}'", url, content_type);
            return ImageAsset::Unavailable(Unavailable::NotAnImage(content_type));
        }

        ImageAsset::Bytes(response.body)
    }
}
