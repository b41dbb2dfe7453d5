use std::fmt;

use catalog::{CatalogError, SchoolCatalog};
use gloo_net::http::Request;
use tracing::debug;

#[derive(Debug)]
pub enum LoadError {
    /// The request never produced a response, or its body could not be read.
    Network(String),
    Status { url: String, status: u16 },
    Catalog(CatalogError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "network error: {msg}"),
            LoadError::Status { url, status } => write!(f, "HTTP {status} for {url}"),
            LoadError::Catalog(err) => write!(f, "invalid school data: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogError> for LoadError {
    fn from(err: CatalogError) -> Self {
        LoadError::Catalog(err)
    }
}

/// Fetches and validates the school list, bypassing the HTTP cache.
pub async fn fetch_catalog(url: &str) -> Result<SchoolCatalog, LoadError> {
    let resp = Request::get(url)
        .cache(web_sys::RequestCache::NoStore)
        .send()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }

    let text = resp
        .text()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;
    debug!(url, bytes = text.len(), "school data fetched");
    Ok(SchoolCatalog::from_json_str(&text)?)
}
