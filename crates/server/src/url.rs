//! Absolute URLs for API responses.

use axum::http::HeaderMap;
use axum::http::header::HOST;
use larder_core::config::ServerConfig;
use larder_core::{Checksum, FileUrlBuilder};

/// URL builder anchored at the server's public base URL.
#[derive(Clone, Debug)]
pub struct PublicUrls {
    base: String,
}

impl PublicUrls {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Use the configured base URL, falling back to the request's `Host` header.
    pub fn for_request(config: &ServerConfig, headers: &HeaderMap) -> Self {
        match &config.public_base_url {
            Some(base) => Self::new(base.as_str()),
            None => {
                let host = headers
                    .get(HOST)
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or("localhost");
                Self::new(format!("http://{host}"))
            }
        }
    }

    pub fn cookbook(&self, name: &str) -> String {
        format!("{}/cookbooks/{name}", self.base)
    }

    pub fn cookbook_version(&self, name: &str, version: &str) -> String {
        format!("{}/cookbooks/{name}/{version}", self.base)
    }

    pub fn data_bag(&self, bag: &str) -> String {
        format!("{}/data/{bag}", self.base)
    }

    pub fn data_bag_item(&self, bag: &str, item: &str) -> String {
        format!("{}/data/{bag}/{item}", self.base)
    }
}

impl FileUrlBuilder for PublicUrls {
    fn file_url(&self, cookbook_name: &str, version: &str, checksum: &Checksum) -> String {
        format!(
            "{}/cookbooks/{cookbook_name}/{version}/files/{checksum}",
            self.base
        )
    }
}
