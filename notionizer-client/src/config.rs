//! Client configuration.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};

/// Settings shared by the HTTP transport and query pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.notion.com/v1`.
    pub base_url: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Page size sent with queries that don't set one. `None` leaves it to
    /// the service (100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.notion.com/v1".to_string(),
            notion_version: "2022-06-28".to_string(),
            timeout_secs: 15,
            page_size: None,
        }
    }
}

impl ClientConfig {
    pub const ENV_BASE_URL: &'static str = "NOTION_API_BASE_URL";
    pub const ENV_VERSION: &'static str = "NOTION_VERSION";
    pub const ENV_TIMEOUT_SECS: &'static str = "NOTION_TIMEOUT_SECS";
    pub const ENV_PAGE_SIZE: &'static str = "NOTION_PAGE_SIZE";

    /// Defaults overridden by `NOTION_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `NOTION_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(Self::ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(version) = lookup(Self::ENV_VERSION) {
            config.notion_version = version;
        }
        if let Some(raw) = lookup(Self::ENV_TIMEOUT_SECS) {
            config.timeout_secs = parse_var(Self::ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(Self::ENV_PAGE_SIZE) {
            let size: u32 = parse_var(Self::ENV_PAGE_SIZE, &raw)?;
            if !(1..=100).contains(&size) {
                return Err(ClientError::Config(format!(
                    "{}: page size must be between 1 and 100, got {size}",
                    Self::ENV_PAGE_SIZE
                )));
            }
            config.page_size = Some(size);
        }
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> ClientResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ClientError::Config(format!("{key}: {e}")))
}
