use serde::Deserialize;
use std::time::Duration;

/// Access token handed to the catalog and download endpoints. Loaded once
/// at startup and injected into the clients, never read from ambient state.
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    pub token: String,
}

/// Process-wide configuration, read-only after startup. Defaults point at
/// the Copernicus Data Space endpoints.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub catalog_url: String,
    pub download_url: String,
    pub timeout_secs: u64,
    pub credentials: Option<Credentials>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            catalog_url: "https://catalogue.dataspace.copernicus.eu/odata/v1".to_string(),
            download_url: "https://zipper.dataspace.copernicus.eu/odata/v1".to_string(),
            timeout_secs: 60,
            credentials: None,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
