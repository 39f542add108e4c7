use super::RequestError;
use crate::asset::Asset;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Map configuration payload (style, bounds, zoom levels).
///
/// Opaque to the presenter; handed to the view unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapSettings(pub Value);

/// Read access to map settings
#[async_trait]
pub trait MapResource: Send + Sync {
    async fn get_settings(&self) -> Result<MapSettings, RequestError>;
}

/// Read access to assets
#[async_trait]
pub trait AssetResource: Send + Sync {
    /// Fetch one asset; `Ok(None)` if it doesn't exist
    async fn get(&self, asset_id: &str) -> Result<Option<Asset>, RequestError>;
}

/// Map settings served at `GET {base_url}/map`
pub struct HttpMapResource {
    http_client: Client,
    base_url: String,
}

impl HttpMapResource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http_client: Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MapResource for HttpMapResource {
    async fn get_settings(&self) -> Result<MapSettings, RequestError> {
        let url = format!("{}/map", self.base_url);
        debug!(url = %url, "Fetching map settings");

        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(RequestError::Status(response.status().as_u16()));
        }
        Ok(response.json::<MapSettings>().await?)
    }
}

/// Assets served at `GET {base_url}/asset/{id}`
pub struct HttpAssetResource {
    http_client: Client,
    base_url: String,
}

impl HttpAssetResource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http_client: Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AssetResource for HttpAssetResource {
    async fn get(&self, asset_id: &str) -> Result<Option<Asset>, RequestError> {
        // Ids are one path segment; '/', '?' and '#' must not reach the router
        let url = format!("{}/asset/{}", self.base_url, urlencoding::encode(asset_id));
        debug!(url = %url, "Fetching asset");

        let response = self.http_client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<Asset>().await?)),
            status => Err(RequestError::Status(status.as_u16())),
        }
    }
}
