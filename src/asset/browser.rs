use super::Asset;
use crate::bus::EventBus;
use crate::event::SharedEvent;
use crate::request::{self, AssetResource, RequestError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Node of the asset browser tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BrowserTreeNode {
    /// A realm (tenant) root
    Tenant { id: String, label: String },
    /// An asset anywhere below a realm
    Asset { id: String, label: String },
    /// Placeholder shown while children are fetched
    Loading,
}

impl BrowserTreeNode {
    pub fn id(&self) -> Option<&str> {
        match self {
            BrowserTreeNode::Tenant { id, .. } | BrowserTreeNode::Asset { id, .. } => Some(id),
            BrowserTreeNode::Loading => None,
        }
    }
}

/// Published when the user selects a node in the asset browser
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBrowserSelection {
    pub selected_node: BrowserTreeNode,
    pub timestamp: DateTime<Utc>,
}

impl AssetBrowserSelection {
    pub fn new(selected_node: BrowserTreeNode) -> Self {
        Self {
            selected_node,
            timestamp: Utc::now(),
        }
    }
}

impl SharedEvent for AssetBrowserSelection {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Asset browser operations presenters rely on
#[async_trait]
pub trait AssetBrowser: Send + Sync {
    /// Fetch an asset; `Ok(None)` if it doesn't exist
    async fn load_asset(&self, asset_id: &str) -> Result<Option<Asset>, RequestError>;

    /// Mark an asset as selected without publishing a selection event
    fn select_asset(&self, asset: &Asset);
}

/// Asset browser backed by a remote asset resource
pub struct ResourceAssetBrowser {
    resource: Arc<dyn AssetResource>,
    bus: Arc<EventBus>,
    timeout_ms: u64,
    selected: Mutex<Option<String>>,
}

impl ResourceAssetBrowser {
    pub fn new(resource: Arc<dyn AssetResource>, bus: Arc<EventBus>, timeout_ms: u64) -> Self {
        Self {
            resource,
            bus,
            timeout_ms,
            selected: Mutex::new(None),
        }
    }

    /// Id of the currently selected asset
    pub fn selected_asset_id(&self) -> Option<String> {
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// User selection of a tree node; publishes [`AssetBrowserSelection`]
    pub fn select_node(&self, node: BrowserTreeNode) {
        info!(node = ?node, "Asset browser node selected");
        if let BrowserTreeNode::Asset { id, .. } = &node {
            *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = Some(id.clone());
        }
        self.bus.dispatch(&AssetBrowserSelection::new(node));
    }
}

#[async_trait]
impl AssetBrowser for ResourceAssetBrowser {
    async fn load_asset(&self, asset_id: &str) -> Result<Option<Asset>, RequestError> {
        debug!(asset_id = %asset_id, "Loading asset");
        request::execute(self.resource.get(asset_id), self.timeout_ms).await
    }

    fn select_asset(&self, asset: &Asset) {
        debug!(asset_id = %asset.id, "Asset selected");
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = Some(asset.id.clone());
    }
}
