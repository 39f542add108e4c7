// Assets and the asset browser

mod browser;

pub use browser::{AssetBrowser, AssetBrowserSelection, BrowserTreeNode, ResourceAssetBrowser};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Asset is a device or logical group managed in a realm.
///
/// Owned by the asset service; the map only holds a copy for the duration of
/// one activation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Asset type URN or short name (e.g. "urn:openremote:asset:thing")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,

    /// Location stored as [longitude, latitude] (PostGIS order)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<f64>>,
}

impl Asset {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            asset_type: None,
            realm_id: None,
            created_on: None,
            coordinates: None,
        }
    }

    /// Coordinates, treating an empty array like a missing one
    pub fn location(&self) -> Option<&[f64]> {
        self.coordinates
            .as_deref()
            .filter(|coordinates| !coordinates.is_empty())
    }

    /// GeoJSON feature for the map's selection layer.
    ///
    /// Assets without a location get a `null` geometry.
    pub fn to_feature(&self) -> Value {
        let geometry = match self.location() {
            Some(coordinates) => json!({
                "type": "Point",
                "coordinates": coordinates,
            }),
            None => Value::Null,
        };

        json!({
            "type": "Feature",
            "properties": {
                "id": self.id,
                "title": self.name,
                "type": self.asset_type,
            },
            "geometry": geometry,
        })
    }
}
