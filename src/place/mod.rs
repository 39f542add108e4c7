// Routing places for the map view

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;
use tracing::info;

/// A navigable map state: either one asset or one tenant realm
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MapPlace {
    #[serde(rename_all = "camelCase")]
    Asset { asset_id: String },
    #[serde(rename_all = "camelCase")]
    Tenant { realm_id: String },
}

impl MapPlace {
    pub fn asset(asset_id: &str) -> Self {
        MapPlace::Asset {
            asset_id: asset_id.to_string(),
        }
    }

    pub fn tenant(realm_id: &str) -> Self {
        MapPlace::Tenant {
            realm_id: realm_id.to_string(),
        }
    }
}

impl fmt::Display for MapPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapPlace::Asset { asset_id } => write!(f, "map/asset/{}", asset_id),
            MapPlace::Tenant { realm_id } => write!(f, "map/tenant/{}", realm_id),
        }
    }
}

/// Requests navigation to a new place
pub trait PlaceController: Send + Sync {
    fn go_to(&self, place: MapPlace);
}

/// Place controller where only the latest request counts.
///
/// Requests made before the navigator picks up the previous one replace it;
/// nothing is queued.
pub struct WatchPlaceController {
    tx: watch::Sender<Option<MapPlace>>,
}

impl WatchPlaceController {
    /// Create the controller and the receiver an activity manager follows
    pub fn new() -> (Self, watch::Receiver<Option<MapPlace>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }

    /// Most recently requested place
    pub fn current(&self) -> Option<MapPlace> {
        self.tx.borrow().clone()
    }
}

impl PlaceController for WatchPlaceController {
    fn go_to(&self, place: MapPlace) {
        info!(place = %place, "Navigation requested");
        // send_replace succeeds even while no receiver is alive
        self.tx.send_replace(Some(place));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_place_variants_are_exclusive() {
        let asset = MapPlace::asset("a1");
        let tenant = MapPlace::tenant("master");

        assert_ne!(asset, tenant);
        assert_eq!(asset.to_string(), "map/asset/a1");
        assert_eq!(tenant.to_string(), "map/tenant/master");
    }

    #[test]
    fn test_place_serialization() {
        let value = serde_json::to_value(MapPlace::asset("a1")).unwrap();
        assert_eq!(value, json!({"type": "asset", "assetId": "a1"}));

        let place: MapPlace =
            serde_json::from_value(json!({"type": "tenant", "realmId": "master"})).unwrap();
        assert_eq!(place, MapPlace::tenant("master"));
    }

    #[test]
    fn test_last_request_wins() {
        let (controller, mut rx) = WatchPlaceController::new();
        assert_eq!(controller.current(), None);

        controller.go_to(MapPlace::asset("a1"));
        controller.go_to(MapPlace::asset("a2"));

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Some(MapPlace::asset("a2")));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(controller.current(), Some(MapPlace::asset("a2")));
    }

    #[test]
    fn test_go_to_without_receiver() {
        let (controller, rx) = WatchPlaceController::new();
        drop(rx);

        controller.go_to(MapPlace::tenant("master"));
        assert_eq!(controller.current(), Some(MapPlace::tenant("master")));
    }
}
