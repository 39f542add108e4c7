// Map view and its presenter

mod activity;
mod render;
mod view;

pub use activity::MapActivity;
pub use render::{location_info, round, show_asset_on_map, LOCATION_DECIMALS};
pub use view::TracingMapView;

use crate::asset::Asset;
use crate::request::MapSettings;
use serde_json::Value;
use std::sync::Arc;

/// Info text shown for tenant places; tenant-level maps are not supported
pub const TENANT_MAP_NOT_IMPLEMENTED: &str = "Tenant map not implemented";

/// Back-reference a map view holds to its active presenter
pub trait MapViewPresenter: Send + Sync {
    /// Asset currently shown by the presenter, if loaded
    fn current_asset(&self) -> Option<Asset>;
}

/// Commands a presenter issues to the map widget.
///
/// One view instance is shared by every map activation; implementations use
/// interior mutability.
pub trait MapView: Send + Sync {
    /// Bind (or with `None`, unbind) the presenter
    fn set_presenter(&self, presenter: Option<Arc<dyn MapViewPresenter>>);

    fn is_map_initialised(&self) -> bool;

    fn initialise_map(&self, settings: &MapSettings);

    /// Replace the info text; `None` clears it
    fn show_info(&self, text: Option<&str>);

    /// Show a GeoJSON feature on the selection layer
    fn show_features_selection(&self, feature: &Value);

    fn hide_features_selection(&self);

    /// Pan/zoom to [longitude, latitude]
    fn fly_to(&self, coordinates: &[f64]);
}
