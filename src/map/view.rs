use super::{MapView, MapViewPresenter};
use crate::request::MapSettings;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

#[derive(Default)]
struct ViewState {
    presenter: Option<Arc<dyn MapViewPresenter>>,
    settings: Option<MapSettings>,
    info: Option<String>,
    selection: Option<Value>,
    center: Option<Vec<f64>>,
}

/// Headless map view.
///
/// Keeps what a map widget would display and logs every command; used by
/// the binary when no rendering surface is attached.
#[derive(Default)]
pub struct TracingMapView {
    state: Mutex<ViewState>,
}

impl TracingMapView {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn has_presenter(&self) -> bool {
        self.state().presenter.is_some()
    }

    /// Presenter currently bound to the view
    pub fn presenter(&self) -> Option<Arc<dyn MapViewPresenter>> {
        self.state().presenter.clone()
    }

    pub fn settings(&self) -> Option<MapSettings> {
        self.state().settings.clone()
    }

    pub fn info(&self) -> Option<String> {
        self.state().info.clone()
    }

    /// Feature on the selection layer
    pub fn selection(&self) -> Option<Value> {
        self.state().selection.clone()
    }

    /// Last fly-to target
    pub fn center(&self) -> Option<Vec<f64>> {
        self.state().center.clone()
    }
}

impl MapView for TracingMapView {
    fn set_presenter(&self, presenter: Option<Arc<dyn MapViewPresenter>>) {
        debug!(bound = presenter.is_some(), "Map presenter changed");
        self.state().presenter = presenter;
    }

    fn is_map_initialised(&self) -> bool {
        self.state().settings.is_some()
    }

    fn initialise_map(&self, settings: &MapSettings) {
        info!("Map initialised");
        self.state().settings = Some(settings.clone());
    }

    fn show_info(&self, text: Option<&str>) {
        match text {
            Some(text) => info!(info = %text, "Map info"),
            None => debug!("Map info cleared"),
        }
        self.state().info = text.map(str::to_string);
    }

    fn show_features_selection(&self, feature: &Value) {
        debug!(feature = %feature, "Showing feature selection");
        self.state().selection = Some(feature.clone());
    }

    fn hide_features_selection(&self) {
        debug!("Hiding feature selection");
        self.state().selection = None;
    }

    fn fly_to(&self, coordinates: &[f64]) {
        info!(coordinates = ?coordinates, "Flying to location");
        self.state().center = Some(coordinates.to_vec());
    }
}
