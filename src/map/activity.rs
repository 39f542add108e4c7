use super::render::show_asset_on_map;
use super::{MapView, MapViewPresenter, TENANT_MAP_NOT_IMPLEMENTED};
use crate::activity::{AppActivity, Environment};
use crate::asset::{Asset, AssetBrowser, AssetBrowserSelection, BrowserTreeNode};
use crate::bus::{EventBus, Registrations};
use crate::place::{MapPlace, PlaceController};
use crate::request::{self, MapResource, RequestErrorHandler};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Asset held by one activation; also the view's presenter back-reference
#[derive(Default)]
struct MapState {
    asset: Mutex<Option<Asset>>,
    stopped: Mutex<bool>,
}

impl MapState {
    fn set_asset(&self, asset: Option<Asset>) {
        *self.asset.lock().unwrap_or_else(PoisonError::into_inner) = asset;
    }

    /// Run `render` unless the activation has stopped.
    ///
    /// Holds the stop lock while rendering, so [`stop`](Self::stop) returns
    /// only after a render already in progress has finished.
    fn while_active(&self, render: impl FnOnce()) {
        let stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        if *stopped {
            debug!("Dropping completion of stopped map activity");
            return;
        }
        render();
    }

    fn stop(&self) {
        *self.stopped.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}

impl MapViewPresenter for MapState {
    fn current_asset(&self) -> Option<Asset> {
        self.asset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Presenter of the map view for one [`MapPlace`].
///
/// `start` spawns its remote reads on the current tokio runtime, so it must be
/// called from within one (it panics otherwise, like [`tokio::spawn`]).
/// Completions render through the shared view in whatever order they arrive,
/// until the activation is stopped.
pub struct MapActivity {
    view: Arc<dyn MapView>,
    asset_browser: Arc<dyn AssetBrowser>,
    map_resource: Arc<dyn MapResource>,
    place_controller: Arc<dyn PlaceController>,
    error_handler: Arc<dyn RequestErrorHandler>,
    settings_timeout_ms: u64,
    place: Option<MapPlace>,
    state: Arc<MapState>,
    pending: Vec<JoinHandle<()>>,
}

impl MapActivity {
    pub fn new(
        env: &Environment,
        view: Arc<dyn MapView>,
        asset_browser: Arc<dyn AssetBrowser>,
        map_resource: Arc<dyn MapResource>,
    ) -> Self {
        Self {
            view,
            asset_browser,
            map_resource,
            place_controller: Arc::clone(&env.place_controller),
            error_handler: Arc::clone(&env.error_handler),
            settings_timeout_ms: env.config.map.settings_timeout_ms,
            place: None,
            state: Arc::new(MapState::default()),
            pending: Vec::new(),
        }
    }

    /// Place this activity was initialised with
    pub fn place(&self) -> Option<&MapPlace> {
        self.place.as_ref()
    }

    /// Asset loaded by this activation, if any
    pub fn asset(&self) -> Option<Asset> {
        self.state.current_asset()
    }

    fn load_map_settings(&mut self) {
        let view = Arc::clone(&self.view);
        let state = Arc::clone(&self.state);
        let map_resource = Arc::clone(&self.map_resource);
        let error_handler = Arc::clone(&self.error_handler);
        let timeout_ms = self.settings_timeout_ms;

        debug!(timeout_ms = timeout_ms, "Requesting map settings");
        self.pending.push(tokio::spawn(async move {
            let result = request::execute(map_resource.get_settings(), timeout_ms).await;
            state.while_active(|| match result {
                Ok(settings) => {
                    view.initialise_map(&settings);
                    let asset = state.current_asset();
                    if asset.is_some() {
                        show_asset_on_map(view.as_ref(), asset.as_ref());
                    }
                }
                Err(e) => error_handler.handle(&e),
            });
        }));
    }

    fn load_asset(&mut self, asset_id: String) {
        let view = Arc::clone(&self.view);
        let state = Arc::clone(&self.state);
        let asset_browser = Arc::clone(&self.asset_browser);
        let error_handler = Arc::clone(&self.error_handler);

        self.pending.push(tokio::spawn(async move {
            let result = asset_browser.load_asset(&asset_id).await;
            state.while_active(|| match result {
                Ok(Some(asset)) => {
                    state.set_asset(Some(asset.clone()));
                    asset_browser.select_asset(&asset);
                    show_asset_on_map(view.as_ref(), Some(&asset));
                }
                Ok(None) => warn!(asset_id = %asset_id, "Asset not found"),
                Err(e) => error_handler.handle(&e),
            });
        }));
    }

    /// Wait for every read started so far
    #[cfg(test)]
    pub(crate) async fn settle(&mut self) {
        for handle in self.pending.drain(..) {
            let _ = handle.await;
        }
    }
}

impl AppActivity for MapActivity {
    type Place = MapPlace;

    fn init(&mut self, place: MapPlace) {
        self.place = Some(place);
    }

    fn start(&mut self, bus: &Arc<EventBus>, registrations: &mut Registrations) {
        let presenter: Arc<dyn MapViewPresenter> = self.state.clone();
        self.view.set_presenter(Some(presenter));

        let place_controller = Arc::clone(&self.place_controller);
        registrations.add(bus.register::<AssetBrowserSelection, _>(move |event| {
            match &event.selected_node {
                BrowserTreeNode::Tenant { id, .. } => place_controller.go_to(MapPlace::tenant(id)),
                BrowserTreeNode::Asset { id, .. } => place_controller.go_to(MapPlace::asset(id)),
                BrowserTreeNode::Loading => {}
            }
        }));

        if !self.view.is_map_initialised() {
            self.load_map_settings();
        }

        self.view.hide_features_selection();
        self.state.set_asset(None);

        match self.place.clone() {
            Some(MapPlace::Asset { asset_id }) => self.load_asset(asset_id),
            Some(MapPlace::Tenant { realm_id }) => {
                info!(realm_id = %realm_id, "Tenant map requested");
                self.view.show_info(Some(TENANT_MAP_NOT_IMPLEMENTED));
            }
            None => warn!("Map activity started without a place"),
        }
    }

    fn on_stop(&mut self) {
        // Reads still in flight must not render into the next activation.
        // Aborting only takes effect at an await point, so a completion that
        // already resumed is fenced off by the stop gate instead.
        for handle in self.pending.drain(..) {
            handle.abort();
        }
        self.state.stop();
        self.view.set_presenter(None);
    }
}
