use anyhow::{bail, Context, Result};
use assetmap::activity::{ActivityManager, Environment};
use assetmap::asset::ResourceAssetBrowser;
use assetmap::bus;
use assetmap::config::{load_config, AppConfig};
use assetmap::map::{MapActivity, TracingMapView};
use assetmap::place::{MapPlace, PlaceController, WatchPlaceController};
use assetmap::request::{HttpAssetResource, HttpMapResource, TracingErrorHandler};
use std::sync::Arc;
use tracing::info;

/// Parse the initial place: `asset:<id>` or `tenant:<realm>`
fn parse_place(arg: &str) -> Result<MapPlace> {
    match arg.split_once(':') {
        Some(("asset", id)) if !id.is_empty() => Ok(MapPlace::asset(id)),
        Some(("tenant", realm)) if !realm.is_empty() => Ok(MapPlace::tenant(realm)),
        _ => bail!("invalid place '{}': expected asset:<id> or tenant:<realm>", arg),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assetmap=info".into()),
        )
        .init();

    info!("Asset map starting...");

    let config = match std::env::var("ASSETMAP_CONFIG") {
        Ok(path) => load_config(&path)?,
        Err(_) => AppConfig::default(),
    };
    info!(base_url = %config.api.base_url, "Using manager API");

    let place = std::env::args()
        .nth(1)
        .context("usage: assetmap asset:<id> | tenant:<realm>")?;
    let place = parse_place(&place)?;

    let bus = bus::init_global();
    let (place_controller, places) = WatchPlaceController::new();
    let place_controller = Arc::new(place_controller);

    let env = Environment {
        bus: Arc::clone(&bus),
        place_controller: place_controller.clone(),
        error_handler: Arc::new(TracingErrorHandler),
        config: Arc::new(config),
    };

    let view = Arc::new(TracingMapView::new());
    let map_resource = Arc::new(HttpMapResource::new(&env.config.api.base_url));
    let asset_browser = Arc::new(ResourceAssetBrowser::new(
        Arc::new(HttpAssetResource::new(&env.config.api.base_url)),
        Arc::clone(&bus),
        env.config.map.asset_timeout_ms,
    ));

    let manager_bus = Arc::clone(&bus);
    let manager = ActivityManager::new(manager_bus, move || {
        MapActivity::new(&env, view.clone(), asset_browser.clone(), map_resource.clone())
    });

    place_controller.go_to(place);
    let navigation = tokio::spawn(manager.run(places));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");

    navigation.abort();
    Ok(())
}
