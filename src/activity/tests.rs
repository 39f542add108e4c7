use super::*;
use crate::event::AttributeEvent;
use crate::place::{MapPlace, PlaceController, WatchPlaceController};
use std::sync::Mutex;

/// Activity that logs its lifecycle and holds one bus subscription
struct ProbeActivity {
    log: Arc<Mutex<Vec<String>>>,
    place: Option<MapPlace>,
}

impl AppActivity for ProbeActivity {
    type Place = MapPlace;

    fn init(&mut self, place: MapPlace) {
        self.place = Some(place);
    }

    fn start(&mut self, bus: &Arc<EventBus>, registrations: &mut Registrations) {
        let place = self.place.clone().map(|p| p.to_string()).unwrap_or_default();
        self.log.lock().unwrap().push(format!("start {}", place));
        registrations.add(bus.register::<AttributeEvent, _>(|_| {}));
    }

    fn on_stop(&mut self) {
        let place = self.place.clone().map(|p| p.to_string()).unwrap_or_default();
        self.log.lock().unwrap().push(format!("stop {}", place));
    }
}

fn probe_manager() -> (ActivityManager<ProbeActivity>, Arc<EventBus>, Arc<Mutex<Vec<String>>>) {
    let bus = Arc::new(EventBus::new());
    let log = Arc::new(Mutex::new(Vec::new()));
    let factory_log = Arc::clone(&log);
    let manager = ActivityManager::new(Arc::clone(&bus), move || ProbeActivity {
        log: Arc::clone(&factory_log),
        place: None,
    });
    (manager, bus, log)
}

#[test]
fn test_go_to_starts_activity() {
    let (mut manager, bus, log) = probe_manager();

    manager.go_to(MapPlace::asset("a1"));

    assert_eq!(*log.lock().unwrap(), vec!["start map/asset/a1"]);
    assert_eq!(manager.current().unwrap().place, Some(MapPlace::asset("a1")));
    assert_eq!(bus.subscriber_count::<AttributeEvent>(), 1);
}

#[test]
fn test_navigation_stops_previous_activity() {
    let (mut manager, bus, log) = probe_manager();

    manager.go_to(MapPlace::asset("a1"));
    manager.go_to(MapPlace::tenant("master"));

    assert_eq!(
        *log.lock().unwrap(),
        vec!["start map/asset/a1", "stop map/asset/a1", "start map/tenant/master"]
    );
    assert_eq!(bus.subscriber_count::<AttributeEvent>(), 1);
}

#[test]
fn test_stop_releases_registrations() {
    let (mut manager, bus, log) = probe_manager();

    manager.go_to(MapPlace::asset("a1"));
    manager.stop();
    // Stopping twice is a no-op
    manager.stop();

    assert!(manager.current().is_none());
    assert_eq!(bus.subscriber_count::<AttributeEvent>(), 0);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["start map/asset/a1", "stop map/asset/a1"]
    );
}

#[test]
fn test_dropping_manager_stops_activity() {
    let (mut manager, bus, log) = probe_manager();

    manager.go_to(MapPlace::asset("a1"));
    drop(manager);

    assert_eq!(bus.subscriber_count::<AttributeEvent>(), 0);
    assert_eq!(log.lock().unwrap().last().unwrap(), "stop map/asset/a1");
}

#[tokio::test]
async fn test_run_starts_only_latest_place() {
    let (manager, bus, log) = probe_manager();
    let (controller, places) = WatchPlaceController::new();

    // Both requests arrive before the manager picks them up
    controller.go_to(MapPlace::asset("a1"));
    controller.go_to(MapPlace::asset("a2"));
    drop(controller);

    manager.run(places).await;

    assert_eq!(
        *log.lock().unwrap(),
        vec!["start map/asset/a2", "stop map/asset/a2"]
    );
    assert_eq!(bus.subscriber_count::<AttributeEvent>(), 0);
}

#[tokio::test]
async fn test_run_follows_navigation() {
    let (manager, _bus, log) = probe_manager();
    let (controller, places) = WatchPlaceController::new();

    let runner = tokio::spawn(manager.run(places));

    controller.go_to(MapPlace::asset("a1"));
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    controller.go_to(MapPlace::tenant("master"));
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    drop(controller);
    runner.await.unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "start map/asset/a1",
            "stop map/asset/a1",
            "start map/tenant/master",
            "stop map/tenant/master",
        ]
    );
}
