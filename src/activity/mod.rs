// Activity lifecycle: one presenter per navigation

use crate::bus::{EventBus, Registrations};
use crate::config::AppConfig;
use crate::place::PlaceController;
use crate::request::RequestErrorHandler;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

#[cfg(test)]
mod tests;

/// Shared services every activity is built from
#[derive(Clone)]
pub struct Environment {
    pub bus: Arc<EventBus>,
    pub place_controller: Arc<dyn PlaceController>,
    pub error_handler: Arc<dyn RequestErrorHandler>,
    pub config: Arc<AppConfig>,
}

/// Presenter bound to one view for the duration of one navigation.
///
/// # Lifecycle
/// 1. Manager builds a fresh activity and calls `init(place)`
/// 2. `start` registers bus handlers into `registrations` and kicks off reads
/// 3. On the next navigation the manager releases `registrations`, then
///    calls `on_stop`
///
/// `start` may spawn tokio tasks, so the manager is driven from within a
/// tokio runtime.
pub trait AppActivity: Send {
    type Place: Clone + Display + Send + Sync + 'static;

    fn init(&mut self, place: Self::Place);

    fn start(&mut self, bus: &Arc<EventBus>, registrations: &mut Registrations);

    fn on_stop(&mut self) {}
}

struct Running<A> {
    activity: A,
    registrations: Registrations,
}

/// Runs at most one activity at a time
pub struct ActivityManager<A: AppActivity> {
    bus: Arc<EventBus>,
    factory: Box<dyn Fn() -> A + Send + Sync>,
    current: Option<Running<A>>,
}

impl<A: AppActivity> ActivityManager<A> {
    pub fn new<F>(bus: Arc<EventBus>, factory: F) -> Self
    where
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self {
            bus,
            factory: Box::new(factory),
            current: None,
        }
    }

    /// Stop the current activity and start a new one for `place`
    pub fn go_to(&mut self, place: A::Place) {
        self.stop();

        info!(place = %place, "Starting activity");
        let mut activity = (self.factory)();
        activity.init(place);

        let mut registrations = Registrations::new();
        activity.start(&self.bus, &mut registrations);
        debug!(registrations = registrations.len(), "Activity started");

        self.current = Some(Running {
            activity,
            registrations,
        });
    }

    /// Stop the current activity, releasing its bus registrations
    pub fn stop(&mut self) {
        if let Some(mut running) = self.current.take() {
            running.registrations.clear();
            running.activity.on_stop();
            debug!("Activity stopped");
        }
    }

    pub fn current(&self) -> Option<&A> {
        self.current.as_ref().map(|r| &r.activity)
    }

    pub fn current_mut(&mut self) -> Option<&mut A> {
        self.current.as_mut().map(|r| &mut r.activity)
    }

    /// Follow navigation requests until the place controller is dropped.
    ///
    /// Only the latest requested place is started; requests superseded
    /// before they were picked up are skipped.
    pub async fn run(mut self, mut places: watch::Receiver<Option<A::Place>>) {
        loop {
            let place = places.borrow_and_update().clone();
            if let Some(place) = place {
                self.go_to(place);
            }
            if places.changed().await.is_err() {
                break;
            }
        }

        self.stop();
        info!("Navigation closed");
    }
}

impl<A: AppActivity> Drop for ActivityManager<A> {
    fn drop(&mut self) {
        self.stop();
    }
}
