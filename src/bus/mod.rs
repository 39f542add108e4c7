// Process-wide typed event bus

use crate::event::{EventFilter, SharedEvent};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, trace};


type Handler = Arc<dyn Fn(&(dyn Any + 'static)) + Send + Sync>;

struct Subscriber {
    id: u64,
    handler: Handler,
}

static GLOBAL: OnceLock<Arc<EventBus>> = OnceLock::new();

/// Initialise the process-wide bus (idempotent) and return it
pub fn init_global() -> Arc<EventBus> {
    Arc::clone(GLOBAL.get_or_init(|| {
        debug!("Initialising global event bus");
        Arc::new(EventBus::new())
    }))
}

/// The process-wide bus, if [`init_global`] has run
pub fn global() -> Option<Arc<EventBus>> {
    GLOBAL.get().cloned()
}

/// Publish/subscribe bus with one topic per event type.
///
/// Handlers run synchronously on the dispatching task. The handler list is
/// snapshotted before delivery, so handlers may register or release
/// subscriptions (on any topic) while being called.
pub struct EventBus {
    topics: DashMap<TypeId, Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to every event of type `E`.
    ///
    /// The subscription lives as long as the returned registration.
    pub fn register<E, H>(self: &Arc<Self>, handler: H) -> EventRegistration
    where
        E: SharedEvent,
        H: Fn(&E) + Send + Sync + 'static,
    {
        let erased: Handler = Arc::new(move |event: &(dyn Any + 'static)| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });
        self.insert::<E>(erased)
    }

    /// Subscribe to events of type `E` that pass `filter`.
    ///
    /// The handler receives the filter's output, never the raw event.
    pub fn register_filtered<E, F, H>(self: &Arc<Self>, filter: F, handler: H) -> EventRegistration
    where
        E: SharedEvent,
        F: EventFilter<E> + 'static,
        H: Fn(&E) + Send + Sync + 'static,
    {
        debug!(
            event_type = %E::event_type(),
            filter_type = %filter.filter_type(),
            "Registering filtered subscription"
        );
        self.register::<E, _>(move |event| {
            if let Some(matched) = filter.apply(event) {
                handler(&matched);
            }
        })
    }

    fn insert<E: SharedEvent>(self: &Arc<Self>, handler: Handler) -> EventRegistration {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.topics
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Subscriber { id, handler });

        debug!(event_type = %E::event_type(), registration = id, "Event handler registered");

        EventRegistration {
            bus: Arc::downgrade(self),
            topic: TypeId::of::<E>(),
            id,
        }
    }

    fn unregister(&self, topic: TypeId, id: u64) {
        let mut emptied = false;
        if let Some(mut subscribers) = self.topics.get_mut(&topic) {
            subscribers.retain(|s| s.id != id);
            emptied = subscribers.is_empty();
        }
        if emptied {
            self.topics.remove_if(&topic, |_, subscribers| subscribers.is_empty());
        }
        debug!(registration = id, "Event handler released");
    }

    /// Deliver `event` to every current subscriber of its type.
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch<E: SharedEvent>(&self, event: &E) -> usize {
        let handlers: Vec<Handler> = self
            .topics
            .get(&TypeId::of::<E>())
            .map(|subscribers| subscribers.iter().map(|s| Arc::clone(&s.handler)).collect())
            .unwrap_or_default();

        trace!(event_type = %E::event_type(), handlers = handlers.len(), "Dispatching event");

        let event: &(dyn Any + 'static) = event;
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of live subscriptions for events of type `E`
    pub fn subscriber_count<E: SharedEvent>(&self) -> usize {
        self.topics
            .get(&TypeId::of::<E>())
            .map_or(0, |subscribers| subscribers.len())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle of one bus subscription.
///
/// Dropping the handle releases the subscription. It holds the bus weakly,
/// so a handle outliving its bus is harmless.
#[must_use = "dropping the registration releases the subscription immediately"]
pub struct EventRegistration {
    bus: Weak<EventBus>,
    topic: TypeId,
    id: u64,
}

impl EventRegistration {
    /// Release the subscription now
    pub fn remove(self) {
        drop(self);
    }
}

impl Drop for EventRegistration {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unregister(self.topic, self.id);
        }
    }
}

/// Registrations collected by one activity, released together.
#[derive(Default)]
pub struct Registrations {
    handles: Vec<EventRegistration>,
}

impl Registrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, registration: EventRegistration) {
        self.handles.push(registration);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Release every collected subscription
    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
