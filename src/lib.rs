// Events and event filters
pub mod event;

// Process-wide event bus
pub mod bus;

// Assets and the asset browser
pub mod asset;

// Remote reads (map settings, assets)
pub mod request;

// Routing places
pub mod place;

// Activity lifecycle
pub mod activity;

// Map presenter and view
pub mod map;

// Configuration
pub mod config;

pub use event::{AttributeEvent, EventFilter, SharedEvent};
