use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod filter;
mod registry;
#[cfg(test)]
mod tests;

pub use filter::{filter_type, simple_type_name, to_lower_case_dash, EntityIdFilter, EventFilter};
pub use registry::{encode_filter, FilterError, FilterRegistry, FILTER_TYPE_PROPERTY};

/// SharedEvent is anything that travels over the event bus.
///
/// Events are immutable once published; subscribers and filters only ever
/// see them by reference.
pub trait SharedEvent: Clone + Send + Sync + 'static {
    /// Short, stable name of the event kind (e.g. "attribute-event")
    fn event_type() -> String {
        to_lower_case_dash(simple_type_name(std::any::type_name::<Self>()))
    }

    /// Producer time of the event
    fn timestamp(&self) -> DateTime<Utc>;
}

/// AttributeEvent reports a new value for one attribute of an entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeEvent {
    /// Identifier of the entity (usually an asset) that owns the attribute
    pub entity_id: String,

    /// Attribute name within the entity
    pub attribute_name: String,

    /// New attribute value (opaque JSON)
    pub value: Value,

    pub timestamp: DateTime<Utc>,
}

impl AttributeEvent {
    pub fn new(entity_id: &str, attribute_name: &str, value: Value) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            attribute_name: attribute_name.to_string(),
            value,
            timestamp: Utc::now(),
        }
    }
}

impl SharedEvent for AttributeEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
