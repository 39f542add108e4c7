use super::filter::{filter_type, EntityIdFilter, EventFilter};
use super::{AttributeEvent, SharedEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// JSON property carrying the filter variant tag
pub const FILTER_TYPE_PROPERTY: &str = "filterType";

type Decoder<E> = fn(Value) -> Result<Box<dyn EventFilter<E>>, serde_json::Error>;

/// Errors decoding or encoding wire-format filters
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    NotAnObject,
    MissingType,
    UnknownType(String),
    Decode(String),
    Encode(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::NotAnObject => write!(f, "filter must be a JSON object"),
            FilterError::MissingType => {
                write!(f, "filter is missing string property '{}'", FILTER_TYPE_PROPERTY)
            }
            FilterError::UnknownType(tag) => write!(f, "unknown filter type '{}'", tag),
            FilterError::Decode(e) => write!(f, "invalid filter: {}", e),
            FilterError::Encode(e) => write!(f, "cannot encode filter: {}", e),
        }
    }
}

impl std::error::Error for FilterError {}

/// Maps wire-format filter tags to decoders for one event kind.
///
/// Tags are never written by hand: [`register`](Self::register) derives
/// them from the filter's type name with [`filter_type`], the same way
/// [`EventFilter::filter_type`] does when the filter is encoded.
pub struct FilterRegistry<E: SharedEvent> {
    decoders: HashMap<String, Decoder<E>>,
}

impl<E: SharedEvent> FilterRegistry<E> {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register a filter variant, returning its tag
    pub fn register<F>(&mut self) -> String
    where
        F: EventFilter<E> + DeserializeOwned + 'static,
    {
        let tag = filter_type(std::any::type_name::<F>());
        debug!(filter_type = %tag, event_type = %E::event_type(), "Registered event filter");
        self.decoders.insert(tag.clone(), decode_as::<E, F>);
        tag
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Registered tags in sorted order
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Decode a filter from its JSON representation.
    ///
    /// The object must carry a `filterType` property naming a registered
    /// variant; the remaining properties are the variant's fields.
    pub fn decode(&self, value: Value) -> Result<Box<dyn EventFilter<E>>, FilterError> {
        let Value::Object(mut fields) = value else {
            return Err(FilterError::NotAnObject);
        };

        let tag = match fields.remove(FILTER_TYPE_PROPERTY) {
            Some(Value::String(tag)) => tag,
            _ => return Err(FilterError::MissingType),
        };

        let decoder = self
            .decoders
            .get(&tag)
            .ok_or_else(|| FilterError::UnknownType(tag.clone()))?;

        decoder(Value::Object(fields)).map_err(|e| FilterError::Decode(e.to_string()))
    }

    /// Decode a filter from a JSON string
    pub fn decode_str(&self, json: &str) -> Result<Box<dyn EventFilter<E>>, FilterError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| FilterError::Decode(e.to_string()))?;
        self.decode(value)
    }
}

impl FilterRegistry<AttributeEvent> {
    /// Registry with every built-in attribute event filter
    pub fn attribute_filters() -> Self {
        let mut registry = Self::new();
        registry.register::<EntityIdFilter>();
        registry
    }
}

impl<E: SharedEvent> Default for FilterRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_as<E, F>(value: Value) -> Result<Box<dyn EventFilter<E>>, serde_json::Error>
where
    E: SharedEvent,
    F: EventFilter<E> + DeserializeOwned + 'static,
{
    let filter: F = serde_json::from_value(value)?;
    Ok(Box::new(filter))
}

/// Encode a filter as a JSON object tagged with its `filterType`.
pub fn encode_filter<E, F>(filter: &F) -> Result<Value, FilterError>
where
    E: SharedEvent,
    F: EventFilter<E> + Serialize,
{
    let value = serde_json::to_value(filter).map_err(|e| FilterError::Encode(e.to_string()))?;
    let Value::Object(mut fields) = value else {
        return Err(FilterError::NotAnObject);
    };
    fields.insert(
        FILTER_TYPE_PROPERTY.to_string(),
        Value::String(EventFilter::<E>::filter_type(filter)),
    );
    Ok(Value::Object(fields))
}
