use super::{AttributeEvent, SharedEvent};
use serde::{Deserialize, Serialize};

const FILTER_SUFFIX: &str = "-filter";

/// Filters events of one kind by arbitrary criteria.
///
/// Filters are constructed once (in code, or decoded from a wire message via
/// [`FilterRegistry`](super::FilterRegistry)) and then invoked for every
/// candidate event of a subscription.
pub trait EventFilter<E: SharedEvent>: Send + Sync {
    /// Returns the matched (possibly transformed) event, or `None` if the
    /// filter doesn't match.
    ///
    /// Must be total over all well-formed events and must not keep
    /// references to the event across calls.
    fn apply(&self, event: &E) -> Option<E>;

    /// Wire-format tag of the concrete filter variant
    fn filter_type(&self) -> String {
        filter_type(std::any::type_name_of_val(self))
    }
}

impl<E: SharedEvent> EventFilter<E> for Box<dyn EventFilter<E>> {
    fn apply(&self, event: &E) -> Option<E> {
        (**self).apply(event)
    }

    fn filter_type(&self) -> String {
        (**self).filter_type()
    }
}

/// Derives the wire-format tag for a filter type name.
///
/// The simple name is converted to lower-case-dash form and one trailing
/// `-filter` is removed, so `EntityIdFilter` becomes `entity-id`.
///
/// # Examples
///
/// ```
/// use assetmap::event::filter_type;
///
/// assert_eq!(filter_type("EntityIdFilter"), "entity-id");
/// assert_eq!(filter_type("assetmap::event::EntityIdFilter"), "entity-id");
/// assert_eq!(filter_type("Custom"), "custom");
/// ```
pub fn filter_type(type_name: &str) -> String {
    let mut tag = to_lower_case_dash(simple_type_name(type_name));
    // A bare "-filter" is kept as is
    if tag.len() > FILTER_SUFFIX.len() && tag.ends_with(FILTER_SUFFIX) {
        tag.truncate(tag.len() - FILTER_SUFFIX.len());
    }
    tag
}

/// Strips the module path and generic arguments from a type name.
pub fn simple_type_name(type_name: &str) -> &str {
    let without_generics = type_name.split('<').next().unwrap_or(type_name);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// Converts camel case to lower-case-dash form.
///
/// A dash is inserted where a lower-case letter is followed by an upper-case
/// run; an upper-case run itself stays together ("AssetIDFilter" becomes
/// "asset-idfilter").
pub fn to_lower_case_dash(camel_case: &str) -> String {
    let mut out = String::with_capacity(camel_case.len() + 4);
    let mut prev: Option<char> = None;

    for c in camel_case.chars() {
        if c.is_ascii_uppercase() && prev.map_or(false, |p| p.is_ascii_lowercase()) {
            out.push('-');
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }

    out
}

/// Matches attribute events of a single entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityIdFilter {
    pub entity_id: String,
}

impl EntityIdFilter {
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
        }
    }
}

impl EventFilter<AttributeEvent> for EntityIdFilter {
    fn apply(&self, event: &AttributeEvent) -> Option<AttributeEvent> {
        if event.entity_id == self.entity_id {
            Some(event.clone())
        } else {
            None
        }
    }
}
