use super::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Filter defined outside the built-ins, with no "Filter" suffix
#[derive(Debug, Deserialize, Serialize)]
struct Custom {
    min_len: usize,
}

impl EventFilter<AttributeEvent> for Custom {
    fn apply(&self, event: &AttributeEvent) -> Option<AttributeEvent> {
        if event.attribute_name.len() >= self.min_len {
            Some(event.clone())
        } else {
            None
        }
    }
}

/// Transforming filter: replaces the value with its string form
#[derive(Debug, Deserialize, Serialize)]
struct StringifyValueFilter;

impl EventFilter<AttributeEvent> for StringifyValueFilter {
    fn apply(&self, event: &AttributeEvent) -> Option<AttributeEvent> {
        let mut out = event.clone();
        out.value = json!(event.value.to_string());
        Some(out)
    }
}

#[test]
fn test_filter_type_strips_filter_suffix() {
    assert_eq!(filter_type("EntityIdFilter"), "entity-id");
    assert_eq!(filter_type("TenantFilter"), "tenant");
}

#[test]
fn test_filter_type_without_suffix() {
    assert_eq!(filter_type("Custom"), "custom");
    assert_eq!(filter_type("AssetQuery"), "asset-query");
}

#[test]
fn test_filter_type_strips_only_one_suffix() {
    assert_eq!(filter_type("FilterFilter"), "filter");
    assert_eq!(filter_type("AttributeFilterFilter"), "attribute-filter");
}

#[test]
fn test_filter_type_keeps_bare_suffix() {
    // "Filter" has no dash, "-filter" alone is not stripped to nothing
    assert_eq!(filter_type("Filter"), "filter");
}

#[test]
fn test_filter_type_uses_simple_name() {
    assert_eq!(filter_type("assetmap::event::EntityIdFilter"), "entity-id");
    assert_eq!(filter_type("my::PagedFilter<my::Inner>"), "paged");
}

#[test]
fn test_filter_type_is_deterministic() {
    let first = filter_type("AssetTreeModifiedFilter");
    for _ in 0..10 {
        assert_eq!(filter_type("AssetTreeModifiedFilter"), first);
    }
    assert_eq!(first, "asset-tree-modified");
}

#[test]
fn test_lower_case_dash_keeps_upper_case_runs_together() {
    assert_eq!(to_lower_case_dash("AssetIDFilter"), "asset-idfilter");
    assert_eq!(to_lower_case_dash("already-dashed"), "already-dashed");
    assert_eq!(to_lower_case_dash(""), "");
}

#[test]
fn test_instance_filter_type_from_concrete_type() {
    assert_eq!(EntityIdFilter::new("a").filter_type(), "entity-id");
    assert_eq!(Custom { min_len: 1 }.filter_type(), "custom");
    assert_eq!(StringifyValueFilter.filter_type(), "stringify-value");

    // Through a trait object the concrete type still decides the tag
    let boxed: Box<dyn EventFilter<AttributeEvent>> = Box::new(EntityIdFilter::new("a"));
    assert_eq!(boxed.filter_type(), "entity-id");
}

#[test]
fn test_event_type_name() {
    assert_eq!(AttributeEvent::event_type(), "attribute-event");
}

#[test]
fn test_entity_id_filter_matches() {
    let filter = EntityIdFilter::new("asset-1");
    let event = AttributeEvent::new("asset-1", "temperature", json!(21.5));

    assert_eq!(filter.apply(&event), Some(event.clone()));
}

#[test]
fn test_entity_id_filter_no_match() {
    let filter = EntityIdFilter::new("asset-1");
    let event = AttributeEvent::new("asset-2", "temperature", json!(21.5));

    assert_eq!(filter.apply(&event), None);
}

#[test]
fn test_apply_does_not_mutate_input() {
    let event = AttributeEvent::new("asset-1", "location", json!([1.0, 2.0]));
    let before = event.clone();

    let transformed = StringifyValueFilter.apply(&event).unwrap();
    assert_eq!(transformed.value, json!("[1.0,2.0]"));
    assert_eq!(event, before);

    let _ = EntityIdFilter::new("asset-1").apply(&event);
    let _ = Custom { min_len: 100 }.apply(&event);
    assert_eq!(event, before);
}

#[test]
fn test_registry_decodes_entity_id_filter() {
    let registry = FilterRegistry::attribute_filters();
    assert!(registry.contains("entity-id"));

    let filter = registry
        .decode(json!({"filterType": "entity-id", "entityId": "asset-1"}))
        .unwrap();
    assert_eq!(filter.filter_type(), "entity-id");

    let matching = AttributeEvent::new("asset-1", "on", json!(true));
    let other = AttributeEvent::new("asset-9", "on", json!(true));
    assert!(filter.apply(&matching).is_some());
    assert!(filter.apply(&other).is_none());
}

#[test]
fn test_registry_register_returns_derived_tag() {
    let mut registry = FilterRegistry::<AttributeEvent>::new();
    assert_eq!(registry.register::<Custom>(), "custom");
    assert_eq!(registry.register::<EntityIdFilter>(), "entity-id");
    assert_eq!(registry.tags(), vec!["custom", "entity-id"]);

    let filter = registry.decode_str(r#"{"filterType":"custom","min_len":3}"#).unwrap();
    assert!(filter
        .apply(&AttributeEvent::new("a", "abc", json!(null)))
        .is_some());
    assert!(filter
        .apply(&AttributeEvent::new("a", "ab", json!(null)))
        .is_none());
}

#[test]
fn test_registry_rejects_unknown_type() {
    let registry = FilterRegistry::attribute_filters();
    let result = registry.decode(json!({"filterType": "tenant", "realm": "master"}));
    assert_eq!(
        result.err(),
        Some(FilterError::UnknownType("tenant".to_string()))
    );
}

#[test]
fn test_registry_rejects_missing_type() {
    let registry = FilterRegistry::attribute_filters();

    let missing = registry.decode(json!({"entityId": "asset-1"}));
    assert_eq!(missing.err(), Some(FilterError::MissingType));

    let not_string = registry.decode(json!({"filterType": 7, "entityId": "asset-1"}));
    assert_eq!(not_string.err(), Some(FilterError::MissingType));
}

#[test]
fn test_registry_rejects_non_object() {
    let registry = FilterRegistry::attribute_filters();
    let result = registry.decode(json!(["entity-id"]));
    assert_eq!(result.err(), Some(FilterError::NotAnObject));
}

#[test]
fn test_registry_rejects_malformed_body() {
    let registry = FilterRegistry::attribute_filters();
    let result = registry.decode(json!({"filterType": "entity-id"}));
    match result.err() {
        Some(FilterError::Decode(_)) => {}
        other => panic!("Expected Decode error, got {:?}", other),
    }
}

#[test]
fn test_encode_filter_adds_filter_type() {
    let value = encode_filter::<AttributeEvent, _>(&EntityIdFilter::new("asset-1")).unwrap();
    assert_eq!(value, json!({"filterType": "entity-id", "entityId": "asset-1"}));

    // Encoded form is accepted by the registry
    let registry = FilterRegistry::attribute_filters();
    assert!(registry.decode(value).is_ok());
}

#[test]
fn test_encode_unit_filter_is_not_an_object() {
    let result = encode_filter::<AttributeEvent, _>(&StringifyValueFilter);
    assert_eq!(result.err(), Some(FilterError::NotAnObject));
}

/// Filter whose map keys have no JSON representation
#[derive(Debug, Serialize)]
struct GridCellFilter {
    cells: BTreeMap<(u8, u8), bool>,
}

impl EventFilter<AttributeEvent> for GridCellFilter {
    fn apply(&self, event: &AttributeEvent) -> Option<AttributeEvent> {
        Some(event.clone())
    }
}

#[test]
fn test_encode_failure_is_encode_error() {
    let filter = GridCellFilter {
        cells: BTreeMap::from([((0, 1), true)]),
    };

    let err = encode_filter::<AttributeEvent, _>(&filter).unwrap_err();
    assert!(matches!(err, FilterError::Encode(_)));
    assert!(err.to_string().starts_with("cannot encode filter"));
}

#[test]
fn test_attribute_event_wire_format() {
    let event = AttributeEvent::new("asset-1", "temperature", json!(20));
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["entityId"], json!("asset-1"));
    assert_eq!(value["attributeName"], json!("temperature"));
}
