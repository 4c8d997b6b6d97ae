// crates/alarmlink-rs-csv/src/schema.rs

use alarmlink_rs::types::LAST_EVENT_PROPERTY;
use alarmlink_rs::{NodeClass, NodeId, NodeStore};

/// Computes the full ordered property name set applicable to an entity
/// type: the well-known common properties actually declared along its
/// supertype chain, then every property declared directly on the type that
/// is not already present. `LastEvent` is the non-configurable audit slot
/// and never appears. The result is stable and deduplicated.
pub fn resolve_properties(
    store: &dyn NodeStore,
    entity_type: NodeId,
    common_properties: &[String],
) -> Vec<String> {
    let mut resolved = Vec::new();
    extend_with_type_properties(store, entity_type, common_properties, &mut resolved);
    resolved
}

/// Appends the resolved property names to an existing column list, skipping
/// names already present. Used by the export engine, which seeds the list
/// with its fixed leading columns.
pub(crate) fn extend_with_type_properties(
    store: &dyn NodeStore,
    entity_type: NodeId,
    common_properties: &[String],
    columns: &mut Vec<String>,
) {
    let chain = store.super_type_chain(entity_type);
    for name in common_properties {
        if name == LAST_EVENT_PROPERTY || columns.contains(name) {
            continue;
        }
        let declared = chain
            .iter()
            .any(|&ty| store.child_by_name(ty, name).is_some());
        if declared {
            columns.push(name.clone());
        }
    }

    for child in store.children(entity_type) {
        if store.node_class(child) != Some(NodeClass::Variable) {
            continue;
        }
        let Some(name) = store.browse_name(child) else {
            continue;
        };
        if name != LAST_EVENT_PROPERTY && !columns.contains(&name) {
            columns.push(name);
        }
    }
}
