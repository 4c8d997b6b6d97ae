// crates/alarmlink-rs-csv/src/registry.rs

use alarmlink_rs::predefined::BUILTIN_ALARM_TYPES;
use alarmlink_rs::types::{ALARM_CONTROLLER_TYPE, LIMIT_ALARM_CONTROLLER_TYPE};
use alarmlink_rs::{NodeId, NodeStore};

/// Discovers every concrete type reachable from `root` through the subtype
/// relation, `root` included when it is concrete itself.
///
/// Traversal is depth-first over an explicit stack, so a pathological
/// hierarchy depth cannot overflow the call stack. Abstract types are
/// walked through but excluded from the result.
pub fn discover_concrete_types(store: &dyn NodeStore, root: NodeId) -> Vec<NodeId> {
    let mut concrete = Vec::new();
    let mut stack = vec![root];
    while let Some(ty) = stack.pop() {
        if !store.is_abstract(ty) {
            concrete.push(ty);
        }
        let mut subs = store.sub_types(ty);
        subs.reverse(); // keep declaration order in the output
        stack.extend(subs);
    }
    concrete
}

/// Resolves a declared type name against the built-in catalog by
/// whole-token, ASCII-case-insensitive comparison.
pub fn match_builtin_type(store: &dyn NodeStore, name: &str) -> Option<NodeId> {
    BUILTIN_ALARM_TYPES
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(name))
        .and_then(|candidate| store.find_object_type(candidate))
}

/// Whether `ty` belongs to the alarm controller family.
pub fn is_alarm_family(store: &dyn NodeStore, ty: NodeId) -> bool {
    chain_contains(store, ty, ALARM_CONTROLLER_TYPE)
}

/// Whether `ty` descends from the limit alarm controller family (which
/// carries the per-threshold message slots).
pub fn is_limit_family(store: &dyn NodeStore, ty: NodeId) -> bool {
    chain_contains(store, ty, LIMIT_ALARM_CONTROLLER_TYPE)
}

fn chain_contains(store: &dyn NodeStore, ty: NodeId, name: &str) -> bool {
    let mut current = Some(ty);
    while let Some(t) = current {
        if store.browse_name(t).as_deref() == Some(name) {
            return true;
        }
        current = store.super_type(t);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use alarmlink_rs::predefined::populate_alarm_types;
    use alarmlink_rs::AddressSpace;

    #[test]
    fn test_discovery_excludes_abstract_types() {
        let mut space = AddressSpace::new();
        let controller = populate_alarm_types(&mut space).unwrap();
        let concrete = discover_concrete_types(&space, controller);

        assert!(!concrete.contains(&controller));
        let limit = space.find_object_type(LIMIT_ALARM_CONTROLLER_TYPE).unwrap();
        assert!(!concrete.contains(&limit));
        // 8 limit-family concrete types + DigitalAlarmController.
        assert_eq!(concrete.len(), 9);
    }

    #[test]
    fn test_discovery_includes_concrete_root_and_user_types() {
        let mut space = AddressSpace::new();
        let controller = populate_alarm_types(&mut space).unwrap();
        let digital = space.find_object_type("DigitalAlarmController").unwrap();
        let user = space
            .add_object_type("PumpAlarm", Some(digital), false, true)
            .unwrap();

        let concrete = discover_concrete_types(&space, controller);
        assert!(concrete.contains(&user));
        // A concrete root returns itself too.
        assert_eq!(discover_concrete_types(&space, digital), vec![digital, user]);
    }

    #[test]
    fn test_builtin_match_is_case_insensitive_whole_token() {
        let mut space = AddressSpace::new();
        populate_alarm_types(&mut space).unwrap();
        assert!(match_builtin_type(&space, "digitalalarmcontroller").is_some());
        assert!(match_builtin_type(&space, "DIGITALALARMCONTROLLER").is_some());
        // Prefixes of a catalog name do not match.
        assert!(match_builtin_type(&space, "DigitalAlarm").is_none());
        assert!(match_builtin_type(&space, "PumpAlarm").is_none());
    }

    #[test]
    fn test_family_checks() {
        let mut space = AddressSpace::new();
        populate_alarm_types(&mut space).unwrap();
        let digital = space.find_object_type("DigitalAlarmController").unwrap();
        let exclusive = space
            .find_object_type("ExclusiveLimitAlarmController")
            .unwrap();
        let stranger = space.add_object_type("Widget", None, false, true).unwrap();

        assert!(is_alarm_family(&space, digital));
        assert!(is_alarm_family(&space, exclusive));
        assert!(!is_alarm_family(&space, stranger));
        assert!(is_limit_family(&space, exclusive));
        assert!(!is_limit_family(&space, digital));
    }
}
