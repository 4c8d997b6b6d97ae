// crates/alarmlink-rs/src/predefined.rs

//! Populates the built-in alarm controller type hierarchy.

use crate::error::StoreError;
use crate::space::AddressSpace;
use crate::types::{ALARM_CONTROLLER_TYPE, LAST_EVENT_PROPERTY, LIMIT_ALARM_CONTROLLER_TYPE, NodeId};
use crate::value::{ScalarKind, ScalarValue};
use alloc::format;
use alloc::string::ToString;

/// Browse names of the built-in alarm controller types, used to resolve a
/// declared type name against the catalog when it is not a project type.
pub const BUILTIN_ALARM_TYPES: &[&str] = &[
    ALARM_CONTROLLER_TYPE,
    LIMIT_ALARM_CONTROLLER_TYPE,
    "ExclusiveLimitAlarmController",
    "NonExclusiveLimitAlarmController",
    "ExclusiveLevelAlarmController",
    "NonExclusiveLevelAlarmController",
    "ExclusiveDeviationAlarmController",
    "NonExclusiveDeviationAlarmController",
    "ExclusiveRateOfChangeAlarmController",
    "NonExclusiveRateOfChangeAlarmController",
    "DigitalAlarmController",
];

/// Registers the built-in alarm type hierarchy and its declared property
/// slots. Returns the abstract family root. The type nodes stay detached
/// from the browse tree, like every host-native type.
pub fn populate_alarm_types(space: &mut AddressSpace) -> Result<NodeId, StoreError> {
    let controller = space.add_object_type(ALARM_CONTROLLER_TYPE, None, true, false)?;
    declare(space, controller, "Enabled", ScalarKind::Bool, Some(ScalarValue::Bool(true)))?;
    declare(space, controller, "AutoAcknowledge", ScalarKind::Bool, Some(ScalarValue::Bool(false)))?;
    declare(space, controller, "AutoConfirm", ScalarKind::Bool, Some(ScalarValue::Bool(false)))?;
    declare(space, controller, "Severity", ScalarKind::UInt16, Some(ScalarValue::UInt16(500)))?;
    declare(space, controller, "Message", ScalarKind::String, Some(ScalarValue::String("".to_string())))?;
    declare(space, controller, "LocalizedMessage", ScalarKind::LocalizedText, None)?;
    declare(space, controller, "InputValue", ScalarKind::Double, None)?;
    declare(space, controller, "PollingTime", ScalarKind::Int32, Some(ScalarValue::Int32(500)))?;
    declare(space, controller, LAST_EVENT_PROPERTY, ScalarKind::String, None)?;
    // Shelving timers exist only on alarms that opt into them.
    space.declare_property(controller, "MaxTimeShelved", ScalarKind::Duration, true, None)?;
    space.declare_property(controller, "PresetTimeShelved", ScalarKind::Duration, true, None)?;

    let limit = space.add_object_type(LIMIT_ALARM_CONTROLLER_TYPE, Some(controller), true, false)?;
    for state in ["HighHighState", "HighState", "LowState", "LowLowState"] {
        let message = format!("Message{state}");
        declare(space, limit, &message, ScalarKind::String, Some(ScalarValue::String("".to_string())))?;
        let localized = format!("LocalizedMessage{state}");
        declare(space, limit, &localized, ScalarKind::LocalizedText, None)?;
    }
    for bound in ["HighHighLimit", "HighLimit", "LowLimit", "LowLowLimit"] {
        declare(space, limit, bound, ScalarKind::Double, None)?;
    }

    for name in [
        "ExclusiveLimitAlarmController",
        "NonExclusiveLimitAlarmController",
        "ExclusiveLevelAlarmController",
        "NonExclusiveLevelAlarmController",
        "ExclusiveRateOfChangeAlarmController",
        "NonExclusiveRateOfChangeAlarmController",
    ] {
        space.add_object_type(name, Some(limit), false, false)?;
    }
    for name in [
        "ExclusiveDeviationAlarmController",
        "NonExclusiveDeviationAlarmController",
    ] {
        let deviation = space.add_object_type(name, Some(limit), false, false)?;
        declare(space, deviation, "Setpoint", ScalarKind::Double, None)?;
    }

    let digital = space.add_object_type("DigitalAlarmController", Some(controller), false, false)?;
    declare(space, digital, "NormalStateValue", ScalarKind::Bool, Some(ScalarValue::Bool(false)))?;

    Ok(controller)
}

fn declare(
    space: &mut AddressSpace,
    ty: NodeId,
    name: &str,
    kind: ScalarKind,
    default: Option<ScalarValue>,
) -> Result<(), StoreError> {
    space.declare_property(ty, name, kind, false, default)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NodeStore;

    #[test]
    fn test_hierarchy_shape() {
        let mut space = AddressSpace::new();
        let controller = populate_alarm_types(&mut space).unwrap();
        assert!(space.is_abstract(controller));
        assert!(!space.is_user_defined(controller));

        let limit = space.find_object_type(LIMIT_ALARM_CONTROLLER_TYPE).unwrap();
        assert_eq!(space.super_type(limit), Some(controller));
        assert_eq!(space.sub_types(limit).len(), 8);

        let digital = space.find_object_type("DigitalAlarmController").unwrap();
        assert!(!space.is_abstract(digital));
        assert_eq!(space.super_type(digital), Some(controller));
    }

    #[test]
    fn test_instances_inherit_declared_slots() {
        let mut space = AddressSpace::new();
        populate_alarm_types(&mut space).unwrap();
        let ty = space.find_object_type("ExclusiveDeviationAlarmController").unwrap();
        let alarm = space.make_object("Alarm1", ty).unwrap();

        for property in ["Enabled", "Message", "HighLimit", "Setpoint", LAST_EVENT_PROPERTY] {
            assert!(
                space.child_by_name(alarm, property).is_some(),
                "missing slot {property}"
            );
        }
        // Optional shelving slots are declared but not materialized.
        assert!(space.child_by_name(alarm, "MaxTimeShelved").is_none());
        assert_eq!(
            space.declared_kind(alarm, "MaxTimeShelved"),
            Some(ScalarKind::Duration)
        );
    }
}
