use core::fmt;

/// Identifies a node inside an address space, wrapping a `u32` to ensure
/// type safety.
///
/// Node ids are allocated by the owning [`crate::space::AddressSpace`] and are
/// meaningless across spaces. The newtype pattern prevents accidental use of
/// arbitrary integers where a `NodeId` is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// --- Model Constants ---

/// Separator between segments of a browse path.
pub const PATH_SEPARATOR: char = '/';

/// Browse name of the abstract root type of the alarm controller family.
pub const ALARM_CONTROLLER_TYPE: &str = "AlarmController";

/// Browse name of the abstract base type of all limit alarm controllers.
pub const LIMIT_ALARM_CONTROLLER_TYPE: &str = "LimitAlarmController";

/// Browse name of the non-configurable audit slot carried by every alarm
/// controller. Never part of a resolved property schema.
pub const LAST_EVENT_PROPERTY: &str = "LastEvent";
