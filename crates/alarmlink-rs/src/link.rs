use crate::types::NodeId;
use alloc::string::String;

/// An indirect binding from a property slot to another tree node.
///
/// `path` carries the textual reference, including any re-appended array
/// index or bit index suffix. Alias references keep their brace-delimited
/// token verbatim and stay unresolved (`target` is `None`) until the host
/// resolves the alias at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicLink {
    pub target: Option<NodeId>,
    pub path: String,
}

impl DynamicLink {
    /// A link to a resolved variable node.
    pub fn to_variable(target: NodeId, path: impl Into<String>) -> Self {
        Self {
            target: Some(target),
            path: path.into(),
        }
    }

    /// An alias-qualified reference, stored verbatim.
    pub fn alias(path: impl Into<String>) -> Self {
        Self {
            target: None,
            path: path.into(),
        }
    }

    pub fn is_alias(&self) -> bool {
        self.path.starts_with('{')
    }
}
