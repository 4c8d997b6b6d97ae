use alloc::string::String;
use core::fmt;

/// Defines a portable, descriptive error type for address space operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested node does not exist in the space.
    NodeNotFound,
    /// The node used as a type definition is not an object type.
    NotAnObjectType,
    /// An attempt was made to instantiate an abstract type.
    AbstractType(String),
    /// The operation requires an object node.
    NotAnObject,
    /// The operation requires a variable node.
    NotAVariable,
    /// The named property is not declared on the instance or its type chain.
    UnknownProperty(String),
    /// A child node is already attached to another owner.
    AlreadyAttached,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound => write!(f, "The requested node was not found"),
            Self::NotAnObjectType => write!(f, "Node is not an object type"),
            Self::AbstractType(name) => {
                write!(f, "Object type '{name}' is abstract and cannot be instantiated")
            }
            Self::NotAnObject => write!(f, "Node is not an object"),
            Self::NotAVariable => write!(f, "Node is not a variable"),
            Self::UnknownProperty(name) => {
                write!(f, "Property '{name}' is not declared on the instance or its type")
            }
            Self::AlreadyAttached => write!(f, "Node is already attached to an owner"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}
