#![cfg_attr(not(feature = "std"), no_std)]

// 'alloc' is used for dynamic allocation (e.g., browse names, value strings)
extern crate alloc;

// --- Foundation Modules ---
pub mod error;
pub mod types;
pub mod value;

// --- Bindings ---
pub mod link;

// --- Tree Abstraction ---
pub mod predefined;
pub mod space;
pub mod store;

// --- Top-level Exports ---
pub use error::StoreError;
pub use link::DynamicLink;
pub use space::{AddressSpace, TypeDefinition, VariableSlot};
pub use store::{NodeClass, NodeStore};
pub use types::NodeId;
pub use value::{Duration, LocalizedText, ScalarKind, ScalarValue, ValueParseError};
