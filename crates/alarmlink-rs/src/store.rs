use crate::error::StoreError;
use crate::link::DynamicLink;
use crate::types::NodeId;
use crate::value::{ScalarKind, ScalarValue};
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Broad classification of a node as seen through the store boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Folder,
    Object,
    Variable,
    ObjectType,
}

/// Host node-store capability consumed by the mapping engines.
///
/// This trait abstracts the project tree that owns all configuration
/// entities, enabling the synchronization logic to remain host-agnostic
/// (no_std). [`crate::space::AddressSpace`] is the reference implementation;
/// a host runtime can provide its own.
pub trait NodeStore {
    /// The root node under which all browse paths are resolved.
    fn root(&self) -> NodeId;

    /// Resolves a `/`-delimited browse path from the root.
    fn find(&self, path: &str) -> Option<NodeId>;

    /// Looks up an object type by browse name, ASCII-case-insensitively,
    /// whether or not the type node is attached to the browse tree.
    fn find_object_type(&self, name: &str) -> Option<NodeId>;

    fn browse_name(&self, node: NodeId) -> Option<String>;

    fn owner(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId>;

    fn node_class(&self, node: NodeId) -> Option<NodeClass>;

    /// The type an object node was instantiated from.
    fn type_definition(&self, node: NodeId) -> Option<NodeId>;

    // --- Type hierarchy ---

    fn super_type(&self, ty: NodeId) -> Option<NodeId>;

    fn sub_types(&self, ty: NodeId) -> Vec<NodeId>;

    fn is_abstract(&self, ty: NodeId) -> bool;

    fn is_user_defined(&self, ty: NodeId) -> bool;

    /// Enumerates the live instances of a type (reverse references by type).
    fn instances_of(&self, ty: NodeId) -> Vec<NodeId>;

    // --- Mutation ---

    /// Instantiates a concrete object type. The new node is detached;
    /// attach it with [`NodeStore::add_child`].
    fn make_object(&mut self, name: &str, ty: NodeId) -> Result<NodeId, StoreError>;

    /// Returns the named child of `parent`, creating a folder of that name
    /// if no such child exists. Creating an existing segment is a no-op.
    fn ensure_folder(&mut self, parent: NodeId, name: &str) -> Result<NodeId, StoreError>;

    fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), StoreError>;

    /// Detaches and drops the named child. Returns whether a child was
    /// removed.
    fn remove_child_by_name(&mut self, parent: NodeId, name: &str) -> bool;

    // --- Variables ---

    /// The declared kind of a property, resolved against the instance's
    /// children first and its type chain's declared slots second.
    fn declared_kind(&self, object: NodeId, property: &str) -> Option<ScalarKind>;

    /// Returns the named property variable, materializing a declared
    /// optional slot on demand.
    fn get_or_create_variable(
        &mut self,
        object: NodeId,
        property: &str,
    ) -> Result<NodeId, StoreError>;

    fn variable_kind(&self, variable: NodeId) -> Option<ScalarKind>;

    fn read_value(&self, variable: NodeId) -> Option<ScalarValue>;

    /// Stores a literal. Clears any active dynamic link (a slot holds at
    /// most one binding kind at a time).
    fn write_value(&mut self, variable: NodeId, value: ScalarValue) -> Result<(), StoreError>;

    fn read_link(&self, variable: NodeId) -> Option<DynamicLink>;

    /// Binds a dynamic link. Clears any stored literal.
    fn set_link(&mut self, variable: NodeId, link: DynamicLink) -> Result<(), StoreError>;

    /// Reconstructs the `/`-joined browse path of a node up to (and
    /// excluding) the root.
    fn browse_path(&self, node: NodeId) -> Option<String> {
        let mut path = self.browse_name(node)?;
        let mut current = self.owner(node);
        while let Some(n) = current {
            if n == self.root() {
                break;
            }
            path = format!("{}/{}", self.browse_name(n)?, path);
            current = self.owner(n);
        }
        Some(path)
    }

    /// Walks the supertype chain of `ty` (excluding `ty` itself), root-most
    /// last.
    fn super_type_chain(&self, ty: NodeId) -> Vec<NodeId> {
        let mut chain = vec![];
        let mut current = self.super_type(ty);
        while let Some(t) = current {
            chain.push(t);
            current = self.super_type(t);
        }
        chain
    }
}
