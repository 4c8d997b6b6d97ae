// crates/alarmlink-rs/src/space.rs

use crate::error::StoreError;
use crate::link::DynamicLink;
use crate::store::{NodeClass, NodeStore};
use crate::types::NodeId;
use crate::value::{ScalarKind, ScalarValue};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use log::{error, trace};

/// A property slot on a variable node.
///
/// A slot holds at most one active binding at a time: storing a literal
/// clears the link and binding a link clears the literal. `kind` is the
/// declared kind used for textual coercion; the stored value is allowed to
/// diverge from it when the binder falls back to plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSlot {
    pub kind: ScalarKind,
    pub value: Option<ScalarValue>,
    pub link: Option<DynamicLink>,
    /// Declared-but-not-materialized template slots are created on the
    /// instance only when first written.
    pub optional: bool,
}

impl VariableSlot {
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            value: None,
            link: None,
            optional: false,
        }
    }
}

/// Metadata of an object type node.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub base: Option<NodeId>,
    pub subtypes: Vec<NodeId>,
    pub is_abstract: bool,
    pub user_defined: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum NodeBody {
    Folder,
    Object { type_def: NodeId },
    Variable(VariableSlot),
    ObjectType(TypeDefinition),
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    browse_name: String,
    owner: Option<NodeId>,
    children: Vec<NodeId>,
    body: NodeBody,
}

/// The in-memory reference implementation of [`NodeStore`].
///
/// Object type nodes may live detached from the browse tree (the built-in
/// catalog does); they stay reachable through the type index by name.
#[derive(Debug)]
pub struct AddressSpace {
    nodes: BTreeMap<u32, Node>,
    type_index: BTreeMap<String, NodeId>,
    next_id: u32,
    root: NodeId,
}

impl AddressSpace {
    /// Creates a space containing only the root folder.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            0,
            Node {
                browse_name: "Project".to_string(),
                owner: None,
                children: Vec::new(),
                body: NodeBody::Folder,
            },
        );
        Self {
            nodes,
            type_index: BTreeMap::new(),
            next_id: 1,
            root: NodeId(0),
        }
    }

    fn alloc(&mut self, name: &str, body: NodeBody) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id.0,
            Node {
                browse_name: name.to_string(),
                owner: None,
                children: Vec::new(),
                body,
            },
        );
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id.0)
    }

    fn slot(&self, id: NodeId) -> Option<&VariableSlot> {
        match &self.node(id)?.body {
            NodeBody::Variable(slot) => Some(slot),
            _ => None,
        }
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut VariableSlot> {
        match &mut self.node_mut(id)?.body {
            NodeBody::Variable(slot) => Some(slot),
            _ => None,
        }
    }

    /// Registers a new object type. Detached from the browse tree; attach
    /// it with [`NodeStore::add_child`] if it should be path-addressable.
    pub fn add_object_type(
        &mut self,
        name: &str,
        base: Option<NodeId>,
        is_abstract: bool,
        user_defined: bool,
    ) -> Result<NodeId, StoreError> {
        if let Some(b) = base {
            if !matches!(self.node(b).map(|n| &n.body), Some(NodeBody::ObjectType(_))) {
                return Err(StoreError::NotAnObjectType);
            }
        }
        let id = self.alloc(
            name,
            NodeBody::ObjectType(TypeDefinition {
                base,
                subtypes: Vec::new(),
                is_abstract,
                user_defined,
            }),
        );
        if let Some(b) = base {
            if let Some(NodeBody::ObjectType(def)) = self.node_mut(b).map(|n| &mut n.body) {
                def.subtypes.push(id);
            }
        }
        self.type_index.insert(name.to_ascii_lowercase(), id);
        Ok(id)
    }

    /// Declares a property slot on an object type. `default` seeds the
    /// slot value of every instance materializing it.
    pub fn declare_property(
        &mut self,
        ty: NodeId,
        name: &str,
        kind: ScalarKind,
        optional: bool,
        default: Option<ScalarValue>,
    ) -> Result<NodeId, StoreError> {
        if !matches!(self.node(ty).map(|n| &n.body), Some(NodeBody::ObjectType(_))) {
            return Err(StoreError::NotAnObjectType);
        }
        let slot = VariableSlot {
            kind,
            value: default,
            link: None,
            optional,
        };
        let id = self.alloc(name, NodeBody::Variable(slot));
        self.attach(ty, id)?;
        Ok(id)
    }

    /// Creates a detached plain variable node, e.g. a process tag that
    /// alarm properties link against.
    pub fn make_variable(&mut self, name: &str, kind: ScalarKind) -> NodeId {
        self.alloc(name, NodeBody::Variable(VariableSlot::new(kind)))
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), StoreError> {
        if self.node(parent).is_none() {
            return Err(StoreError::NodeNotFound);
        }
        let node = self.node_mut(child).ok_or(StoreError::NodeNotFound)?;
        if node.owner.is_some() {
            return Err(StoreError::AlreadyAttached);
        }
        node.owner = Some(parent);
        self.node_mut(parent)
            .ok_or(StoreError::NodeNotFound)?
            .children
            .push(child);
        Ok(())
    }

    /// Finds the declared template slot for `property` along the type
    /// chain, most derived type first.
    fn template_for(&self, ty: NodeId, property: &str) -> Option<&VariableSlot> {
        let mut current = Some(ty);
        while let Some(t) = current {
            for &child in &self.node(t)?.children {
                let node = self.node(child)?;
                if node.browse_name == property {
                    if let NodeBody::Variable(slot) = &node.body {
                        return Some(slot);
                    }
                }
            }
            current = match &self.node(t)?.body {
                NodeBody::ObjectType(def) => def.base,
                _ => None,
            };
        }
        None
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.remove(&n.0) {
                stack.extend(node.children);
            }
        }
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore for AddressSpace {
    fn root(&self) -> NodeId {
        self.root
    }

    fn find(&self, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return None;
        }
        let mut current = self.root;
        for segment in path.split(crate::types::PATH_SEPARATOR) {
            current = self.child_by_name(current, segment)?;
        }
        Some(current)
    }

    fn find_object_type(&self, name: &str) -> Option<NodeId> {
        self.type_index.get(&name.to_ascii_lowercase()).copied()
    }

    fn browse_name(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.browse_name.clone())
    }

    fn owner(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.owner
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).is_some_and(|n| n.browse_name == name))
    }

    fn node_class(&self, node: NodeId) -> Option<NodeClass> {
        Some(match self.node(node)?.body {
            NodeBody::Folder => NodeClass::Folder,
            NodeBody::Object { .. } => NodeClass::Object,
            NodeBody::Variable(_) => NodeClass::Variable,
            NodeBody::ObjectType(_) => NodeClass::ObjectType,
        })
    }

    fn type_definition(&self, node: NodeId) -> Option<NodeId> {
        match self.node(node)?.body {
            NodeBody::Object { type_def } => Some(type_def),
            _ => None,
        }
    }

    fn super_type(&self, ty: NodeId) -> Option<NodeId> {
        match &self.node(ty)?.body {
            NodeBody::ObjectType(def) => def.base,
            _ => None,
        }
    }

    fn sub_types(&self, ty: NodeId) -> Vec<NodeId> {
        match self.node(ty).map(|n| &n.body) {
            Some(NodeBody::ObjectType(def)) => def.subtypes.clone(),
            _ => Vec::new(),
        }
    }

    fn is_abstract(&self, ty: NodeId) -> bool {
        matches!(
            self.node(ty).map(|n| &n.body),
            Some(NodeBody::ObjectType(def)) if def.is_abstract
        )
    }

    fn is_user_defined(&self, ty: NodeId) -> bool {
        matches!(
            self.node(ty).map(|n| &n.body),
            Some(NodeBody::ObjectType(def)) if def.user_defined
        )
    }

    fn instances_of(&self, ty: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| matches!(n.body, NodeBody::Object { type_def } if type_def == ty))
            .map(|(&id, _)| NodeId(id))
            .collect()
    }

    fn make_object(&mut self, name: &str, ty: NodeId) -> Result<NodeId, StoreError> {
        let def = match self.node(ty).map(|n| &n.body) {
            Some(NodeBody::ObjectType(def)) => def,
            Some(_) => return Err(StoreError::NotAnObjectType),
            None => return Err(StoreError::NodeNotFound),
        };
        if def.is_abstract {
            let type_name = self.browse_name(ty).unwrap_or_default();
            error!("Cannot instantiate abstract type '{type_name}'");
            return Err(StoreError::AbstractType(type_name));
        }

        let object = self.alloc(name, NodeBody::Object { type_def: ty });

        // Materialize mandatory declared slots, root-most supertype first
        // so inherited properties keep a stable leading position.
        let mut chain = vec![ty];
        chain.extend(self.super_type_chain(ty));
        let mut materialized: Vec<(String, VariableSlot)> = Vec::new();
        for &t in chain.iter().rev() {
            for child in self.children(t) {
                let Some(node) = self.node(child) else { continue };
                let NodeBody::Variable(slot) = &node.body else { continue };
                if slot.optional || materialized.iter().any(|(n, _)| *n == node.browse_name) {
                    continue;
                }
                materialized.push((node.browse_name.clone(), slot.clone()));
            }
        }
        let slot_count = materialized.len();
        for (prop_name, mut slot) in materialized {
            slot.optional = false;
            let var = self.alloc(&prop_name, NodeBody::Variable(slot));
            self.attach(object, var)?;
        }
        trace!("Instantiated '{name}' with {slot_count} declared slots");
        Ok(object)
    }

    fn ensure_folder(&mut self, parent: NodeId, name: &str) -> Result<NodeId, StoreError> {
        if let Some(existing) = self.child_by_name(parent, name) {
            return Ok(existing);
        }
        let folder = self.alloc(name, NodeBody::Folder);
        self.attach(parent, folder)?;
        Ok(folder)
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), StoreError> {
        self.attach(parent, child)
    }

    fn remove_child_by_name(&mut self, parent: NodeId, name: &str) -> bool {
        let Some(child) = self.child_by_name(parent, name) else {
            return false;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        self.drop_subtree(child);
        true
    }

    fn declared_kind(&self, object: NodeId, property: &str) -> Option<ScalarKind> {
        if let Some(child) = self.child_by_name(object, property) {
            return self.slot(child).map(|s| s.kind);
        }
        let ty = self.type_definition(object)?;
        self.template_for(ty, property).map(|s| s.kind)
    }

    fn get_or_create_variable(
        &mut self,
        object: NodeId,
        property: &str,
    ) -> Result<NodeId, StoreError> {
        if let Some(child) = self.child_by_name(object, property) {
            return match self.node(child).map(|n| &n.body) {
                Some(NodeBody::Variable(_)) => Ok(child),
                _ => Err(StoreError::NotAVariable),
            };
        }
        let ty = self
            .type_definition(object)
            .ok_or(StoreError::NotAnObject)?;
        let template = self
            .template_for(ty, property)
            .ok_or_else(|| StoreError::UnknownProperty(property.to_string()))?
            .clone();
        let var = self.alloc(property, NodeBody::Variable(template));
        self.attach(object, var)?;
        Ok(var)
    }

    fn variable_kind(&self, variable: NodeId) -> Option<ScalarKind> {
        self.slot(variable).map(|s| s.kind)
    }

    fn read_value(&self, variable: NodeId) -> Option<ScalarValue> {
        self.slot(variable)?.value.clone()
    }

    fn write_value(&mut self, variable: NodeId, value: ScalarValue) -> Result<(), StoreError> {
        let slot = self.slot_mut(variable).ok_or(StoreError::NotAVariable)?;
        slot.value = Some(value);
        slot.link = None;
        Ok(())
    }

    fn read_link(&self, variable: NodeId) -> Option<DynamicLink> {
        self.slot(variable)?.link.clone()
    }

    fn set_link(&mut self, variable: NodeId, link: DynamicLink) -> Result<(), StoreError> {
        let slot = self.slot_mut(variable).ok_or(StoreError::NotAVariable)?;
        slot.link = Some(link);
        slot.value = None;
        Ok(())
    }
}
