// In-memory module graph
//
// Arena of namespaces, types, callables and plain values. Declarations are
// members of their container automatically; explicit members model imports
// and re-exports, which is where cycles and aliases come from.

use crate::crawl::introspect::{Identity, Member, NamespaceLoader, NodeKind, ObjectGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Index of a node in a `ModuleGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
enum MemberRef {
    Node(NodeId),
    Broken(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    /// Defining namespace; `None` for synthetic nodes
    namespace: Option<String>,
    /// Dotted path for namespaces, qualified name otherwise
    name: String,
    marker: Option<String>,
    members: BTreeMap<String, MemberRef>,
    unreadable: Option<String>,
}

/// Arena-backed object graph
#[derive(Debug, Default)]
pub struct ModuleGraph {
    nodes: Vec<Node>,
    /// Canonical identity -> node
    by_identity: HashMap<Identity, NodeId>,
    /// Container identity -> declared members by attribute name
    declared: HashMap<Identity, BTreeMap<String, NodeId>>,
}

impl ModuleGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a namespace, or return the existing one with that path
    pub fn add_namespace(&mut self, path: &str) -> NodeId {
        let identity = Identity::Namespace(path.to_string());
        if let Some(&id) = self.by_identity.get(&identity) {
            return id;
        }

        let container = path
            .rsplit_once('.')
            .map(|(parent, attr)| (Identity::Namespace(parent.to_string()), attr.to_string()));

        self.insert_declared(
            identity,
            container,
            Node {
                kind: NodeKind::Namespace,
                namespace: Some(path.to_string()),
                name: path.to_string(),
                marker: None,
                members: BTreeMap::new(),
                unreadable: None,
            },
        )
    }

    /// Add a type declared in `namespace` (nested types use dotted names)
    pub fn add_type(&mut self, namespace: &str, qualified_name: &str) -> NodeId {
        self.add_entity(NodeKind::Type, namespace, qualified_name)
    }

    /// Add a callable declared in `namespace` (methods use `Type.method`)
    pub fn add_callable(&mut self, namespace: &str, qualified_name: &str) -> NodeId {
        self.add_entity(NodeKind::Callable, namespace, qualified_name)
    }

    /// Add a plain value (constant, instance) declared in `namespace`
    pub fn add_value(&mut self, namespace: &str, name: &str) -> NodeId {
        self.add_entity(NodeKind::Opaque, namespace, name)
    }

    /// Add a node with no owning namespace, reachable only as an explicit member
    pub fn add_synthetic(&mut self, kind: NodeKind, name: &str) -> NodeId {
        self.push(Node {
            kind,
            namespace: None,
            name: name.to_string(),
            marker: None,
            members: BTreeMap::new(),
            unreadable: None,
        })
    }

    fn add_entity(&mut self, kind: NodeKind, namespace: &str, qualified_name: &str) -> NodeId {
        let identity = Identity::entity(namespace, qualified_name);
        if let Some(&id) = self.by_identity.get(&identity) {
            return id;
        }

        let container = match qualified_name.rsplit_once('.') {
            Some((outer, attr)) => (Identity::entity(namespace, outer), attr.to_string()),
            None => (
                Identity::Namespace(namespace.to_string()),
                qualified_name.to_string(),
            ),
        };

        self.insert_declared(
            identity,
            Some(container),
            Node {
                kind,
                namespace: Some(namespace.to_string()),
                name: qualified_name.to_string(),
                marker: None,
                members: BTreeMap::new(),
                unreadable: None,
            },
        )
    }

    fn insert_declared(
        &mut self,
        identity: Identity,
        container: Option<(Identity, String)>,
        node: Node,
    ) -> NodeId {
        let id = self.push(node);
        self.by_identity.insert(identity, id);
        if let Some((container, attr)) = container {
            self.declared.entry(container).or_default().insert(attr, id);
        }
        id
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Attach a raw API marker value
    pub fn set_marker(&mut self, id: NodeId, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.marker = Some(value.into());
        }
    }

    /// Make the node fail introspection
    pub fn set_unreadable(&mut self, id: NodeId, reason: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.unreadable = Some(reason.into());
        }
    }

    /// Expose `target` as attribute `name` of `parent` (import / re-export)
    pub fn add_member(&mut self, parent: NodeId, name: impl Into<String>, target: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.members.insert(name.into(), MemberRef::Node(target));
        }
    }

    /// Attribute of `parent` that cannot be resolved
    pub fn add_broken_member(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) {
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.members.insert(name.into(), MemberRef::Broken(reason.into()));
        }
    }

    /// Find a namespace by path
    pub fn namespace(&self, path: &str) -> Option<NodeId> {
        self.by_identity
            .get(&Identity::Namespace(path.to_string()))
            .copied()
    }

    /// Find an entity by defining namespace and qualified name
    pub fn entity(&self, namespace: &str, qualified_name: &str) -> Option<NodeId> {
        self.by_identity
            .get(&Identity::entity(namespace, qualified_name))
            .copied()
    }

    fn node(&self, id: NodeId) -> Result<&Node, String> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| format!("dangling node id {}", id.0))
    }

    fn readable(&self, id: NodeId) -> Result<&Node, String> {
        let node = self.node(id)?;
        match &node.unreadable {
            Some(reason) => Err(reason.clone()),
            None => Ok(node),
        }
    }

    fn identity(&self, node: &Node) -> Option<Identity> {
        let namespace = node.namespace.clone()?;
        Some(match node.kind {
            NodeKind::Namespace => Identity::Namespace(namespace),
            _ => Identity::Entity {
                namespace,
                qualified_name: node.name.clone(),
            },
        })
    }
}

impl ObjectGraph for ModuleGraph {
    type Handle = NodeId;

    fn kind(&self, handle: NodeId) -> Result<NodeKind, String> {
        Ok(self.readable(handle)?.kind)
    }

    fn qualified_name(&self, handle: NodeId) -> Result<String, String> {
        Ok(self.readable(handle)?.name.clone())
    }

    fn owner_path(&self, handle: NodeId) -> Option<String> {
        self.nodes.get(handle.0)?.namespace.clone()
    }

    fn members(&self, handle: NodeId) -> Result<Vec<Member<NodeId>>, String> {
        let node = self.readable(handle)?;

        let mut merged: BTreeMap<&str, MemberRef> = BTreeMap::new();
        if let Some(declared) = self.identity(node).and_then(|id| self.declared.get(&id)) {
            for (name, &id) in declared {
                merged.insert(name, MemberRef::Node(id));
            }
        }
        // Explicit attributes shadow declarations of the same name
        for (name, member) in &node.members {
            merged.insert(name, member.clone());
        }

        Ok(merged
            .into_iter()
            .map(|(name, member)| match member {
                MemberRef::Node(id) => Member::resolved(name, id),
                MemberRef::Broken(reason) => Member::broken(name, reason),
            })
            .collect())
    }

    fn marker(&self, handle: NodeId) -> Option<String> {
        self.nodes.get(handle.0)?.marker.clone()
    }
}

impl NamespaceLoader for ModuleGraph {
    fn load_namespace(&self, path: &str) -> Option<NodeId> {
        self.namespace(path)
    }
}
