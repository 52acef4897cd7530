// Introspection capability over a namespace/type/callable graph
//
// Any object graph the crawler walks implements `ObjectGraph`. Handles are
// opaque to the crawler; all it can do is ask the graph about them.

use std::fmt;
use std::hash::Hash;

/// What a handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A named container of members (package/module)
    Namespace,
    /// A type declaration; may have nested members
    Type,
    /// A function or method
    Callable,
    /// Anything else reachable as a member (constants, values)
    Opaque,
}

/// Target of a member attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberTarget<H> {
    Resolved(H),
    /// Reference that could not be followed, with the reason
    Broken(String),
}

/// A direct member of a namespace or type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member<H> {
    /// Attribute name under which the member is exposed
    pub name: String,
    pub target: MemberTarget<H>,
}

impl<H> Member<H> {
    pub fn resolved(name: impl Into<String>, handle: H) -> Self {
        Self {
            name: name.into(),
            target: MemberTarget::Resolved(handle),
        }
    }

    pub fn broken(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: MemberTarget::Broken(reason.into()),
        }
    }
}

/// Read-only introspection of an object graph.
///
/// `Err(reason)` from any accessor is an introspection anomaly: the crawler
/// skips the affected node and keeps going.
pub trait ObjectGraph {
    type Handle: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self, handle: Self::Handle) -> Result<NodeKind, String>;

    /// Dotted path for namespaces, name within the defining namespace for entities
    fn qualified_name(&self, handle: Self::Handle) -> Result<String, String>;

    /// Path of the defining namespace (a namespace's own path). `None` for
    /// synthetic or built-in constructs.
    fn owner_path(&self, handle: Self::Handle) -> Option<String>;

    fn members(&self, handle: Self::Handle) -> Result<Vec<Member<Self::Handle>>, String>;

    /// Raw value of the API marker attribute, if present
    fn marker(&self, handle: Self::Handle) -> Option<String>;
}

/// Resolves a namespace by dotted path
pub trait NamespaceLoader: ObjectGraph {
    fn load_namespace(&self, path: &str) -> Option<Self::Handle>;
}

/// Canonical identity of a node, stable across re-export paths
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identity {
    Namespace(String),
    Entity {
        namespace: String,
        qualified_name: String,
    },
}

impl Identity {
    pub fn entity(namespace: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Identity::Entity {
            namespace: namespace.into(),
            qualified_name: qualified_name.into(),
        }
    }

    /// Path used for the domain check
    pub fn namespace(&self) -> &str {
        match self {
            Identity::Namespace(path) => path,
            Identity::Entity { namespace, .. } => namespace,
        }
    }

    /// Fully qualified dotted name
    pub fn dotted(&self) -> String {
        match self {
            Identity::Namespace(path) => path.clone(),
            Identity::Entity {
                namespace,
                qualified_name,
            } => format!("{}.{}", namespace, qualified_name),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// Identity of a handle given its kind.
///
/// `Ok(None)` when the node has no owning namespace; such nodes sit outside
/// every crawl domain.
pub fn identity_of<G: ObjectGraph + ?Sized>(
    graph: &G,
    handle: G::Handle,
    kind: NodeKind,
) -> Result<Option<Identity>, String> {
    let Some(owner) = graph.owner_path(handle) else {
        return Ok(None);
    };
    let identity = match kind {
        NodeKind::Namespace => Identity::Namespace(owner),
        _ => Identity::Entity {
            namespace: owner,
            qualified_name: graph.qualified_name(handle)?,
        },
    };
    Ok(Some(identity))
}
