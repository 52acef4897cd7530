// Graph manifests
//
// A manifest describes a module graph in TOML or JSON: namespaces, the
// entities declared in them, and explicit member attributes (imports and
// re-exports). Member references are either a namespace path (`pkg.sub`) or
// an entity reference `namespace:qualified_name` (`pkg.sub:Widget.build`).
// A synthetic entity with no namespace is referenced as `:name`.

use crate::crawl::graph::{ModuleGraph, NodeId};
use crate::crawl::introspect::NodeKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Top-level manifest document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub namespaces: Vec<NamespaceSpec>,
    pub entities: Vec<EntitySpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceSpec {
    pub path: String,
    /// Attribute name -> reference
    #[serde(default)]
    pub members: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    /// Defining namespace; omitted for synthetic/builtin entities
    #[serde(default)]
    pub namespace: Option<String>,
    /// Qualified name within the namespace
    pub name: String,
    pub kind: EntityKind,
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub members: BTreeMap<String, String>,
    /// Introspection of this entity fails with the given reason
    #[serde(default)]
    pub unreadable: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Type,
    Callable,
    Value,
}

impl From<EntityKind> for NodeKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Type => NodeKind::Type,
            EntityKind::Callable => NodeKind::Callable,
            EntityKind::Value => NodeKind::Opaque,
        }
    }
}

impl Manifest {
    /// Load a manifest, choosing the format by file extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(Error::UnsupportedManifest(path.to_path_buf())),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Build the described graph. Unresolvable member references become
    /// broken members rather than errors.
    pub fn into_graph(self) -> ModuleGraph {
        let mut graph = ModuleGraph::new();
        let mut synthetic: BTreeMap<String, NodeId> = BTreeMap::new();

        let namespaces: Vec<(NodeId, BTreeMap<String, String>)> = self
            .namespaces
            .into_iter()
            .map(|ns| (graph.add_namespace(&ns.path), ns.members))
            .collect();

        let mut entities = Vec::with_capacity(self.entities.len());
        for entity in self.entities {
            let id = match &entity.namespace {
                Some(namespace) => match entity.kind {
                    EntityKind::Type => graph.add_type(namespace, &entity.name),
                    EntityKind::Callable => graph.add_callable(namespace, &entity.name),
                    EntityKind::Value => graph.add_value(namespace, &entity.name),
                },
                None => {
                    let id = graph.add_synthetic(entity.kind.into(), &entity.name);
                    synthetic.insert(entity.name.clone(), id);
                    id
                }
            };
            if let Some(marker) = entity.marker {
                graph.set_marker(id, marker);
            }
            if let Some(reason) = entity.unreadable {
                graph.set_unreadable(id, reason);
            }
            entities.push((id, entity.members));
        }

        for (parent, members) in namespaces.into_iter().chain(entities) {
            for (name, reference) in members {
                match resolve_reference(&graph, &synthetic, &reference) {
                    Some(target) => graph.add_member(parent, name, target),
                    None => {
                        debug!(%name, %reference, "unresolved member reference");
                        graph.add_broken_member(
                            parent,
                            name,
                            format!("unresolved reference '{}'", reference),
                        );
                    }
                }
            }
        }

        graph
    }
}

fn resolve_reference(
    graph: &ModuleGraph,
    synthetic: &BTreeMap<String, NodeId>,
    reference: &str,
) -> Option<NodeId> {
    match reference.split_once(':') {
        Some(("", name)) => synthetic.get(name).copied(),
        Some((namespace, name)) => graph.entity(namespace, name),
        None => graph.namespace(reference),
    }
}

/// Load a manifest file straight into a graph
pub fn load_graph(path: &Path) -> Result<ModuleGraph> {
    Ok(Manifest::load(path)?.into_graph())
}
