// Re-export alias resolution
//
// A root namespace often re-exposes symbols defined deep inside it
// (`pkg.Widget` for `pkg.internal.Widget`). Those are documented under the
// short name. Only the root's direct members count as re-exports.

use crate::crawl::introspect::{identity_of, Identity, MemberTarget, NodeKind, ObjectGraph};
use std::collections::HashMap;
use tracing::debug;

/// Canonical dotted name -> display name, for one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the direct type and callable members of `root`
    pub fn build<G: ObjectGraph + ?Sized>(graph: &G, root: G::Handle, root_path: &str) -> Self {
        let mut table = Self::new();

        let members = match graph.members(root) {
            Ok(members) => members,
            Err(reason) => {
                debug!(root = root_path, %reason, "cannot list root members for aliases");
                return table;
            }
        };

        for member in members {
            let MemberTarget::Resolved(handle) = member.target else {
                continue;
            };
            let kind = match graph.kind(handle) {
                Ok(kind @ (NodeKind::Type | NodeKind::Callable)) => kind,
                _ => continue,
            };
            match identity_of(graph, handle, kind) {
                Ok(Some(Identity::Entity {
                    namespace,
                    qualified_name,
                })) => {
                    let alias = format!("{}.{}", root_path, qualified_name);
                    table.insert(format!("{}.{}", namespace, qualified_name), alias);
                }
                Ok(_) => {}
                Err(reason) => {
                    debug!(member = %member.name, %reason, "skipping unreadable root member");
                }
            }
        }

        table
    }

    pub fn insert(&mut self, canonical: impl Into<String>, alias: impl Into<String>) {
        self.aliases.insert(canonical.into(), alias.into());
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Alias recorded for a canonical dotted name
    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.aliases.get(canonical).map(String::as_str)
    }

    /// Alias for an entity, either direct or through an aliased namespace
    pub fn resolve(&self, identity: &Identity) -> Option<String> {
        if let Some(alias) = self.get(&identity.dotted()) {
            return Some(alias.to_string());
        }
        match identity {
            Identity::Entity {
                namespace,
                qualified_name,
            } => self
                .get(namespace)
                .map(|alias| format!("{}.{}", alias, qualified_name)),
            Identity::Namespace(_) => None,
        }
    }

    /// Name to display for an entity: its alias, or the canonical path
    pub fn display_name(&self, identity: &Identity) -> String {
        self.resolve(identity).unwrap_or_else(|| identity.dotted())
    }
}
