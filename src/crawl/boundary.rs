// Crawl domain boundary
//
// A node belongs to the crawl domain when its owning namespace is the root or
// one of the root's descendants. Anything else (third-party or builtin code
// that happens to be reachable through an import) is pruned.

/// Decides which namespaces are inside the crawl domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryPolicy {
    root: String,
}

impl BoundaryPolicy {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn contains(&self, ns_path: &str) -> bool {
        is_in_domain(ns_path, &self.root)
    }
}

/// True iff `ns_path` is `root_path` or a dotted descendant of it
pub fn is_in_domain(ns_path: &str, root_path: &str) -> bool {
    match ns_path.strip_prefix(root_path) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}
