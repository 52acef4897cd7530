// Depth-first API crawler
//
// Walks everything reachable from a root namespace, staying inside the root's
// domain, and collects annotated types and callables. Each node is visited at
// most once, keyed by canonical identity, so import cycles and re-exports
// terminate.

use crate::crawl::alias::AliasTable;
use crate::crawl::annotation;
use crate::crawl::api::{ApiInventory, ApiRecord, CodeKind};
use crate::crawl::boundary::BoundaryPolicy;
use crate::crawl::introspect::{
    identity_of, Identity, Member, MemberTarget, NamespaceLoader, NodeKind, ObjectGraph,
};
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Category of a recovered crawl problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnomalyKind {
    /// Member or node could not be introspected; skipped
    Introspection,
    /// Marker value outside the known categories; treated as unmarked
    MarkerDecode,
}

/// A non-fatal problem met during a crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// Member path or identity where it happened
    pub location: String,
    pub reason: String,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.reason)
    }
}

/// Everything a crawl produced
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Root namespace path
    pub root: String,
    /// Annotated APIs in visitation order
    pub apis: Vec<ApiRecord>,
    /// Identities visited, in order (including pruned out-of-domain nodes)
    pub visited: Vec<Identity>,
    pub anomalies: Vec<Anomaly>,
}

impl CrawlReport {
    pub fn inventory(&self) -> ApiInventory {
        ApiInventory::new(self.apis.clone())
    }

    /// Number of times `identity` was visited
    pub fn visit_count(&self, identity: &Identity) -> usize {
        self.visited.iter().filter(|v| *v == identity).count()
    }
}

/// Collects the annotated API surface of a namespace graph
pub struct Crawler<'g, G: ObjectGraph + ?Sized> {
    graph: &'g G,
}

impl<'g, G: ObjectGraph + ?Sized> Crawler<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Annotated APIs reachable from `root`
    pub fn walk(&self, root: G::Handle) -> Result<Vec<ApiRecord>> {
        Ok(self.walk_with_report(root)?.apis)
    }

    /// Crawl `root` and keep the visit log and anomalies
    pub fn walk_with_report(&self, root: G::Handle) -> Result<CrawlReport> {
        let root_path = self.root_path(root)?;
        info!(root = %root_path, "crawling namespace");

        let mut walk = Walk {
            graph: self.graph,
            boundary: BoundaryPolicy::new(root_path.clone()),
            aliases: AliasTable::build(self.graph, root, &root_path),
            seen: HashSet::new(),
            failed: HashSet::new(),
            report: CrawlReport {
                root: root_path.clone(),
                ..Default::default()
            },
        };
        debug!(aliases = walk.aliases.len(), "built alias table");

        walk.run(root, &root_path);

        let report = walk.report;
        info!(
            root = %report.root,
            apis = report.apis.len(),
            visited = report.visited.len(),
            anomalies = report.anomalies.len(),
            "crawl complete"
        );
        Ok(report)
    }

    /// The root must be a readable namespace with a path
    fn root_path(&self, root: G::Handle) -> Result<String> {
        let described = || format!("{:?}", root);
        match self.graph.kind(root) {
            Ok(NodeKind::Namespace) => {}
            Ok(_) => {
                let name = self.graph.qualified_name(root).unwrap_or_else(|_| described());
                return Err(Error::NotANamespace(name));
            }
            Err(reason) => {
                return Err(Error::other(format!(
                    "cannot introspect root namespace {}: {}",
                    described(),
                    reason
                )))
            }
        }
        self.graph
            .owner_path(root)
            .ok_or_else(|| Error::namespace_not_found(described()))
    }
}

impl<'g, G: NamespaceLoader + ?Sized> Crawler<'g, G> {
    /// Resolve `root_path` through the graph's loader, then crawl it
    pub fn crawl(&self, root_path: &str) -> Result<CrawlReport> {
        let root = self
            .graph
            .load_namespace(root_path)
            .ok_or_else(|| Error::namespace_not_found(root_path))?;
        self.walk_with_report(root)
    }
}

/// State of a single crawl
struct Walk<'g, G: ObjectGraph + ?Sized> {
    graph: &'g G,
    boundary: BoundaryPolicy,
    aliases: AliasTable,
    seen: HashSet<Identity>,
    /// Handles whose introspection already failed and was reported
    failed: HashSet<G::Handle>,
    report: CrawlReport,
}

/// A node being descended: its sorted members and how far we got
struct Frame<H> {
    identity: Identity,
    members: std::vec::IntoIter<Member<H>>,
}

impl<G: ObjectGraph + ?Sized> Walk<'_, G> {
    /// Depth-first traversal on an explicit stack; depth is bounded by memory,
    /// not by the thread stack
    fn run(&mut self, root: G::Handle, root_path: &str) {
        let mut stack: Vec<Frame<G::Handle>> = Vec::new();
        if let Some(identity) = self.enter(root, root_path) {
            self.push_frame(&mut stack, root, identity);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(member) = frame.members.next() else {
                stack.pop();
                continue;
            };
            let location = format!("{}.{}", frame.identity, member.name);
            match member.target {
                MemberTarget::Resolved(child) => {
                    if let Some(identity) = self.enter(child, &location) {
                        self.push_frame(&mut stack, child, identity);
                    }
                }
                MemberTarget::Broken(reason) => {
                    self.anomaly(AnomalyKind::Introspection, &location, reason)
                }
            }
        }
    }

    /// Visit a node. Returns its identity when its members should be walked.
    fn enter(&mut self, handle: G::Handle, location: &str) -> Option<Identity> {
        if self.failed.contains(&handle) {
            return None;
        }
        let kind = match self.graph.kind(handle) {
            Ok(kind) => kind,
            Err(reason) => return self.introspection_failed(handle, location, reason),
        };
        if kind == NodeKind::Opaque {
            return None;
        }

        let identity = match identity_of(self.graph, handle, kind) {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                trace!(member = location, "no owning namespace, skipping");
                return None;
            }
            Err(reason) => return self.introspection_failed(handle, location, reason),
        };

        if !self.seen.insert(identity.clone()) {
            return None;
        }
        self.report.visited.push(identity.clone());

        if !self.boundary.contains(identity.namespace()) {
            debug!(node = %identity, root = self.boundary.root(), "outside crawl domain");
            return None;
        }

        match kind {
            NodeKind::Namespace => Some(identity),
            NodeKind::Type => {
                self.collect(handle, &identity, CodeKind::Type);
                Some(identity)
            }
            NodeKind::Callable => {
                self.collect(handle, &identity, CodeKind::Callable);
                None
            }
            NodeKind::Opaque => None,
        }
    }

    fn push_frame(
        &mut self,
        stack: &mut Vec<Frame<G::Handle>>,
        handle: G::Handle,
        identity: Identity,
    ) {
        let mut members = match self.graph.members(handle) {
            Ok(members) => members,
            Err(reason) => {
                return self.anomaly(AnomalyKind::Introspection, &identity.dotted(), reason)
            }
        };
        members.sort_by(|a, b| a.name.cmp(&b.name));
        stack.push(Frame {
            identity,
            members: members.into_iter(),
        });
    }

    fn introspection_failed(
        &mut self,
        handle: G::Handle,
        location: &str,
        reason: String,
    ) -> Option<Identity> {
        self.failed.insert(handle);
        self.anomaly(AnomalyKind::Introspection, location, reason);
        None
    }

    fn collect(&mut self, handle: G::Handle, identity: &Identity, code_kind: CodeKind) {
        match annotation::detect(self.graph, handle) {
            Ok(Some(annotation_type)) => {
                let name = self.aliases.display_name(identity);
                trace!(%name, %annotation_type, "collected api");
                self.report
                    .apis
                    .push(ApiRecord::new(name, annotation_type, code_kind));
            }
            Ok(None) => {}
            Err(err) => {
                self.anomaly(AnomalyKind::MarkerDecode, &identity.dotted(), err.to_string())
            }
        }
    }

    fn anomaly(&mut self, kind: AnomalyKind, location: &str, reason: String) {
        warn!(location, %reason, ?kind, "crawl anomaly, continuing");
        self.report.anomalies.push(Anomaly {
            kind,
            location: location.to_string(),
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::api::AnnotationType;
    use crate::crawl::graph::{ModuleGraph, NodeId};

    fn record(name: &str, annotation: AnnotationType, kind: CodeKind) -> ApiRecord {
        ApiRecord::new(name, annotation, kind)
    }

    /// pkg.internal.Widget (PublicAPI) re-exported as pkg.Widget and
    /// pkg.helpers.util (Deprecated)
    fn widget_graph() -> ModuleGraph {
        let mut graph = ModuleGraph::new();
        let root = graph.add_namespace("pkg");
        graph.add_namespace("pkg.internal");
        graph.add_namespace("pkg.helpers");
        let widget = graph.add_type("pkg.internal", "Widget");
        graph.set_marker(widget, "PublicAPI");
        graph.add_member(root, "Widget", widget);
        let util = graph.add_callable("pkg.helpers", "util");
        graph.set_marker(util, "Deprecated");
        graph
    }

    #[test]
    fn test_widget_scenario() {
        let graph = widget_graph();
        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert_eq!(
            report.apis,
            vec![
                record("pkg.Widget", AnnotationType::PublicApi, CodeKind::Type),
                record("pkg.helpers.util", AnnotationType::Deprecated, CodeKind::Callable),
            ]
        );
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_walk_returns_records() {
        let graph = widget_graph();
        let root = graph.namespace("pkg").unwrap();
        let apis = Crawler::new(&graph).walk(root).unwrap();
        assert_eq!(apis.len(), 2);
    }

    #[test]
    fn test_cycle_terminates_and_visits_once() {
        let mut graph = ModuleGraph::new();
        let a = graph.add_namespace("pkg");
        let b = graph.add_namespace("pkg.b");
        graph.add_member(b, "parent", a);
        graph.add_member(a, "again", b);

        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert_eq!(report.visit_count(&Identity::Namespace("pkg".into())), 1);
        assert_eq!(report.visit_count(&Identity::Namespace("pkg.b".into())), 1);
        assert_eq!(report.visited.len(), 2);
    }

    #[test]
    fn test_self_referencing_type_terminates() {
        let mut graph = ModuleGraph::new();
        graph.add_namespace("pkg");
        let node = graph.add_type("pkg", "Node");
        graph.add_member(node, "parent", node);
        graph.set_marker(node, "PublicAPI");

        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert_eq!(report.apis.len(), 1);
    }

    #[test]
    fn test_external_namespace_is_pruned() {
        let mut graph = ModuleGraph::new();
        let root = graph.add_namespace("pkg");
        let ext = graph.add_namespace("otherlib");
        let thing = graph.add_type("otherlib", "Thing");
        graph.set_marker(thing, "PublicAPI");
        graph.add_member(root, "otherlib", ext);

        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert!(report.apis.is_empty());
        assert_eq!(report.visit_count(&Identity::Namespace("otherlib".into())), 1);
        assert_eq!(report.visit_count(&Identity::entity("otherlib", "Thing")), 0);
    }

    #[test]
    fn test_reexported_external_entity_is_excluded() {
        let mut graph = ModuleGraph::new();
        let root = graph.add_namespace("pkg");
        let thing = graph.add_callable("otherlib", "helper");
        graph.set_marker(thing, "PublicAPI");
        graph.add_member(root, "helper", thing);

        let apis = Crawler::new(&graph).crawl("pkg").unwrap().apis;
        assert!(apis.is_empty());
    }

    #[test]
    fn test_prefix_sibling_is_outside_domain() {
        let mut graph = ModuleGraph::new();
        let root = graph.add_namespace("pkg");
        let sibling = graph.add_namespace("pkgextra");
        let f = graph.add_callable("pkgextra", "f");
        graph.set_marker(f, "PublicAPI");
        graph.add_member(root, "pkgextra", sibling);

        assert!(Crawler::new(&graph).crawl("pkg").unwrap().apis.is_empty());
    }

    #[test]
    fn test_dedup_by_identity() {
        let mut graph = ModuleGraph::new();
        let root = graph.add_namespace("pkg");
        let a = graph.add_namespace("pkg.a");
        graph.add_namespace("pkg.b");
        let run = graph.add_callable("pkg.b", "run");
        graph.set_marker(run, "DeveloperAPI");
        graph.add_member(a, "run", run);
        graph.add_member(root, "also_run", run);

        let apis = Crawler::new(&graph).crawl("pkg").unwrap().apis;
        assert_eq!(apis, vec![record("pkg.run", AnnotationType::DeveloperApi, CodeKind::Callable)]);
    }

    #[test]
    fn test_unmarked_entities_excluded() {
        let mut graph = ModuleGraph::new();
        graph.add_namespace("pkg");
        graph.add_type("pkg", "Plain");
        graph.add_callable("pkg", "plain");
        assert!(Crawler::new(&graph).crawl("pkg").unwrap().apis.is_empty());
    }

    #[test]
    fn test_marked_type_members_are_collected() {
        let mut graph = ModuleGraph::new();
        graph.add_namespace("pkg");
        graph.add_namespace("pkg.core");
        let client = graph.add_type("pkg.core", "Client");
        graph.set_marker(client, "PublicAPI");
        let connect = graph.add_callable("pkg.core", "Client.connect");
        graph.set_marker(connect, "DeveloperAPI");
        let options = graph.add_type("pkg.core", "Client.Options");
        graph.set_marker(options, "PublicAPI");

        let apis = Crawler::new(&graph).crawl("pkg").unwrap().apis;
        assert_eq!(
            apis,
            vec![
                record("pkg.core.Client", AnnotationType::PublicApi, CodeKind::Type),
                record("pkg.core.Client.Options", AnnotationType::PublicApi, CodeKind::Type),
                record(
                    "pkg.core.Client.connect",
                    AnnotationType::DeveloperApi,
                    CodeKind::Callable,
                ),
            ]
        );
    }

    #[test]
    fn test_members_visited_in_name_order() {
        let mut graph = ModuleGraph::new();
        let root = graph.add_namespace("pkg");
        for name in ["zeta", "alpha", "mid"] {
            let f = graph.add_callable("pkg", name);
            graph.set_marker(f, "PublicAPI");
        }
        let mid = graph.entity("pkg", "mid").unwrap();
        graph.add_member(root, "Beta", mid);

        let apis = Crawler::new(&graph).crawl("pkg").unwrap().apis;
        let names: Vec<_> = apis.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["pkg.mid", "pkg.alpha", "pkg.zeta"]);
    }

    #[test]
    fn test_broken_member_is_skipped() {
        let mut graph = ModuleGraph::new();
        let root = graph.add_namespace("pkg");
        graph.add_broken_member(root, "aaa", "import failed");
        let f = graph.add_callable("pkg", "zzz");
        graph.set_marker(f, "PublicAPI");

        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert_eq!(report.apis.len(), 1);
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies[0].kind, AnomalyKind::Introspection);
        assert_eq!(report.anomalies[0].location, "pkg.aaa");
    }

    #[test]
    fn test_unreadable_node_is_skipped() {
        let mut graph = ModuleGraph::new();
        graph.add_namespace("pkg");
        let bad = graph.add_type("pkg", "Bad");
        graph.set_marker(bad, "PublicAPI");
        graph.set_unreadable(bad, "attribute access raised");
        let good = graph.add_type("pkg", "Good");
        graph.set_marker(good, "PublicAPI");

        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert_eq!(
            report.apis,
            vec![record("pkg.Good", AnnotationType::PublicApi, CodeKind::Type)]
        );
        assert_eq!(report.anomalies[0].location, "pkg.Bad");
    }

    #[test]
    fn test_unknown_marker_treated_as_unmarked() {
        let mut graph = ModuleGraph::new();
        graph.add_namespace("pkg");
        let f = graph.add_callable("pkg", "f");
        graph.set_marker(f, "Alpha");

        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert!(report.apis.is_empty());
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies[0].kind, AnomalyKind::MarkerDecode);
    }

    #[test]
    fn test_synthetic_members_are_ignored() {
        let mut graph = ModuleGraph::new();
        let root = graph.add_namespace("pkg");
        let builtin = graph.add_synthetic(NodeKind::Callable, "len");
        graph.set_marker(builtin, "PublicAPI");
        graph.add_member(root, "len", builtin);

        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert!(report.apis.is_empty());
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_missing_root_is_precondition_error() {
        let graph = ModuleGraph::new();
        let err = Crawler::new(&graph).crawl("nope").unwrap_err();
        assert!(matches!(err, Error::NamespaceNotFound(path) if path == "nope"));
    }

    #[test]
    fn test_non_namespace_root_rejected() {
        let mut graph = ModuleGraph::new();
        let f = graph.add_callable("pkg", "f");
        let err = Crawler::new(&graph).walk(f).unwrap_err();
        assert!(matches!(err, Error::NotANamespace(name) if name == "f"));
    }

    #[test]
    fn test_crawl_subpackage_root() {
        let graph = widget_graph();
        let apis = Crawler::new(&graph).crawl("pkg.internal").unwrap().apis;
        assert_eq!(
            apis,
            vec![record("pkg.internal.Widget", AnnotationType::PublicApi, CodeKind::Type)]
        );
    }

    /// Delegates to a `ModuleGraph` but lists members in reverse name order
    struct ReversedMembers(ModuleGraph);

    impl ObjectGraph for ReversedMembers {
        type Handle = NodeId;

        fn kind(&self, handle: NodeId) -> std::result::Result<NodeKind, String> {
            self.0.kind(handle)
        }

        fn qualified_name(&self, handle: NodeId) -> std::result::Result<String, String> {
            self.0.qualified_name(handle)
        }

        fn owner_path(&self, handle: NodeId) -> Option<String> {
            self.0.owner_path(handle)
        }

        fn members(&self, handle: NodeId) -> std::result::Result<Vec<Member<NodeId>>, String> {
            let mut members = self.0.members(handle)?;
            members.reverse();
            Ok(members)
        }

        fn marker(&self, handle: NodeId) -> Option<String> {
            self.0.marker(handle)
        }
    }

    #[test]
    fn test_members_sorted_regardless_of_graph_order() {
        let mut inner = ModuleGraph::new();
        let root = inner.add_namespace("pkg");
        for name in ["b", "C", "a", "_z"] {
            let f = inner.add_callable("pkg", name);
            inner.set_marker(f, "PublicAPI");
        }
        let graph = ReversedMembers(inner);

        let apis = Crawler::new(&graph).walk(root).unwrap();
        let names: Vec<_> = apis.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["pkg.C", "pkg._z", "pkg.a", "pkg.b"]);
    }

    #[test]
    fn test_long_reexport_chain_does_not_exhaust_stack() {
        const CHAIN: usize = 50_000;

        let mut graph = ModuleGraph::new();
        graph.add_namespace("pkg");
        let links: Vec<NodeId> = (0..CHAIN)
            .map(|i| graph.add_namespace(&format!("pkg.n{:05}", i)))
            .collect();
        for pair in links.windows(2) {
            graph.add_member(pair[0], "next", pair[1]);
        }
        let tail = graph.add_callable(&format!("pkg.n{:05}", CHAIN - 1), "end");
        graph.set_marker(tail, "PublicAPI");

        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert_eq!(
            report.apis,
            vec![record(
                &format!("pkg.n{:05}.end", CHAIN - 1),
                AnnotationType::PublicApi,
                CodeKind::Callable,
            )]
        );
        // pkg, every link, and the callable
        assert_eq!(report.visited.len(), CHAIN + 2);
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_type_recorded_before_its_members() {
        let mut graph = ModuleGraph::new();
        graph.add_namespace("pkg");
        let outer = graph.add_type("pkg", "Outer");
        graph.set_marker(outer, "PublicAPI");
        let inner = graph.add_type("pkg", "Outer.Inner");
        graph.set_marker(inner, "PublicAPI");
        let after = graph.add_callable("pkg", "zed");
        graph.set_marker(after, "PublicAPI");

        let apis = Crawler::new(&graph).crawl("pkg").unwrap().apis;
        let names: Vec<_> = apis.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["pkg.Outer", "pkg.Outer.Inner", "pkg.zed"]);
    }

    #[test]
    fn test_unreadable_node_reported_once() {
        let mut graph = ModuleGraph::new();
        let root = graph.add_namespace("pkg");
        let sub = graph.add_namespace("pkg.sub");
        let bad = graph.add_type("pkg.sub", "Bad");
        graph.set_unreadable(bad, "attribute access raised");
        graph.add_member(root, "Bad", bad);
        graph.add_member(sub, "again", bad);

        let report = Crawler::new(&graph).crawl("pkg").unwrap();
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies[0].location, "pkg.Bad");
    }
}
