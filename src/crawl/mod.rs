// API crawling over introspectable namespace graphs

pub mod alias;
pub mod annotation;
pub mod api;
pub mod boundary;
pub mod graph;
pub mod introspect;
pub mod manifest;
pub mod walker;

pub use alias::AliasTable;
pub use annotation::{decode_marker, MarkerDecodeError};
pub use api::{AnnotationType, ApiInventory, ApiRecord, CodeKind, InventoryCounts};
pub use boundary::{is_in_domain, BoundaryPolicy};
pub use graph::{ModuleGraph, NodeId};
pub use introspect::{Identity, Member, MemberTarget, NamespaceLoader, NodeKind, ObjectGraph};
pub use manifest::{load_graph, Manifest};
pub use walker::{Anomaly, AnomalyKind, CrawlReport, Crawler};
