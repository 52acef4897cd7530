//! Apiwalk - inventory the annotated API surface of a namespace graph
//!
//! Walks everything reachable from a root namespace, stays inside the root's
//! domain, and collects the types and callables that carry a public-API
//! marker, named by their re-exported alias where the root provides one.

pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod output;

// Re-export main types
pub use config::Config;
pub use crawl::{
    AnnotationType, ApiInventory, ApiRecord, CodeKind, CrawlReport, Crawler, ModuleGraph,
    NamespaceLoader, ObjectGraph,
};
pub use error::{Error, Result};
