// Public-API marker detection

use crate::crawl::api::AnnotationType;
use crate::crawl::introspect::ObjectGraph;
use std::fmt;

/// Marker present but its value is not a known annotation category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDecodeError {
    pub value: String,
}

impl fmt::Display for MarkerDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized API marker value '{}'", self.value)
    }
}

impl std::error::Error for MarkerDecodeError {}

/// Map a raw marker value into the annotation enumeration
pub fn decode_marker(raw: &str) -> Result<AnnotationType, MarkerDecodeError> {
    raw.trim().parse().map_err(|_| MarkerDecodeError {
        value: raw.to_string(),
    })
}

/// Annotation category of `handle`, `Ok(None)` when it carries no marker
pub fn detect<G: ObjectGraph + ?Sized>(
    graph: &G,
    handle: G::Handle,
) -> Result<Option<AnnotationType>, MarkerDecodeError> {
    graph.marker(handle).as_deref().map(decode_marker).transpose()
}
