// API records produced by a crawl

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Annotation category carried by a public-API marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationType {
    #[serde(rename = "PublicAPI", alias = "PUBLIC_API")]
    PublicApi,
    #[serde(rename = "DeveloperAPI", alias = "DEVELOPER_API")]
    DeveloperApi,
    #[serde(rename = "Deprecated", alias = "DEPRECATED")]
    Deprecated,
}

impl AnnotationType {
    pub const ALL: [AnnotationType; 3] = [
        AnnotationType::PublicApi,
        AnnotationType::DeveloperApi,
        AnnotationType::Deprecated,
    ];

    /// Value stored in the marker attribute
    pub fn marker_value(&self) -> &'static str {
        match self {
            AnnotationType::PublicApi => "PublicAPI",
            AnnotationType::DeveloperApi => "DeveloperAPI",
            AnnotationType::Deprecated => "Deprecated",
        }
    }

    /// Enumeration constant name
    pub fn constant_name(&self) -> &'static str {
        match self {
            AnnotationType::PublicApi => "PUBLIC_API",
            AnnotationType::DeveloperApi => "DEVELOPER_API",
            AnnotationType::Deprecated => "DEPRECATED",
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker_value())
    }
}

impl FromStr for AnnotationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnnotationType::ALL
            .into_iter()
            .find(|a| a.marker_value() == s || a.constant_name() == s)
            .ok_or_else(|| format!("unknown annotation category '{}'", s))
    }
}

/// Kind of code object a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodeKind {
    Type,
    Callable,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::Type => f.write_str("Type"),
            CodeKind::Callable => f.write_str("Callable"),
        }
    }
}

/// One annotated API found during a crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRecord {
    /// Display name, alias-resolved
    pub name: String,
    pub annotation_type: AnnotationType,
    pub code_kind: CodeKind,
}

impl ApiRecord {
    pub fn new(
        name: impl Into<String>,
        annotation_type: AnnotationType,
        code_kind: CodeKind,
    ) -> Self {
        Self {
            name: name.into(),
            annotation_type,
            code_kind,
        }
    }

    /// Any dotted segment of the name starts with an underscore
    pub fn is_private_name(&self) -> bool {
        self.name.split('.').any(|segment| segment.starts_with('_'))
    }

    /// Marked as public API and not hidden behind a private name
    pub fn is_public(&self) -> bool {
        self.annotation_type == AnnotationType::PublicApi && !self.is_private_name()
    }

    pub fn is_deprecated(&self) -> bool {
        self.annotation_type == AnnotationType::Deprecated
    }
}

/// Per-category and per-kind totals of an inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryCounts {
    pub total: usize,
    pub by_annotation: BTreeMap<AnnotationType, usize>,
    pub by_kind: BTreeMap<CodeKind, usize>,
}

/// Ordered list of API records with query helpers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApiInventory {
    records: Vec<ApiRecord>,
}

impl ApiInventory {
    pub fn new(records: Vec<ApiRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ApiRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ApiRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one annotation category, in crawl order
    pub fn by_annotation(&self, annotation: AnnotationType) -> impl Iterator<Item = &ApiRecord> {
        self.records
            .iter()
            .filter(move |r| r.annotation_type == annotation)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    /// Keep only records whose category is in `annotations` (all when empty)
    pub fn retain_annotations(&mut self, annotations: &[AnnotationType]) {
        if annotations.is_empty() {
            return;
        }
        self.records.retain(|r| annotations.contains(&r.annotation_type));
    }

    pub fn retain_public(&mut self) {
        self.records.retain(ApiRecord::is_public);
    }

    pub fn counts(&self) -> InventoryCounts {
        let mut counts = InventoryCounts {
            total: self.records.len(),
            ..Default::default()
        };
        for record in &self.records {
            *counts.by_annotation.entry(record.annotation_type).or_default() += 1;
            *counts.by_kind.entry(record.code_kind).or_default() += 1;
        }
        counts
    }
}

impl From<Vec<ApiRecord>> for ApiInventory {
    fn from(records: Vec<ApiRecord>) -> Self {
        Self::new(records)
    }
}
