// Markdown rendering of an API inventory

use crate::crawl::{AnnotationType, ApiInventory};

/// Renders an inventory as a Markdown document
pub struct MarkdownGenerator {
    title: String,
    /// Emit the summary table
    summary: bool,
}

impl MarkdownGenerator {
    /// Create a new generator for the given root namespace
    pub fn new(root: &str) -> Self {
        Self {
            title: format!("API inventory: {}", root),
            summary: true,
        }
    }

    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    pub fn generate(&self, inventory: &ApiInventory) -> String {
        let mut md = String::new();
        md.push_str(&format!("# {}\n\n", self.title));

        if inventory.is_empty() {
            md.push_str("No annotated APIs found.\n");
            return md;
        }

        if self.summary {
            let counts = inventory.counts();
            md.push_str("| Category | Count |\n");
            md.push_str("|---|---|\n");
            for (annotation, count) in &counts.by_annotation {
                md.push_str(&format!("| {} | {} |\n", annotation, count));
            }
            md.push_str(&format!("| **Total** | {} |\n\n", counts.total));
        }

        for annotation in AnnotationType::ALL {
            let mut records = inventory.by_annotation(annotation).peekable();
            if records.peek().is_none() {
                continue;
            }
            md.push_str(&format!("## {}\n\n", annotation));
            for record in records {
                md.push_str(&format!("- `{}` ({})\n", record.name, record.code_kind));
            }
            md.push('\n');
        }

        md
    }
}
