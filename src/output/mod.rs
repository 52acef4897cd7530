// Output rendering for API inventories

pub mod markdown;

pub use markdown::MarkdownGenerator;

use crate::config::OutputFormat;
use crate::crawl::ApiInventory;
use crate::error::Result;
use std::path::Path;

/// Render `inventory` in the requested format
pub fn render(inventory: &ApiInventory, format: OutputFormat, root: &str) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(inventory)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(inventory)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Markdown => Ok(MarkdownGenerator::new(root).generate(inventory)),
    }
}

/// One tab-separated line per record: annotation, kind, name
pub fn render_text(inventory: &ApiInventory) -> String {
    inventory
        .records()
        .iter()
        .map(|r| format!("{}\t{}\t{}\n", r.annotation_type, r.code_kind, r.name))
        .collect()
}

/// Write rendered output to a file, creating parent directories
pub fn write_to(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
