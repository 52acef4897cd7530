use crate::crawl::AnnotationType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
}

/// Crawl settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Root namespace path
    pub root: Option<String>,
    /// Annotation categories to keep; empty keeps all
    pub annotations: Vec<AnnotationType>,
    /// Drop records that are not public (private names, non-PublicAPI)
    pub public_only: bool,
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Write here instead of stdout
    pub path: Option<PathBuf>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&contents).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        root: Option<String>,
        annotations: Vec<AnnotationType>,
        public_only: bool,
        format: Option<OutputFormat>,
        output: Option<PathBuf>,
    ) {
        if let Some(root) = root {
            self.crawl.root = Some(root);
        }

        if !annotations.is_empty() {
            self.crawl.annotations = annotations;
        }

        if public_only {
            self.crawl.public_only = true;
        }

        if let Some(fmt) = format {
            self.output.format = fmt;
        }

        if let Some(out) = output {
            self.output.path = Some(out);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.crawl.root {
            validate_namespace_path(root)?;
        }
        Ok(())
    }

    /// The configured root namespace
    pub fn root(&self) -> Result<&str> {
        self.crawl.root.as_deref().ok_or(Error::MissingRoot)
    }
}

fn validate_namespace_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(Error::config_validation("root namespace must not be empty"));
    }
    if path.split('.').any(|segment| segment.is_empty()) {
        return Err(Error::config_validation(format!(
            "root namespace '{}' has an empty segment",
            path
        )));
    }
    if path.chars().any(char::is_whitespace) {
        return Err(Error::config_validation(format!(
            "root namespace '{}' contains whitespace",
            path
        )));
    }
    Ok(())
}
