//! CLI argument parsing

use crate::crawl::AnnotationType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inventory the annotated API surface of a namespace graph
#[derive(Parser, Debug)]
#[command(name = "apiwalk")]
#[command(about = "Inventory the annotated API surface of a namespace graph")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl a graph manifest and list its annotated APIs
    Crawl {
        /// Graph manifest (.toml or .json)
        manifest: PathBuf,

        /// Root namespace to crawl
        #[arg(short, long)]
        root: Option<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text, json, markdown)
        #[arg(long)]
        format: Option<String>,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Annotation categories to keep (can be repeated)
        #[arg(long)]
        annotation: Vec<AnnotationType>,

        /// Keep only public, non-private APIs
        #[arg(long)]
        public_only: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}
