//! CLI module for apiwalk

mod args;

pub use args::{Args, Command};

use crate::config::{Config, OutputFormat};
use crate::crawl::{load_graph, Crawler};
use crate::error::{Error, Result};
use crate::output;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Anomalies listed on stderr before summarizing the rest
const SHOWN_ANOMALIES: usize = 5;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries only the inventory
fn init_logging(verbose: bool) {
    let default = if verbose { "apiwalk=debug" } else { "apiwalk=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Crawl {
            manifest,
            root,
            config,
            format,
            output,
            annotation,
            public_only,
            verbose,
        } => {
            init_logging(verbose);

            // Load config file if it exists
            let mut cfg = match &config {
                Some(config_path) => Config::load(config_path)?,
                None => Config::load_or_default(Path::new("apiwalk.toml"))?,
            };

            let format = match format {
                Some(name) => Some(
                    OutputFormat::parse(&name)
                        .ok_or_else(|| Error::other(format!("Unknown format: {}", name)))?,
                ),
                None => None,
            };

            // Merge CLI arguments (CLI takes precedence)
            cfg.merge_cli(root, annotation, public_only, format, output);
            cfg.validate()?;
            let root = cfg.root()?;

            let graph = load_graph(&manifest)?;
            let report = Crawler::new(&graph).crawl(root)?;

            if !report.anomalies.is_empty() {
                eprintln!("Skipped {} problem member(s):", report.anomalies.len());
                for anomaly in report.anomalies.iter().take(SHOWN_ANOMALIES) {
                    eprintln!("  {}", anomaly);
                }
                if report.anomalies.len() > SHOWN_ANOMALIES {
                    eprintln!("  ... and {} more", report.anomalies.len() - SHOWN_ANOMALIES);
                }
            }

            let mut inventory = report.inventory();
            inventory.retain_annotations(&cfg.crawl.annotations);
            if cfg.crawl.public_only {
                inventory.retain_public();
            }

            let rendered = output::render(&inventory, cfg.output.format, root)?;
            match &cfg.output.path {
                Some(path) => {
                    output::write_to(path, &rendered)?;
                    eprintln!("{} APIs written to: {}", inventory.len(), path.display());
                }
                None => print!("{}", rendered),
            }

            Ok(())
        }

        Command::Version => {
            println!("apiwalk {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
