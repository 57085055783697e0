//! Command-line inspector for the svgkit pipeline.
//!
//! Each subcommand runs the pipeline up to one stage and prints what that
//! stage produced.
//!
//! ## Usage
//!
//! ```bash
//! # Token stream of a document
//! svgkit-dump tokens icon.svg
//!
//! # Element tree
//! svgkit-dump tree icon.svg
//!
//! # Scene document as JSON, with lenient conversion settings
//! svgkit-dump --config lenient.json scene icon.svg --json
//!
//! # Compiled commands and flattened segments of path data
//! svgkit-dump path "M10 10 A5 5 0 0 1 20 10"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use svgkit_common::{init_logging, LogConfig};
use svgkit_path::{compile_path, resolve_path, PathBuilder};
use svgkit_scene::{parse_svg_with_config, SceneConfig, SceneDocument, SceneElement, SvgError};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "svgkit-dump")]
#[command(about = "Inspect each stage of the svgkit SVG pipeline")]
struct Cli {
    /// Scene conversion settings as a JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a document
    Tokens {
        /// SVG file
        file: PathBuf,
    },

    /// Print the parsed element tree
    Tree {
        /// SVG file
        file: PathBuf,
    },

    /// Convert a document to a scene
    Scene {
        /// SVG file
        file: PathBuf,
        /// Print the full scene as JSON instead of an outline
        #[arg(long)]
        json: bool,
    },

    /// Compile path data and flatten it into segments
    Path {
        /// Path data, as in a `d` attribute
        data: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Ignore the error: a subscriber may already be installed.
    let _ = init_logging(LogConfig::default().with_level(cli.log_level));

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SceneConfig::default(),
    };
    debug!(?config, "Loaded scene config");

    match cli.command {
        Commands::Tokens { file } => {
            let source = read_source(&file)?;
            let tokens = svgkit_markup::tokenize(&source).map_err(|e| staged(e.into()))?;
            let listing: Vec<_> = tokens
                .iter()
                .map(|t| {
                    json!({
                        "kind": format!("{:?}", t.kind),
                        "start": t.start,
                        "end": t.end,
                        "text": t.text(&source),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }

        Commands::Tree { file } => {
            let source = read_source(&file)?;
            let root = svgkit_markup::parse_document(&source, &config.parser_config())
                .map_err(|e| staged(e.into()))?;
            print!("{}", root);
        }

        Commands::Scene { file, json } => {
            let source = read_source(&file)?;
            let document = parse_svg_with_config(&source, &config).map_err(staged)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                print_outline(&document);
            }
        }

        Commands::Path { data } => {
            let commands = compile_path(&data).map_err(|e| staged(e.into()))?;
            let mut builder = PathBuilder::new();
            let end = resolve_path(&commands, &mut builder);
            let report = json!({
                "commands": commands,
                "segments": builder.segments(),
                "end": end,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_config(path: &Path) -> Result<SceneConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SceneConfig::from_json_str(&json)
        .with_context(|| format!("invalid config {}", path.display()))
}

/// Prefix a pipeline error with the stage that raised it.
fn staged(err: SvgError) -> anyhow::Error {
    anyhow::anyhow!("{} error: {}", err.category(), err)
}

fn print_outline(document: &SceneDocument) {
    let size = |v: Option<f32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    println!(
        "svg {}x{} ({} elements, {} definitions)",
        size(document.viewport_width()),
        size(document.viewport_height()),
        document.element_count(),
        document.definitions.len()
    );
    for definition in &document.definitions {
        println!("  def #{}", definition.id());
    }
    print_elements(&document.children, 1);
}

fn print_elements(elements: &[SceneElement], depth: usize) {
    let indent = "  ".repeat(depth);
    for element in elements {
        let id = element.id().map(|id| format!(" #{}", id)).unwrap_or_default();
        match element {
            SceneElement::Group(g) => {
                println!("{}g{} ({} children)", indent, id, g.children.len());
                print_elements(&g.children, depth + 1);
            }
            SceneElement::Path(p) => {
                println!("{}path{} ({} commands)", indent, id, p.commands.len())
            }
            SceneElement::Rect(r) => {
                println!("{}rect{} {}x{} at {},{}", indent, id, r.width, r.height, r.x, r.y)
            }
            SceneElement::Circle(c) => {
                println!("{}circle{} r={} at {},{}", indent, id, c.r, c.cx, c.cy)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "svgkit-dump",
            "scene",
            "icon.svg",
            "--json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Level::DEBUG);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Scene { json: true, .. }));
    }

    #[test]
    fn test_staged_error_names_category() {
        let err = compile_path("M 0 0 Q").unwrap_err();
        let message = staged(err.into()).to_string();
        assert!(message.starts_with("path error: "), "{}", message);
    }
}
