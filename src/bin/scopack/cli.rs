//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use scopack::util::shell::ColorChoice;

/// scopack - Build SCORM manifests from S1000D packages
#[derive(Parser)]
#[command(name = "scopack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for status messages
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build imsmanifest.xml from an SCPM and its resource package
    Convert(ConvertArgs),

    /// Resolve the dependencies of an existing manifest
    Resolve(ResolveArgs),

    /// List the URN of every file in a resource package
    Map(MapArgs),

    /// Display the dependency tree of a manifest
    Tree(TreeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// SCORM content package module (SCPM) describing the course
    #[arg(long, value_name = "FILE")]
    pub scpm: PathBuf,

    /// Resource package directory
    #[arg(long, value_name = "DIR")]
    pub package: PathBuf,

    /// Manifest to write
    #[arg(short, long, value_name = "FILE", default_value = "imsmanifest.xml")]
    pub output: PathBuf,

    /// Also write the URN resource map
    #[arg(long, value_name = "FILE")]
    pub urn_map: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Manifest to resolve
    pub manifest: PathBuf,

    /// Resource package directory
    #[arg(long, value_name = "DIR")]
    pub package: PathBuf,

    /// Where to write the result (defaults to MANIFEST)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct MapArgs {
    /// Resource package directory
    pub package: PathBuf,

    /// Print the map as JSON instead of XML
    #[arg(long)]
    pub json: bool,

    /// Write the map to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Manifest to display
    pub manifest: PathBuf,

    /// Only show this SCO
    #[arg(long, value_name = "ID")]
    pub sco: Option<String>,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Show the resources that depend on each resource instead
    #[arg(short, long)]
    pub invert: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,

    /// Write the script to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
