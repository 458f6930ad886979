use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pathdoc",
    about = "Inspect and edit YAML/JSON documents by dotted path",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "yaml")]
    pub format: OutputFormat,

    /// Abort on the first value that cannot be converted
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the value at a path
    Get(GetArgs),
    /// Write a value at a path
    Set(SetArgs),
    /// Deep-merge overlay documents over a base document
    Merge(MergeArgs),
    /// Re-render a document in the output format
    Convert(ConvertArgs),
    /// List the keys of the mapping at a path
    Keys(KeysArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ValueKind {
    Raw,
    String,
    Bool,
    Float,
    Int,
}

#[derive(Args)]
pub struct GetArgs {
    pub file: PathBuf,
    #[arg(default_value = "")]
    pub path: String,
    /// Coerce the value to a scalar type
    #[arg(long = "as", value_enum, default_value = "raw")]
    pub kind: ValueKind,
    /// Printed instead of failing when the path is not set
    #[arg(long)]
    pub default: Option<String>,
}

#[derive(Args)]
pub struct SetArgs {
    pub file: PathBuf,
    pub path: String,
    /// Parsed as YAML, so `3`, `true` and `{a: 1}` keep their types
    pub value: String,
    /// Rewrite FILE instead of printing the result
    #[arg(short, long)]
    pub write: bool,
}

#[derive(Args)]
pub struct MergeArgs {
    pub base: PathBuf,
    #[arg(required = true)]
    pub overlays: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ConvertArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct KeysArgs {
    pub file: PathBuf,
    #[arg(default_value = "")]
    pub path: String,
}
