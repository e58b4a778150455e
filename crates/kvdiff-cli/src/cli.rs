use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kvdiff",
    about = "Compare two ordered key-value stores entry by entry",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two stores; exits 1 if they differ
    Diff(DiffArgs),
    /// Build a store from JSON lines of hex-encoded entries
    Import(ImportArgs),
    /// Print every entry of a store as JSON lines
    Dump(DumpArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Directory of store A
    #[arg(short = 'a', long = "store-a", value_name = "DIR")]
    pub store_a: PathBuf,
    /// Directory of store B
    #[arg(short = 'b', long = "store-b", value_name = "DIR")]
    pub store_b: PathBuf,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
    /// Skip best-effort decoding of values
    #[arg(long)]
    pub raw: bool,
    /// Colorize block headings
    #[arg(long)]
    pub color: bool,
    /// Show at most N bytes per hex dump
    #[arg(long, value_name = "N")]
    pub max_dump_bytes: Option<usize>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Store directory to create
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,
    /// JSON-lines input file, `-` for stdin
    #[arg(long, value_name = "FILE", default_value = "-")]
    pub input: String,
    /// Replace an existing table
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct DumpArgs {
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,
}
