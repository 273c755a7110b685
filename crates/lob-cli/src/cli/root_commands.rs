use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Delete the working directory and everything beneath it.
    Reset,
    /// Create a fresh database with the relational schema, optionally seeded.
    Generate(GenerateArgs),
    /// Create, bootstrap and seed a database, then print the seeded tags.
    Seed,
    /// Check that a database answers a catalog query the same way across a reopen.
    Reopen(ReopenArgs),
    /// Rewrite a large blob repeatedly and sample the database file size.
    Growth(GrowthArgs),
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    /// Write the source/point/tag chain after creating the schema.
    #[arg(long)]
    pub seed: bool,

    /// Copy the finished database file here, for use as a reopen fixture.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ReopenArgs {
    /// Database file copied into place before the first open.
    #[arg(long, value_name = "PATH")]
    pub fixture: Option<PathBuf>,

    /// Catalog schema to look in (exact match).
    #[arg(long)]
    pub schema: Option<String>,

    /// Table name to count (exact match).
    #[arg(long)]
    pub table: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct GrowthArgs {
    /// Number of blob rewrites.
    #[arg(long, short = 'n')]
    pub iterations: Option<u32>,

    /// Sample the file size every K iterations.
    #[arg(long, value_name = "K", value_parser = clap::value_parser!(u32).range(1..))]
    pub sample_every: Option<u32>,

    /// Number of counters in the encoded map.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub entries: Option<u32>,

    /// Use the write-ahead log instead of the rollback journal.
    #[arg(long)]
    pub wal: bool,
}
