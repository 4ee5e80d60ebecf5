//! Command-line surface of `folio-admin`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio-admin")]
#[command(about = "Create, inspect and render invoices")]
pub struct Cli {
    /// TOML config file (defaults to ./folio.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Admin JWT (also read from `FOLIO_ADMIN_TOKEN`).
    #[arg(long, global = true, env = "FOLIO_ADMIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an invoice from a JSON payload.
    Create(PayloadArgs),
    /// List every invoice, oldest first.
    List,
    /// Print one invoice.
    Get(IdArgs),
    /// Update status, payment method or notes.
    Patch(PatchArgs),
    /// Delete an invoice.
    Delete(IdArgs),
    /// Write the invoice PDF.
    Render(RenderArgs),
    /// Import a legacy JSON snapshot into an empty store.
    Migrate(MigrateArgs),
}

#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// JSON file with the creation payload.
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct PatchArgs {
    pub id: String,

    /// JSON file with the patch payload.
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    pub id: String,

    /// Output path (defaults to `{id}.pdf` in the current directory).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Snapshot to import (defaults to `store.snapshot_path`).
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}
