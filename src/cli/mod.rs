//! CLI module for Keymint
//!
//! Provides subcommands:
//! - `serve`: run the issuance API server (default mode)
//! - `migrate`: apply or inspect the PostgreSQL schema

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Keymint - API key issuance service
#[derive(Parser)]
#[command(name = "keymint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the issuance API server
    Serve,

    /// Apply or inspect database migrations
    Migrate(migrate::MigrateArgs),
}
