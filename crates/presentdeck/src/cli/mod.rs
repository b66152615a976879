//! Command-line interface for presentdeck.
//!
//! This module provides the CLI structure and command handlers for the
//! `deckctl` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AssetsCommand, ConfigCommand, ListCommand, StatusCommand};

/// deckctl - Manage presentations and their asset bundles
///
/// Each presentation has three logos and one video, kept in a local
/// database alongside the presentation metadata.
#[derive(Debug, Parser)]
#[command(name = "deckctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List presentations, creating the defaults on first use
    List(ListCommand),

    /// Manage a presentation's assets
    #[command(subcommand)]
    Assets(AssetsCommand),

    /// Repair presentations whose asset flag disagrees with stored assets
    Repair,

    /// Show store status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
