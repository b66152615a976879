//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Asset bundle commands.
#[derive(Debug, Subcommand)]
pub enum AssetsCommand {
    /// Save three logos and a video for a presentation
    Save {
        /// Presentation id
        id: String,

        /// Logo image file (give exactly three, in slot order)
        #[arg(short, long = "logo", value_name = "FILE", num_args = 1, required = true)]
        logos: Vec<PathBuf>,

        /// Video file
        #[arg(long, value_name = "FILE")]
        video: PathBuf,
    },

    /// Remove a presentation's assets
    Clear {
        /// Presentation id
        id: String,
    },

    /// Show the assets that would be played for a presentation
    Show {
        /// Presentation id
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Write a presentation's assets to a directory
    Export {
        /// Presentation id
        id: String,

        /// Directory to write the files into
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
    },
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_command_debug() {
        let cmd = AssetsCommand::Clear {
            id: "1".to_string(),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Clear"));
    }

    #[test]
    fn test_list_command_debug() {
        let cmd = ListCommand { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
