//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// handctl - Turn hand-landmark streams into cursor and gesture actions
#[derive(Parser, Debug)]
#[command(name = "handctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the control loop: frames in on stdin, commands out on stdout
    Run {
        /// Model file (defaults to the configured path)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Record labeled training samples from the frame stream
    Train {
        /// Label selected before the first frame arrives
        #[arg(short, long)]
        label: Option<String>,

        /// Output model file (defaults to the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Merge new samples into an existing model instead of starting empty
        #[arg(long)]
        append: bool,
    },

    /// Classify frames and print events without dispatching commands
    Classify {
        /// Model file (defaults to the configured path)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Neighbors to consult (defaults to the configured k)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Inspect a trained model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Model subcommands
#[derive(Subcommand, Debug)]
pub enum ModelAction {
    /// Show labels and sample counts
    Show {
        /// Model file (defaults to the configured path)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "gate.cooldown_ms", "classifier.k")
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a specific configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
