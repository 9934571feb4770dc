//! CLI module for Shortsmith.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Shortsmith - scripts and footage keywords for short videos
///
/// Writes a short spoken script for a topic and turns timed captions into
/// time-aligned search keywords for background footage.
#[derive(Parser, Debug)]
#[command(name = "shortsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SHORTSMITH_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a short script for a topic
    Script {
        /// Topic, e.g. "Weird facts"
        topic: String,

        /// Write the script to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Extract a keyword timeline from a script and its timed captions
    Timeline {
        /// File containing the script text
        #[arg(short, long)]
        script: String,

        /// JSON file of captions: [[[start, end], "text"], ...]
        #[arg(short = 'C', long)]
        captions: String,

        /// Write the timeline to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Override the maximum number of model calls
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// Merge unassigned video segments into their neighbours
    Merge {
        /// JSON file of segments: [[[start, end], "url" | null], ...]
        segments: String,

        /// Write the merged segments to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}
