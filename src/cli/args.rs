//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Build trees, check them and step through their centroid decomposition
#[derive(Parser, Debug)]
#[command(name = "centroid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decompose a tree and print the centroid hierarchy
    Decompose {
        /// Tree description (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// List every centroid step
        #[arg(short, long)]
        steps: bool,
        /// Play the steps one by one with a pause in between
        #[arg(short, long)]
        animate: bool,
        /// Pause between animated steps, overrides the config
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
        /// Node label to enter the tree at (default: first node)
        #[arg(long)]
        start: Option<String>,
    },

    /// Report whether a description forms a tree
    Check {
        /// Tree description (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Render a tree description
    Show {
        /// Tree description (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print a generated tree description
    Generate {
        /// Tree shape
        #[arg(value_enum)]
        shape: Shape,
        /// Node count (levels for `binary`)
        size: usize,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a commented config template
    Template,
    /// Print the global config file location
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Path,
    Star,
    Binary,
}
