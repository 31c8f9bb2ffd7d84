//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for tagfs using the `clap` crate.
//!
//! # Commands
//!
//! - **mount**: Build the index of a tree and serve it as a tag filesystem
//! - **index**: Print the entries or tags the index would contain
//! - **resolve**: Show how a virtual path resolves against a tree
//! - **config**: Create or show the configuration file
//!
//! Global `--quiet` and `--verbose` flags adjust the log level; `--config`
//! points at an alternative configuration file.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// List variant for the index command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListVariant {
    /// List every entry with its tags
    #[default]
    Files,
    /// List every tag with the number of entries carrying it
    Tags,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the path of the configuration file
    Path,
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tagfs")]
#[command(about = "A read-only filesystem that presents files by tag", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log more detail (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Use this configuration file instead of the default one
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Mount the tag filesystem for a directory tree
    #[command(visible_alias = "m")]
    Mount {
        /// Directory tree to index
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Where to mount the filesystem
        #[arg(value_name = "MOUNTPOINT")]
        mountpoint: PathBuf,

        /// Allow other users to access the mount (overrides config)
        #[arg(long = "allow-other")]
        allow_other: bool,

        /// Unmount when the process exits (overrides config)
        #[arg(long = "auto-unmount")]
        auto_unmount: bool,

        /// Filesystem name shown in the mount table (overrides config)
        #[arg(long = "fsname", value_name = "NAME")]
        fsname: Option<String>,
    },

    /// Print the index built for a directory tree
    #[command(visible_alias = "ls")]
    Index {
        /// Directory tree to index
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// What to list
        #[arg(value_enum, default_value_t = ListVariant::Files)]
        variant: ListVariant,

        /// Print JSON instead of text
        #[arg(long = "json")]
        json: bool,
    },

    /// Resolve a virtual path against a directory tree
    #[command(visible_alias = "r")]
    Resolve {
        /// Directory tree to index
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Virtual path inside the filesystem (e.g. /finance/q1)
        #[arg(value_name = "VIRTUAL_PATH")]
        path: String,

        /// Print JSON instead of text
        #[arg(long = "json")]
        json: bool,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter implied by the flags, given the configured default
    #[must_use]
    pub fn log_filter<'a>(&self, configured: &'a str, configured_quiet: bool) -> &'a str {
        match self.verbose {
            0 if self.quiet || configured_quiet => "warn",
            0 => configured,
            1 => "debug",
            _ => "trace",
        }
    }
}
