//! Tagfs CLI application entry point
//!
//! Indexes a directory tree and mounts it as a read-only tag filesystem, or
//! inspects what such a mount would contain.
//!
//! # Usage
//!
//! ```bash
//! # Mount ~/papers at ~/tags until interrupted
//! tagfs mount ~/papers ~/tags --auto-unmount
//!
//! # Show every entry with its tags, or every tag with its count
//! tagfs index ~/papers
//! tagfs index ~/papers tags
//!
//! # Show what a virtual path refers to
//! tagfs resolve ~/papers /finance/q1
//!
//! # Write a default configuration file
//! tagfs config init
//! ```
//!
//! # Configuration
//!
//! Read from the user's config directory (`~/.config/tagfs/config.toml` on
//! Linux) if present. `RUST_LOG` overrides the configured log level.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tagfs::{
    TagfsError,
    cli::{Cli, Commands, ConfigCommands, ListVariant},
    config::TagfsConfig,
    fs::TagFs,
    index::Index,
    metadata::Extractors,
    output,
};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, TagfsError>;

fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Check that `root` is a directory and make it absolute so entry targets
/// resolve from anywhere
fn canonical_root(root: &Path) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(TagfsError::InvalidInput(format!(
            "Not a directory: {}",
            root.display()
        )));
    }
    Ok(root.canonicalize()?)
}

fn build_index(root: &Path, config: &TagfsConfig) -> Result<Index> {
    let root = canonical_root(root)?;
    let extractors = Extractors::from_config(&config.extractors);
    Ok(Index::build(&root, &extractors)?)
}

#[cfg(feature = "fuse")]
fn handle_mount_command(
    config: &TagfsConfig,
    root: &Path,
    mountpoint: &Path,
    options: tagfs::fs::fuse::MountOptions,
) -> Result<()> {
    if !mountpoint.is_dir() {
        return Err(TagfsError::InvalidInput(format!(
            "Mountpoint is not a directory: {}",
            mountpoint.display()
        )));
    }

    let index = build_index(root, config)?;
    let fs = TagFs::new(Arc::new(index));
    tagfs::fs::fuse::mount(fs, mountpoint, &options)?;
    tracing::info!(mountpoint = %mountpoint.display(), "unmounted");
    Ok(())
}

fn handle_index_command(index: &Index, variant: ListVariant, json: bool, quiet: bool) -> Result<()> {
    match variant {
        ListVariant::Files if json => {
            println!("{}", serde_json::to_string_pretty(index.entries())?);
        }
        ListVariant::Tags if json => {
            println!("{}", serde_json::to_string_pretty(&index.tag_counts())?);
        }
        ListVariant::Files => {
            if index.is_empty() {
                if !quiet {
                    println!("No entries found.");
                }
            } else {
                if !quiet {
                    println!("Entries:");
                }
                for entry in index.entries() {
                    println!("{}", output::entry_with_tags(entry, quiet));
                }
            }
        }
        ListVariant::Tags => {
            let counts = index.tag_counts();
            if counts.is_empty() {
                if !quiet {
                    println!("No tags found.");
                }
            } else {
                if !quiet {
                    println!("Tags:");
                }
                for (tag, count) in counts {
                    println!("{}", output::tag_with_count(tag, count, quiet));
                }
            }
        }
    }
    Ok(())
}

fn handle_resolve_command(index: Index, path: &str, json: bool, quiet: bool) -> Result<()> {
    let fs = TagFs::new(Arc::new(index));
    let resolution = fs.resolve(path);

    if json {
        println!("{}", serde_json::to_string_pretty(&output::resolution_json(&resolution))?);
        return Ok(());
    }

    if !quiet {
        println!("{}", output::resolution_summary(&resolution));
    }

    if resolution.is_directory() {
        for entry in fs.list(path) {
            println!("{}", output::colorize_dir_entry(&entry));
        }
    } else if quiet {
        println!("{}", fs.read_link(path)?.display());
    }
    Ok(())
}

fn handle_config_command(
    config: &TagfsConfig,
    config_path: &Path,
    command: &ConfigCommands,
    quiet: bool,
) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                return Err(TagfsError::InvalidInput(format!(
                    "Config file already exists: {} (use --force to overwrite)",
                    config_path.display()
                )));
            }
            TagfsConfig::default().save_to(config_path)?;
            if !quiet {
                println!("Wrote {}", config_path.display());
            }
        }
        ConfigCommands::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

/// Main entry point for the tagfs application
///
/// Loads configuration, parses command-line arguments, and dispatches to the
/// appropriate command handler.
///
/// # Errors
///
/// Returns `TagfsError` if configuration loading fails, the tree cannot be
/// indexed, or the mount fails.
fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = match &cli.config {
        Some(path) => TagfsConfig::load_from(path)?,
        None => TagfsConfig::load()?,
    };

    init_logging(cli.log_filter(&config.log_level, config.quiet));
    let quiet = cli.quiet || config.quiet;

    match &cli.command {
        Commands::Mount { root, mountpoint, allow_other, auto_unmount, fsname } => {
            #[cfg(feature = "fuse")]
            {
                let options = tagfs::fs::fuse::MountOptions {
                    fsname: fsname.clone().unwrap_or_else(|| config.mount.fsname.clone()),
                    allow_other: *allow_other || config.mount.allow_other,
                    auto_unmount: *auto_unmount || config.mount.auto_unmount,
                };
                handle_mount_command(&config, root, mountpoint, options)?;
            }
            #[cfg(not(feature = "fuse"))]
            {
                let _ = (root, mountpoint, allow_other, auto_unmount, fsname);
                return Err(TagfsError::InvalidInput(
                    "This build of tagfs has no FUSE support; rebuild with the 'fuse' feature".into(),
                ));
            }
        }
        Commands::Index { root, variant, json } => {
            let index = build_index(root, &config)?;
            handle_index_command(&index, *variant, *json, quiet)?;
        }
        Commands::Resolve { root, path, json } => {
            let index = build_index(root, &config)?;
            handle_resolve_command(index, path, *json, quiet)?;
        }
        Commands::Config { command } => {
            let config_path = match &cli.config {
                Some(path) => path.clone(),
                None => TagfsConfig::config_path()?,
            };
            handle_config_command(&config, &config_path, command, quiet)?;
        }
    }

    Ok(())
}
