//! Output formatting for CLI display
//!
//! This module provides utilities for formatting index entries, tags, and
//! path resolutions for the terminal, plus their JSON forms.

use colored::Colorize;
use serde_json::{Value, json};

use crate::fs::{DirEntry, NodeKind};
use crate::index::Entry;
use crate::resolve::Resolution;

/// Format an entry with its tags for display
#[must_use]
pub fn entry_with_tags(entry: &Entry, quiet: bool) -> String {
    if quiet {
        return entry.underlying_path().display().to_string();
    }

    let name = if entry.is_directory_alias() {
        format!("{}/", entry.name()).cyan().to_string()
    } else {
        entry.name().to_string()
    };

    if entry.tags().is_empty() {
        format!("  {name} {}", "(no tags)".dimmed())
    } else {
        let tags: Vec<&str> = entry.tags().iter().map(String::as_str).collect();
        format!("  {name} [{}]", tags.join(", ").yellow())
    }
}

/// Format a tag with usage count
#[must_use]
pub fn tag_with_count(tag: &str, count: usize, quiet: bool) -> String {
    if quiet {
        tag.to_string()
    } else {
        let noun = if count == 1 { "entry" } else { "entries" };
        format!("  {} (used by {count} {noun})", tag.yellow())
    }
}

/// Color a listing name by kind: tag directories blue, entries cyan
#[must_use]
pub fn colorize_dir_entry(entry: &DirEntry<'_>) -> String {
    match entry.kind {
        NodeKind::Directory => entry.name.blue().bold().to_string(),
        NodeKind::Symlink => entry.name.cyan().to_string(),
    }
}

/// What a resolved path refers to
#[must_use]
pub fn resolution_kind(resolution: &Resolution<'_>) -> &'static str {
    if resolution.is_directory() {
        "directory"
    } else if resolution.entry().is_some() {
        "entry"
    } else {
        "missing"
    }
}

/// Multi-line human readable description of a resolution
#[must_use]
pub fn resolution_summary(resolution: &Resolution<'_>) -> String {
    let consumed: Vec<&str> = resolution.consumed_tags().iter().copied().collect();
    let mut lines = vec![
        format!("{} {}", "tags:".bold(), consumed.join(", ")),
        format!("{} {}", "residual:".bold(), resolution.residual()),
        format!("{} {}", "kind:".bold(), resolution_kind(resolution)),
    ];

    if let Some(entry) = resolution.entry() {
        lines.push(format!("{} {}", "target:".bold(), entry.underlying_path().display()));
    } else {
        lines.push(format!("{} {}", "visible:".bold(), resolution.visible_entries().len()));
    }

    lines.join("\n")
}

/// JSON form of a resolution
#[must_use]
pub fn resolution_json(resolution: &Resolution<'_>) -> Value {
    let visible: Vec<&str> = resolution.visible_entries().iter().map(|e| e.name()).collect();
    json!({
        "consumed_tags": resolution.consumed_tags(),
        "residual": resolution.residual(),
        "kind": resolution_kind(resolution),
        "target": resolution.entry().map(|e| e.underlying_path()),
        "visible_entries": visible,
        "remaining_tags": resolution.remaining_tags(),
    })
}
