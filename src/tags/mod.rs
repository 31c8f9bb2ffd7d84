//! Tag derivation for filesystem entries
//!
//! Tags come from one of two places:
//!
//! - **Bracket notation** in the entry name: `report [finance][Q1].txt`
//!   carries `finance` and `Q1`. Used for directories and for every file
//!   that is not a recognised document format.
//! - **Keyword metadata** for DjVu and PDF documents: the format's keyword
//!   field is split on commas. For these formats the name is never
//!   consulted, even when the metadata is missing.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::metadata::{DocumentFormat, Extractors, Metadata};

/// A tag is an opaque, case-sensitive string
pub type Tag = String;

/// Unordered set of tags, kept sorted for stable output
pub type TagSet = BTreeSet<Tag>;

static BRACKET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("bracket tag pattern is valid"));

/// Every non-empty `[...]` group in `name`
#[must_use]
pub fn bracket_tags(name: &str) -> TagSet {
    BRACKET_TAG
        .captures_iter(name)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Split a comma-separated keyword list into tags, trimming each piece and
/// dropping empty ones
#[must_use]
pub fn keyword_tags(keywords: &str) -> TagSet {
    keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tags stored in a document's keyword field; empty if the field is absent
#[must_use]
pub fn metadata_tags(format: DocumentFormat, metadata: &Metadata) -> TagSet {
    metadata
        .get(format.keyword_field())
        .map(|keywords| keyword_tags(keywords))
        .unwrap_or_default()
}

/// Tags of a regular file named `name` located at `path`
#[must_use]
pub fn file_tags(name: &str, path: &Path, extractors: &Extractors) -> TagSet {
    match DocumentFormat::from_name(name) {
        Some(format) => metadata_tags(format, &extractors.extract(format, path)),
        None => bracket_tags(name),
    }
}

/// Tags of a directory named `name`; a non-empty result turns the
/// directory into a single tagged entry
#[must_use]
pub fn directory_tags(name: &str) -> TagSet {
    bracket_tags(name)
}
