//! Virtual path resolution
//!
//! A virtual path is read left to right in two phases:
//!
//! 1. **Narrowing**: while segments name known tags, each one filters the
//!    visible entries down to those carrying it.
//! 2. **Residual**: the first segment that is not a known tag switches to
//!    residual mode for good. It and every following segment are joined
//!    into the residual, even if a later segment happens to be a tag.
//!
//! An empty residual means the path names a tag directory. A non-empty
//! residual can only name an entry whose `name` equals the whole residual,
//! so the visible tree is a tag prefix followed by at most one entry name.
//!
//! ```text
//! /finance/q1/            consumed {finance, q1}, residual ""
//! /finance/report.txt     consumed {finance},     residual "report.txt"
//! /nope/finance           consumed {},            residual "nope/finance"
//! ```

use std::collections::BTreeSet;

use crate::index::{Entry, Index};

/// Outcome of resolving one virtual path. Borrows from the index and lives
/// only for the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    consumed_tags: BTreeSet<&'a str>,
    residual: String,
    visible_entries: Vec<&'a Entry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Narrowing,
    Residual,
}

/// Resolve `virtual_path` against `index`.
///
/// Never fails; paths that match nothing simply produce a resolution whose
/// residual names no entry.
#[must_use]
pub fn resolve<'a>(index: &'a Index, virtual_path: &str) -> Resolution<'a> {
    let mut phase = Phase::Narrowing;
    let mut consumed_tags = BTreeSet::new();
    let mut residual_parts: Vec<&str> = Vec::new();
    let mut visible_entries: Vec<&'a Entry> = index.entries().iter().collect();

    for segment in virtual_path.split('/').filter(|s| !s.is_empty()) {
        match phase {
            Phase::Narrowing => {
                if let Some(tag) = index.tag_universe().get(segment) {
                    visible_entries.retain(|entry| entry.has_tag(tag));
                    consumed_tags.insert(tag.as_str());
                } else {
                    phase = Phase::Residual;
                    residual_parts.push(segment);
                }
            }
            Phase::Residual => residual_parts.push(segment),
        }
    }

    Resolution {
        consumed_tags,
        residual: residual_parts.join("/"),
        visible_entries,
    }
}

impl<'a> Resolution<'a> {
    /// Tags applied as filters along the path
    #[must_use]
    pub const fn consumed_tags(&self) -> &BTreeSet<&'a str> {
        &self.consumed_tags
    }

    /// Part of the path that was not recognised as tags, `/`-joined
    #[must_use]
    pub fn residual(&self) -> &str {
        &self.residual
    }

    /// Entries carrying every consumed tag, in index order
    #[must_use]
    pub fn visible_entries(&self) -> &[&'a Entry] {
        &self.visible_entries
    }

    /// True when the path names a tag directory rather than an entry
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.residual.is_empty()
    }

    /// The entry named by the residual. The first match wins when several
    /// visible entries share a name.
    #[must_use]
    pub fn entry(&self) -> Option<&'a Entry> {
        if self.is_directory() {
            return None;
        }
        self.visible_entries
            .iter()
            .copied()
            .find(|entry| entry.name() == self.residual)
    }

    /// Tags that would narrow the current selection further: the union of
    /// the visible entries' tags minus the ones already consumed
    #[must_use]
    pub fn remaining_tags(&self) -> BTreeSet<&'a str> {
        self.visible_entries
            .iter()
            .flat_map(|&entry| entry.tags())
            .map(String::as_str)
            .filter(|tag| !self.consumed_tags.contains(tag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_index;

    fn names<'a>(resolution: &Resolution<'a>) -> Vec<&'a str> {
        resolution.visible_entries().iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_root_sees_everything() {
        let index = fixture_index();
        let r = resolve(&index, "/");

        assert!(r.consumed_tags().is_empty());
        assert_eq!(r.residual(), "");
        assert!(r.is_directory());
        assert_eq!(r.visible_entries().len(), index.len());
    }

    #[test]
    fn test_tag_segments_narrow() {
        let index = fixture_index();
        let r = resolve(&index, "/finance/q1/");

        assert_eq!(r.residual(), "");
        assert_eq!(r.consumed_tags().iter().copied().collect::<Vec<_>>(), vec!["finance", "q1"]);
        assert_eq!(names(&r), vec!["doc [finance][q1].txt"]);
        for entry in r.visible_entries() {
            assert!(entry.has_tag("finance") && entry.has_tag("q1"));
        }
    }

    #[test]
    fn test_tag_order_does_not_matter() {
        let index = fixture_index();
        let ab = resolve(&index, "/finance/q1");
        let ba = resolve(&index, "/q1/finance");

        assert_eq!(ab.consumed_tags(), ba.consumed_tags());
        assert_eq!(ab.visible_entries(), ba.visible_entries());
        assert_eq!(ab.residual(), ba.residual());
    }

    #[test]
    fn test_empty_segments_are_ignored() {
        let index = fixture_index();
        let clean = resolve(&index, "/finance/q1");
        let messy = resolve(&index, "//finance///q1//");

        assert_eq!(clean, messy);
        assert_eq!(resolve(&index, ""), resolve(&index, "/"));
    }

    #[test]
    fn test_unknown_first_segment_stops_narrowing() {
        let index = fixture_index();
        let r = resolve(&index, "/unknown/finance/q1");

        assert!(r.consumed_tags().is_empty());
        assert_eq!(r.residual(), "unknown/finance/q1");
        assert_eq!(r.visible_entries().len(), index.len());
        assert!(r.entry().is_none());
    }

    #[test]
    fn test_residual_mode_is_sticky() {
        let index = fixture_index();
        let r = resolve(&index, "/finance/doc [finance][q1].txt/q1");

        assert_eq!(r.consumed_tags().len(), 1);
        assert_eq!(r.residual(), "doc [finance][q1].txt/q1");
        assert_eq!(names(&r), vec!["doc [finance][q1].txt", "ledger [finance].txt"]);
        assert!(r.entry().is_none());
    }

    #[test]
    fn test_residual_names_entry() {
        let index = fixture_index();
        let r = resolve(&index, "/old/archive[old]");

        assert_eq!(r.residual(), "archive[old]");
        let entry = r.entry().unwrap();
        assert!(entry.is_directory_alias());
    }

    #[test]
    fn test_entry_must_be_visible() {
        let index = fixture_index();

        assert!(resolve(&index, "/archive[old]").entry().is_some());
        assert!(resolve(&index, "/finance/archive[old]").entry().is_none());
    }

    #[test]
    fn test_remaining_tags_exclude_consumed() {
        let index = fixture_index();
        let r = resolve(&index, "/finance");

        let remaining: Vec<&str> = r.remaining_tags().into_iter().collect();
        assert_eq!(remaining, vec!["q1"]);
    }

    #[test]
    fn test_repeated_tag_segment() {
        let index = fixture_index();
        let once = resolve(&index, "/finance");
        let twice = resolve(&index, "/finance/finance");

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_index() {
        let index = Index::default();
        let r = resolve(&index, "/anything/at/all");

        assert_eq!(r.residual(), "anything/at/all");
        assert!(r.visible_entries().is_empty());
        assert!(r.remaining_tags().is_empty());
    }
}
