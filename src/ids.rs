// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Primitive types for the article graph.

use std::fmt;

/// Dense article identifier assigned by the indexer, starting at 1.
///
/// Id 0 is the sentinel for "not found" or "no entry", mirroring the
/// sentinel the on-disk formats already use for absent children and
/// missing offsets (spec.md §3, I1).
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ArticleId(pub u32);

impl ArticleId {
    pub const INVALID: ArticleId = ArticleId(0);

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercase a title the same way both the indexer and the pathfinder must,
/// so that name lookups are consistent between what was written and what is
/// queried (spec.md §6: "Both tools are case-insensitive on titles").
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_is_zero() {
        assert_eq!(ArticleId::INVALID, ArticleId(0));
        assert!(!ArticleId(0).is_valid());
        assert!(ArticleId(1).is_valid());
    }

    #[test]
    fn normalize_title_lowercases() {
        assert_eq!(normalize_title("AlPhA"), "alpha");
        assert_eq!(normalize_title("Café"), "café");
    }
}
