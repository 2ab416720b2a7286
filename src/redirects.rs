// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The redirect table (`redirects.bin`, spec.md §4.4).
//!
//! A flat array of fixed-size `(from_id, to_id)` records sorted by
//! `from_id`, searched with an ordinary binary search rather than a tree --
//! original_source's `redirect_map` walks the same sorted array by
//! recursive bisection (`search_impl`); a flat sorted array needs no node
//! overhead and no placeholder/relocation pass to write.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::byteio::{read_u32, write_u32};
use crate::ids::ArticleId;

const RECORD_LEN: u64 = 8;

pub struct RedirectTable {
    file: File,
    record_count: u64,
}

impl RedirectTable {
    pub fn open(path: &Path) -> io::Result<RedirectTable> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        debug_assert_eq!(len % RECORD_LEN, 0, "redirects.bin length must be a multiple of the record size");
        Ok(RedirectTable { file, record_count: len / RECORD_LEN })
    }

    fn read_record(&mut self, index: u64) -> io::Result<(u32, u32)> {
        self.file.seek(SeekFrom::Start(index * RECORD_LEN))?;
        let from_id = read_u32(&mut self.file)?;
        let to_id = read_u32(&mut self.file)?;
        Ok((from_id, to_id))
    }

    /// Resolve `id` through one level of redirection. Returns `id` itself
    /// when it is not a redirect source (spec.md §4.4: redirects are not
    /// chained on disk -- the indexer flattens any redirect chain found in
    /// the dump down to its final, non-redirect target before writing this
    /// table, so a single lookup here always suffices).
    pub fn resolve(&mut self, id: ArticleId) -> io::Result<ArticleId> {
        if self.record_count == 0 {
            return Ok(id);
        }

        let mut lo = 0u64;
        let mut hi = self.record_count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let (from_id, to_id) = self.read_record(mid)?;
            match id.0.cmp(&from_id) {
                std::cmp::Ordering::Equal => return Ok(ArticleId(to_id)),
                std::cmp::Ordering::Less => hi = mid,
                std::cmp::Ordering::Greater => lo = mid + 1,
            }
        }

        Ok(id)
    }
}

/// Write `redirects` (pairs of `(from_id, to_id)`, not required to be
/// pre-sorted) as a `redirects.bin` file.
pub fn write_redirect_table<W: Write + Seek>(w: &mut W, redirects: &mut Vec<(u32, u32)>) -> io::Result<()> {
    redirects.sort_by_key(|&(from_id, _)| from_id);
    for &(from_id, to_id) in redirects.iter() {
        write_u32(w, from_id)?;
        write_u32(w, to_id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn open_redirects(mut pairs: Vec<(u32, u32)>) -> RedirectTable {
        let mut cur = Cursor::new(Vec::new());
        write_redirect_table(&mut cur, &mut pairs).unwrap();
        let path = std::env::temp_dir().join(format!("redirects_test_{:?}", std::thread::current().id()));
        std::fs::write(&path, cur.into_inner()).unwrap();
        let table = RedirectTable::open(&path).unwrap();
        std::fs::remove_file(&path).ok();
        table
    }

    #[test]
    fn resolves_known_redirects() {
        let mut table = open_redirects(vec![(5, 1), (2, 1), (9, 7)]);
        assert_eq!(table.resolve(ArticleId(2)).unwrap(), ArticleId(1));
        assert_eq!(table.resolve(ArticleId(5)).unwrap(), ArticleId(1));
        assert_eq!(table.resolve(ArticleId(9)).unwrap(), ArticleId(7));
    }

    #[test]
    fn non_redirect_id_resolves_to_itself() {
        let mut table = open_redirects(vec![(5, 1)]);
        assert_eq!(table.resolve(ArticleId(42)).unwrap(), ArticleId(42));
    }

    #[test]
    fn empty_table_resolves_to_self() {
        let mut table = open_redirects(vec![]);
        assert_eq!(table.resolve(ArticleId(3)).unwrap(), ArticleId(3));
    }
}
