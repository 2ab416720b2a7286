// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The id→name table (`id_name.bin`, spec.md §4.3).
//!
//! Laid out as `u32 maxId`, then `maxId + 1` offset slots (index 0 is
//! reserved and unused, since id 0 never names a real article), then the
//! variable-length name records themselves. Each offset is stored
//! *relative to* the end of the header and offset table -- slot `x` plus
//! `4 + (maxId + 1) * 4` is the absolute file position of id `x`'s name
//! record. A name record with length 0 means "no title for this id" --
//! ids are dense over `1..=max_id`, but not every id in that range
//! necessarily corresponds to a live article by the time the dump
//! finished (redirects and deletions can leave gaps).

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::byteio::{read_string, read_u16, read_u32, write_u16, write_u32};
use crate::ids::ArticleId;

pub struct IdNameTable {
    file: File,
    max_id: u32,
}

impl IdNameTable {
    pub fn open(path: &Path) -> io::Result<IdNameTable> {
        let mut file = File::open(path)?;
        let max_id = read_u32(&mut file)?;
        Ok(IdNameTable { file, max_id })
    }

    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    /// Look up the title for `id`, or `None` if `id` is out of range or has
    /// no recorded title.
    pub fn lookup(&mut self, id: ArticleId) -> io::Result<Option<String>> {
        if id.0 == 0 || id.0 > self.max_id {
            return Ok(None);
        }

        // Header is one u32, then `max_id + 1` offsets (slot 0 unused).
        let records_start = records_start(self.max_id);
        let offset_slot = 4 + (id.0 as u64) * 4;
        self.file.seek(SeekFrom::Start(offset_slot))?;
        let relative_offset = read_u32(&mut self.file)?;

        self.file.seek(SeekFrom::Start(records_start + relative_offset as u64))?;
        let name_len = read_u16(&mut self.file)? as usize;
        if name_len == 0 {
            return Ok(None);
        }
        let name = read_string(&mut self.file, name_len)?;
        Ok(Some(name))
    }
}

fn records_start(max_id: u32) -> u64 {
    4 + (max_id as u64 + 1) * 4
}

/// Write `titles`, indexed by `ArticleId(i + 1)`, as an `id_name.bin` file.
/// A `None` entry is written as a zero-length name record, matching
/// original_source's convention of `writeInt16(0, f)` for missing titles.
/// Offsets are written relative to `records_start`, per spec.md §4.3.
pub fn write_id_name_table<W: Write + Seek>(w: &mut W, titles: &[Option<String>]) -> io::Result<()> {
    let max_id = titles.len() as u32;
    write_u32(w, max_id)?;

    let offsets_start = w.stream_position()?;
    let num_slots = max_id as u64 + 1;
    for _ in 0..num_slots {
        write_u32(w, 0)?;
    }

    let records_start = records_start(max_id);
    let mut offsets = vec![0u32; num_slots as usize];
    for (i, title) in titles.iter().enumerate() {
        let id = i + 1;
        offsets[id] = (w.stream_position()? - records_start) as u32;
        match title {
            Some(name) => {
                write_u16(w, name.len() as u16)?;
                w.write_all(name.as_bytes())?;
            }
            None => {
                write_u16(w, 0)?;
            }
        }
    }

    w.seek(SeekFrom::Start(offsets_start))?;
    for offset in offsets {
        write_u32(w, offset)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip(titles: Vec<Option<&str>>) -> Vec<u8> {
        let owned: Vec<Option<String>> = titles.into_iter().map(|t| t.map(String::from)).collect();
        let mut cur = Cursor::new(Vec::new());
        write_id_name_table(&mut cur, &owned).unwrap();
        cur.into_inner()
    }

    fn open_bytes(data: Vec<u8>) -> IdNameTable {
        let path = std::env::temp_dir().join(format!("id_name_test_{:?}", std::thread::current().id()));
        std::fs::write(&path, &data).unwrap();
        let table = IdNameTable::open(&path).unwrap();
        std::fs::remove_file(&path).ok();
        table
    }

    #[test]
    fn looks_up_present_titles() {
        let data = roundtrip(vec![Some("Alpha"), Some("Beta"), None, Some("Delta")]);
        let mut table = open_bytes(data);
        assert_eq!(table.max_id(), 4);
        assert_eq!(table.lookup(ArticleId(1)).unwrap(), Some("Alpha".to_string()));
        assert_eq!(table.lookup(ArticleId(2)).unwrap(), Some("Beta".to_string()));
        assert_eq!(table.lookup(ArticleId(3)).unwrap(), None);
        assert_eq!(table.lookup(ArticleId(4)).unwrap(), Some("Delta".to_string()));
    }

    #[test]
    fn out_of_range_id_is_none() {
        let data = roundtrip(vec![Some("Alpha")]);
        let mut table = open_bytes(data);
        assert_eq!(table.lookup(ArticleId(0)).unwrap(), None);
        assert_eq!(table.lookup(ArticleId(2)).unwrap(), None);
    }
}
