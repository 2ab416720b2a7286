// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The adjacency cache over `links.bin` (spec.md §4.5).
//!
//! `links.bin` holds, per article id, the dense list of outgoing link
//! targets: `u32 maxId`, then `maxId + 1` offset slots (index 0 unused,
//! same layout as `id_name.bin`, each offset relative to the end of the
//! header and offset table), followed by variable length `(count: u32,
//! ids: [u32; count])` records. Reading the whole
//! file into memory up front is wasteful for a query that only ever
//! touches a fraction of the graph, so `LinkDatabase` is a read-through
//! cache that never evicts -- once an id's adjacency list has been paged
//! in it stays resident for the life of the process, the same contract
//! `ThumbCache` makes for thumbnails.
//!
//! The cache splits its lock into two: an `RwLock` over the in-memory map,
//! and a separate `Mutex` around the shared file handle. A lookup first
//! takes a read lock to check the map; on a miss it takes the file mutex,
//! seeks and reads the record, drops the file lock, then takes a write
//! lock to insert. Holding the map's write lock across the file read would
//! serialize every concurrent miss behind disk I/O; splitting the locks
//! means only one thread pays for a given id's I/O while others can still
//! read already-cached ids. A duplicate read racing another thread for the
//! same id is wasted work, not a correctness problem -- both threads would
//! insert the same list.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::Duration;

use crate::byteio::{read_u32, write_u32};
use crate::ids::ArticleId;

fn records_start(max_id: u32) -> u64 {
    4 + (max_id as u64 + 1) * 4
}

/// Write `adjacency`, indexed by `ArticleId(i + 1)`, as a `links.bin` file.
/// Same offset-table-then-records layout `LinkDatabase::expand` reads back:
/// `maxId + 1` slots (index 0 unused), offsets relative to `records_start`.
pub fn write_links_table<W: io::Write + Seek>(w: &mut W, adjacency: &[Vec<u32>]) -> io::Result<()> {
    let max_id = adjacency.len() as u32;
    write_u32(w, max_id)?;

    let offsets_start = w.stream_position()?;
    let num_slots = max_id as u64 + 1;
    for _ in 0..num_slots {
        write_u32(w, 0)?;
    }

    let records_start = records_start(max_id);
    let mut offsets = vec![0u32; num_slots as usize];
    for (i, links) in adjacency.iter().enumerate() {
        let id = i + 1;
        offsets[id] = (w.stream_position()? - records_start) as u32;
        write_u32(w, links.len() as u32)?;
        for &link in links {
            write_u32(w, link)?;
        }
    }

    w.seek(SeekFrom::Start(offsets_start))?;
    for offset in offsets {
        write_u32(w, offset)?;
    }

    Ok(())
}

pub struct LinkDatabase {
    cache: RwLock<HashMap<u32, Arc<Vec<u32>>>>,
    file: Mutex<File>,
    max_id: u32,
}

impl LinkDatabase {
    pub fn open(path: &Path) -> io::Result<LinkDatabase> {
        let mut file = File::open(path)?;
        let max_id = read_u32(&mut file)?;
        Ok(LinkDatabase {
            cache: RwLock::new(HashMap::new()),
            file: Mutex::new(file),
            max_id,
        })
    }

    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    /// Return the outgoing links for `id`, paging them in from disk on a
    /// cache miss. Callers on different threads can call this
    /// concurrently.
    pub fn links(&self, id: ArticleId) -> io::Result<Arc<Vec<u32>>> {
        if let Some(hit) = self.cache.read().unwrap().get(&id.0) {
            return Ok(Arc::clone(hit));
        }
        self.expand(id.0)
    }

    /// Read `id`'s record from disk, insert it into the cache and return
    /// it, without checking the cache first. Used both by `links` on a
    /// miss and by the prefetcher, which already knows it hasn't visited
    /// this id.
    fn expand(&self, id: u32) -> io::Result<Arc<Vec<u32>>> {
        if id == 0 || id > self.max_id {
            let empty = Arc::new(Vec::new());
            self.cache.write().unwrap().entry(id).or_insert_with(|| Arc::clone(&empty));
            return Ok(empty);
        }

        let record = {
            let mut file = self.file.lock().unwrap();
            let offset_slot = 4 + (id as u64) * 4;
            file.seek(SeekFrom::Start(offset_slot))?;
            let relative_offset = read_u32(&mut *file)?;

            file.seek(SeekFrom::Start(records_start(self.max_id) + relative_offset as u64))?;
            let count = read_u32(&mut *file)?;
            let mut buf = vec![0u8; count as usize * 4];
            file.read_exact(&mut buf)?;
            buf.chunks_exact(4).map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]])).collect::<Vec<u32>>()
        };

        let links = Arc::new(record);
        let mut cache = self.cache.write().unwrap();
        let entry = cache.entry(id).or_insert_with(|| Arc::clone(&links));
        Ok(Arc::clone(entry))
    }
}

/// Walks ids `1..=max_id` in order, calling `expand` ahead of the BFS
/// engine so that by the time a worker needs an id's adjacency list it is
/// already resident. Mirrors original_source's `expanderThread`, which
/// polls `this_thread::interruption_point()` between ids; here the worker
/// polls an `AtomicBool` set once the search has a result, so the thread
/// unwinds promptly instead of running to completion after the answer is
/// already known.
pub fn spawn_prefetcher(db: Arc<LinkDatabase>, stop: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("prefetcher".into())
        .spawn(move || {
            let max_id = db.max_id();
            for id in 1..=max_id {
                if stop.load(Ordering::Relaxed) {
                    return;
                }
                if db.expand(id).is_err() {
                    return;
                }
            }
        })
        .expect("failed to spawn prefetcher thread")
}

/// Blocks the calling thread until `stop` is set or `timeout` elapses,
/// for tests and callers that want to bound how long they wait on a
/// prefetcher without a condvar.
pub fn wait_for_stop(stop: &AtomicBool, timeout: Duration) {
    let start = std::time::Instant::now();
    while !stop.load(Ordering::Relaxed) && start.elapsed() < timeout {
        thread::sleep(Duration::from_millis(1));
    }
}
