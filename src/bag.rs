// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! A sharded set of visited article ids, used by the BFS engine to track
//! which ids have already been queued and by which predecessor.
//!
//! Grounded in original_source's `bag`/`bucket` (`bag.hpp`): entries are
//! sharded into `BUCKETS` buckets by the low bits of the key, so that
//! merging two bags (handing a worker's discoveries back to the
//! orchestrator) or splitting one bag into worker-sized pieces is just
//! bucket-wise `Vec` moves, no rehashing. We keep each bucket as a plain
//! `Vec<Entry>` rather than porting the original's intrusive singly-linked
//! list, since Rust has no use for hand-rolled pointer-chasing where an
//! owned vector does the same job with the allocator doing the work.
//!
//! The bucket index itself is identical in spirit to `AlbumTable`'s
//! `key & mask` hash: both pick a power-of-two table size and use the
//! id's own bits as the hash, because article/album ids are already dense
//! and uniformly distributed enough that no mixing step is needed.

const HASH_BITS: u32 = 16;
const BUCKETS: usize = 1 << HASH_BITS;
const HASH_MASK: u32 = (BUCKETS - 1) as u32;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub key: u32,
    pub parent: u32,
}

fn bucket_of(key: u32) -> usize {
    (key & HASH_MASK) as usize
}

/// A sharded set of `(key, parent)` pairs. Insertion is first-writer-wins:
/// once a key has an entry, later inserts of the same key are no-ops. This
/// matches the BFS invariant that the first round to reach an article
/// records the shortest-path predecessor; any later discovery of the same
/// article is necessarily via a longer or equal path and must be ignored.
#[derive(Clone)]
pub struct Bag {
    buckets: Vec<Vec<Entry>>,
}

impl Bag {
    pub fn new() -> Bag {
        Bag { buckets: (0..BUCKETS).map(|_| Vec::new()).collect() }
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.is_empty())
    }

    pub fn contains(&self, key: u32) -> bool {
        self.buckets[bucket_of(key)].iter().any(|e| e.key == key)
    }

    pub fn get_parent(&self, key: u32) -> Option<u32> {
        self.buckets[bucket_of(key)].iter().find(|e| e.key == key).map(|e| e.parent)
    }

    /// Insert `key` with the given `parent` if it is not already present.
    /// Returns `true` if the entry was newly inserted.
    pub fn insert(&mut self, key: u32, parent: u32) -> bool {
        let bucket = &mut self.buckets[bucket_of(key)];
        if bucket.iter().any(|e| e.key == key) {
            return false;
        }
        bucket.push(Entry { key, parent });
        true
    }

    /// Move every entry of `other` into `self`. Entries already present in
    /// `self` are kept (first-writer-wins), matching `bag::merge` in
    /// original_source.
    pub fn merge(&mut self, other: Bag) {
        for (i, mut bucket) in other.buckets.into_iter().enumerate() {
            if self.buckets[i].is_empty() {
                self.buckets[i] = bucket;
            } else {
                for entry in bucket.drain(..) {
                    if !self.buckets[i].iter().any(|e| e.key == entry.key) {
                        self.buckets[i].push(entry);
                    }
                }
            }
        }
    }

    /// Partition this bag's buckets round-robin into `n` new bags, for
    /// handing roughly even shares of a frontier to `n` worker threads.
    /// Mirrors `bag::split` dividing work by bucket rather than by
    /// re-hashing every element.
    pub fn split(self, n: usize) -> Vec<Bag> {
        let mut parts: Vec<Bag> = (0..n).map(|_| Bag { buckets: (0..BUCKETS).map(|_| Vec::new()).collect() }).collect();
        for (i, bucket) in self.buckets.into_iter().enumerate() {
            parts[i % n].buckets[i] = bucket;
        }
        parts
    }

    /// Drain every entry out of the bag, consuming it.
    pub fn extract(self) -> Vec<Entry> {
        self.buckets.into_iter().flatten().collect()
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}

impl Default for Bag {
    fn default() -> Bag {
        Bag::new()
    }
}
