// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The parallel breadth-first search engine (spec.md §4.6).
//!
//! One round per BFS layer. Each round, the current frontier is handed out
//! over a `crossbeam_channel` to a pool of worker threads, which look up
//! each id's outgoing links (through the shared [`LinkDatabase`] cache) and
//! report `(child, parent)` pairs back over a second channel -- mirroring
//! original_source's `searcher()` workers feeding a shared output queue.
//!
//! Where this departs from the original on purpose: the original's
//! `SynchronizedQueue` has no way to say "no more items are coming", so
//! `pathfind` drains it with a timeout and treats a quiet queue as
//! end-of-round. A `crossbeam_channel::Receiver` can actually observe
//! disconnection, so here the orchestrator drops its input sender once a
//! round's frontier has been sent, workers exit their receive loop when
//! `recv()` returns `Err` (channel empty and no senders left), and the
//! scope join is itself the round barrier. No timeout, no polling, and no
//! possibility of a round being cut short by an unlucky queue lull.
//!
//! The predecessor map (`parents`) is never touched by a worker thread --
//! only the orchestrator reads and writes it, between rounds. This is what
//! makes the per-round barrier sufficient for correctness: by the time the
//! orchestrator decides the next frontier, every discovery from the
//! current round has already been folded into `parents`, so no article can
//! be assigned a predecessor from a later, longer round.
//!
//! A database read failure (a corrupt or truncated `links.bin`) is fatal
//! per spec.md §7, so it cannot just be swallowed inside a worker. Workers
//! report it back to the orchestrator over a dedicated, capacity-1 "error"
//! channel: the first worker to hit an error sends it and stops; later
//! errors from other workers are dropped by the full-channel `try_send`,
//! since only the first one is reported anyway.

use std::collections::HashMap;
use std::thread;

use crossbeam_channel::{bounded, unbounded};

use crate::bag::Bag;
use crate::error::{Error, Result};
use crate::ids::ArticleId;
use crate::link_db::LinkDatabase;

pub const DEFAULT_THREADS: usize = 8;

/// Find the shortest sequence of links from `src` to `dst`, or `None` if
/// `dst` is unreachable from `src`. `src` and `dst` are expected to
/// already be redirect-resolved, live article ids. Returns `Err` if a
/// worker hits a database read error partway through.
pub fn pathfind(db: &LinkDatabase, src: ArticleId, dst: ArticleId, num_threads: usize) -> Result<Option<Vec<ArticleId>>> {
    if src == dst {
        return Ok(Some(vec![src]));
    }

    let num_threads = num_threads.max(1);
    // The predecessor map: written only by this thread, between rounds,
    // matching spec.md §5's "owned by the orchestrator thread only".
    let mut parents: HashMap<u32, u32> = HashMap::new();
    parents.insert(src.0, 0);
    let mut frontier = vec![src.0];

    let (err_tx, err_rx) = bounded::<Error>(1);

    while !frontier.is_empty() {
        let (tx_in, rx_in) = unbounded::<u32>();
        let (tx_out, rx_out) = unbounded::<(u32, u32)>();

        for &id in &frontier {
            tx_in.send(id).expect("receivers outlive this send");
        }
        drop(tx_in);

        thread::scope(|scope| {
            for _ in 0..num_threads {
                let rx_in = rx_in.clone();
                let tx_out = tx_out.clone();
                let err_tx = err_tx.clone();
                scope.spawn(move || {
                    while let Ok(id) = rx_in.recv() {
                        match db.links(ArticleId(id)) {
                            Ok(links) => {
                                for &child in links.iter() {
                                    let _ = tx_out.send((child, id));
                                }
                            }
                            Err(io_err) => {
                                let _ = err_tx.try_send(Error::from(io_err));
                                return;
                            }
                        }
                    }
                });
            }
            drop(tx_out);
        });

        if let Ok(err) = err_rx.try_recv() {
            return Err(err);
        }

        // Fold this round's discoveries into a bag before touching
        // `parents`: within one round several parents can discover the
        // same child, and the bag's first-writer-wins insert is exactly
        // the spec.md §3 "on collision the earlier parent wins" rule,
        // applied once per round instead of once per raw (child, parent)
        // message.
        let mut round = Bag::new();
        while let Ok((child, parent)) = rx_out.recv() {
            round.insert(child, parent);
        }

        let mut next_frontier = Vec::with_capacity(round.len());
        let mut reached_dst = false;
        for entry in round.extract() {
            if let std::collections::hash_map::Entry::Vacant(slot) = parents.entry(entry.key) {
                slot.insert(entry.parent);
                if entry.key == dst.0 {
                    reached_dst = true;
                }
                next_frontier.push(entry.key);
            }
        }

        if reached_dst {
            return Ok(Some(reconstruct(&parents, src, dst)));
        }

        frontier = next_frontier;
    }

    Ok(None)
}

fn reconstruct(parents: &HashMap<u32, u32>, src: ArticleId, dst: ArticleId) -> Vec<ArticleId> {
    let mut path = vec![dst];
    let mut current = dst.0;
    while current != src.0 {
        current = parents[&current];
        path.push(ArticleId(current));
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_db::write_links_table;
    use std::io::{Cursor, Write};

    fn make_links_file(adjacency: &[Vec<u32>]) -> std::path::PathBuf {
        let mut cur = Cursor::new(Vec::new());
        write_links_table(&mut cur, adjacency).unwrap();

        let path = std::env::temp_dir().join(format!("bfs_test_{:?}", thread::current().id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&cur.into_inner()).unwrap();
        path
    }

    // ids are 1-based; adjacency[i] is the outgoing links of id i + 1.

    #[test]
    fn finds_direct_link() {
        let path = make_links_file(&[vec![2], vec![]]);
        let db = LinkDatabase::open(&path).unwrap();
        let result = pathfind(&db, ArticleId(1), ArticleId(2), 2).unwrap();
        assert_eq!(result, Some(vec![ArticleId(1), ArticleId(2)]));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn finds_shortest_of_two_paths() {
        // 1 -> 2 -> 4, and 1 -> 3 -> (nothing). Shortest from 1 to 4 is via 2.
        let path = make_links_file(&[vec![2, 3], vec![4], vec![], vec![]]);
        let db = LinkDatabase::open(&path).unwrap();
        let result = pathfind(&db, ArticleId(1), ArticleId(4), 4).unwrap();
        assert_eq!(result, Some(vec![ArticleId(1), ArticleId(2), ArticleId(4)]));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unreachable_destination_is_none() {
        let path = make_links_file(&[vec![2], vec![], vec![]]);
        let db = LinkDatabase::open(&path).unwrap();
        let result = pathfind(&db, ArticleId(1), ArticleId(3), 2).unwrap();
        assert_eq!(result, None);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn same_source_and_destination_is_single_element_path() {
        let path = make_links_file(&[vec![2], vec![]]);
        let db = LinkDatabase::open(&path).unwrap();
        let result = pathfind(&db, ArticleId(1), ArticleId(1), 2).unwrap();
        assert_eq!(result, Some(vec![ArticleId(1)]));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn cycle_does_not_hang_or_revisit() {
        let path = make_links_file(&[vec![2], vec![1, 3], vec![1]]);
        let db = LinkDatabase::open(&path).unwrap();
        let result = pathfind(&db, ArticleId(1), ArticleId(3), 3).unwrap();
        assert_eq!(result, Some(vec![ArticleId(1), ArticleId(2), ArticleId(3)]));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn database_read_error_is_propagated() {
        let path = make_links_file(&[vec![2], vec![]]);
        let db = LinkDatabase::open(&path).unwrap();
        // Truncate to just the header after opening: `max_id` is already
        // cached, but every offset/record read now runs past EOF.
        let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(4).unwrap();

        let result = pathfind(&db, ArticleId(1), ArticleId(2), 2);
        assert!(result.is_err());
        std::fs::remove_file(&path).ok();
    }
}
