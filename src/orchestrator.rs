// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `search` binary's entry point, kept in the library so integration
//! tests can drive it directly against synthetic index files instead of
//! spawning a subprocess (spec.md §2's "top-level orchestrator" component,
//! §6's `search` CLI).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::bfs::pathfind;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::id_name::IdNameTable;
use crate::ids::normalize_title;
use crate::link_db::{spawn_prefetcher, LinkDatabase};
use crate::name_tree::NameTree;
use crate::redirects::RedirectTable;

/// Resolve `source` and `dest` against the index files named by `config`,
/// run the BFS, and translate the resulting id path back to titles.
///
/// `Ok(None)` means the destination is unreachable from the source, which
/// spec.md §7 treats as a reportable outcome rather than an error (exit 0,
/// not exit 1). `Err(Error::NotFound(_))` means one of the two titles has
/// no entry in `name_id.bin`.
pub fn find_path(config: &Config, source: &str, dest: &str) -> Result<Option<Vec<String>>> {
    let mut name_tree =
        NameTree::open(&config.name_tree_path()).map_err(|e| Error::IndexUnreadable(config.name_tree_path(), e))?;
    let mut redirects =
        RedirectTable::open(&config.redirects_path()).map_err(|e| Error::IndexUnreadable(config.redirects_path(), e))?;
    let mut id_name =
        IdNameTable::open(&config.id_name_path()).map_err(|e| Error::IndexUnreadable(config.id_name_path(), e))?;
    let link_db = Arc::new(
        LinkDatabase::open(&config.links_path()).map_err(|e| Error::IndexUnreadable(config.links_path(), e))?,
    );

    let src_raw = name_tree.lookup(&normalize_title(source))?;
    if !src_raw.is_valid() {
        return Err(Error::NotFound(source.to_string()));
    }
    let dst_raw = name_tree.lookup(&normalize_title(dest))?;
    if !dst_raw.is_valid() {
        return Err(Error::NotFound(dest.to_string()));
    }

    let src = redirects.resolve(src_raw)?;
    let dst = redirects.resolve(dst_raw)?;

    // The prefetcher races the BFS to warm the adjacency cache; either can
    // win for any given id, and neither outcome affects correctness
    // (spec.md §4.5: "pathfinding correctness must not depend on it").
    let stop = Arc::new(AtomicBool::new(false));
    let prefetcher = if config.prefetch { Some(spawn_prefetcher(Arc::clone(&link_db), Arc::clone(&stop))) } else { None };

    let path_ids = pathfind(&link_db, src, dst, config.threads);

    stop.store(true, Ordering::Relaxed);
    if let Some(handle) = prefetcher {
        let _ = handle.join();
    }

    match path_ids? {
        Some(ids) => {
            let mut titles = Vec::with_capacity(ids.len());
            for id in ids {
                titles.push(id_name.lookup(id)?.unwrap_or_else(|| format!("<{}>", id.0)));
            }
            Ok(Some(titles))
        }
        None => Ok(None),
    }
}
