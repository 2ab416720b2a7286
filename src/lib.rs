// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Library backing the `search` and `indexer` binaries.
//!
//! `search` resolves two article titles to ids (`name_tree`, `redirects`),
//! runs a parallel breadth-first search over the link graph (`bfs`, backed
//! by the concurrent adjacency cache in `link_db` and the frontier `bag`),
//! and translates the resulting id path back to titles (`id_name`).
//! `indexer` produces the four binary index files those readers consume
//! from a MediaWiki XML dump.

pub mod bag;
pub mod bfs;
pub mod byteio;
pub mod config;
pub mod error;
pub mod id_name;
pub mod ids;
pub mod indexer;
pub mod link_db;
pub mod name_tree;
pub mod orchestrator;
pub mod redirects;
