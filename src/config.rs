// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Runtime configuration for the `search` binary, read from environment
//! variables rather than a config file: the pathfinder has exactly three
//! knobs and no long-running daemon state to reload, so a file format
//! would be overhead a few `env::var` calls don't need.

use std::path::PathBuf;

use crate::error::{Error, Result};

pub struct Config {
    /// Directory containing `name_id.bin`, `id_name.bin`, `redirects.bin`
    /// and `links.bin`. Defaults to the current directory.
    pub index_dir: PathBuf,

    /// Number of BFS worker threads per round. Defaults to the number of
    /// available CPUs.
    pub threads: usize,

    /// Whether to run the background prefetcher while resolving names and
    /// waiting on the BFS. Defaults to on.
    pub prefetch: bool,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let index_dir = match std::env::var("WIKILINKS_INDEX_DIR") {
            Ok(value) => PathBuf::from(value),
            Err(std::env::VarError::NotPresent) => PathBuf::from("."),
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(Error::InvalidConfig("WIKILINKS_INDEX_DIR", "value is not valid UTF-8"))
            }
        };

        let threads = match std::env::var("WIKILINKS_THREADS") {
            Ok(value) => value
                .parse::<usize>()
                .map_err(|_| Error::InvalidConfig("WIKILINKS_THREADS", "expected a positive integer"))
                .and_then(|n| {
                    if n == 0 {
                        Err(Error::InvalidConfig("WIKILINKS_THREADS", "must be at least 1"))
                    } else {
                        Ok(n)
                    }
                })?,
            Err(std::env::VarError::NotPresent) => num_cpus::get(),
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(Error::InvalidConfig("WIKILINKS_THREADS", "value is not valid UTF-8"))
            }
        };

        let prefetch = match std::env::var("WIKILINKS_PREFETCH") {
            Ok(value) => match value.as_str() {
                "1" => true,
                "0" => false,
                _ => return Err(Error::InvalidConfig("WIKILINKS_PREFETCH", "expected '0' or '1'")),
            },
            Err(std::env::VarError::NotPresent) => true,
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(Error::InvalidConfig("WIKILINKS_PREFETCH", "value is not valid UTF-8"))
            }
        };

        Ok(Config { index_dir, threads, prefetch })
    }

    pub fn name_tree_path(&self) -> PathBuf {
        self.index_dir.join("name_id.bin")
    }

    pub fn id_name_path(&self) -> PathBuf {
        self.index_dir.join("id_name.bin")
    }

    pub fn redirects_path(&self) -> PathBuf {
        self.index_dir.join("redirects.bin")
    }

    pub fn links_path(&self) -> PathBuf {
        self.index_dir.join("links.bin")
    }
}
