// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! `indexer <dump-path>`: reads a MediaWiki XML dump (optionally
//! bzip2-compressed) and writes `name_id.bin`, `id_name.bin`, `links.bin`
//! and `redirects.bin` into the current directory (spec.md §6).

use std::path::{Path, PathBuf};
use std::process;

use wikilinks_path::indexer::build_index;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let dump_path = match args.next() {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Usage: indexer <dump-path>");
            process::exit(1);
        }
    };

    match build_index(&dump_path, Path::new(".")) {
        Ok(stats) => {
            println!("indexed {} pages ({} redirects)", stats.pages, stats.redirects);
        }
        Err(err) => {
            eprintln!("indexer: {}", err);
            process::exit(2);
        }
    }
}
