// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! `search <source-title> <dest-title>`: resolves two titles to article
//! ids, runs the parallel BFS over the link graph, and prints the
//! resulting path as `A -> B -> C` (spec.md §6).

use std::process;

use wikilinks_path::config::Config;
use wikilinks_path::orchestrator::find_path;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (source, dest) = match (args.next(), args.next()) {
        (Some(s), Some(d)) => (s, d),
        _ => {
            eprintln!("Usage: search <source-title> <dest-title>");
            process::exit(1);
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("search: {}", err);
            process::exit(1);
        }
    };

    match find_path(&config, &source, &dest) {
        Ok(Some(titles)) => {
            println!("{}", titles.join(" -> "));
        }
        Ok(None) => {
            println!("no path");
        }
        Err(err) => {
            eprintln!("search: {}", err);
            process::exit(1);
        }
    }
}
