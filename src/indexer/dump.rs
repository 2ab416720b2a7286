// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Opens a Wikipedia XML dump, transparently decompressing it if it is
//! bzip2-compressed (the format dumps are actually distributed in).

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use bzip2_rs::DecoderReader;

/// Open `path` for streaming read, decompressing with a pure-Rust bzip2
/// decoder when the file name ends in `.bz2`. Using `bzip2-rs` instead of
/// a binding to libbzip2 keeps the indexer free of a C build dependency,
/// matching how the rest of this crate avoids linking against anything
/// that isn't itself a Rust crate.
pub fn open_dump(path: &Path) -> io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let is_bz2 = path.extension().map(|ext| ext == "bz2").unwrap_or(false);

    if is_bz2 {
        Ok(Box::new(BufReader::new(DecoderReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
