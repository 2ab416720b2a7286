// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Fixed-width big-endian integer I/O on arbitrary readers and writers.
//!
//! All on-disk integers in the index files are big-endian, independent of
//! the host's native byte order (spec.md §4.1). These are free functions
//! rather than a trait, because every call site already has a concrete
//! `File` or `Cursor` and there is no polymorphism to gain from an
//! intermediate trait.

use std::io::{self, Read, Write};

pub fn read_u16<R: Read>(r: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

pub fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

pub fn read_u64<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

pub fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read exactly `len` bytes and interpret them as UTF-8, replacing invalid
/// sequences the same way `String::from_utf8_lossy` would. Titles in the
/// index are written as raw UTF-8 bytes with no terminator (spec.md §4.2).
pub fn read_string<R: Read>(r: &mut R, len: usize) -> io::Result<String> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_u16<W: Write>(w: &mut W, value: u16) -> io::Result<()> {
    w.write_all(&value.to_be_bytes())
}

pub fn write_u32<W: Write>(w: &mut W, value: u32) -> io::Result<()> {
    w.write_all(&value.to_be_bytes())
}

pub fn write_u64<W: Write>(w: &mut W, value: u64) -> io::Result<()> {
    w.write_all(&value.to_be_bytes())
}

pub fn write_u8<W: Write>(w: &mut W, value: u8) -> io::Result<()> {
    w.write_all(&[value])
}
