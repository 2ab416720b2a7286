// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::result;

#[derive(Debug)]
pub enum Error {
    /// A title could not be resolved to an article id.
    NotFound(String),

    /// An index file is missing or could not be opened.
    IndexUnreadable(PathBuf, io::Error),

    /// A record in an index file violates its on-disk layout, e.g. a child
    /// offset that points outside the file, or a short read where a fixed
    /// record was expected.
    Malformed(&'static str),

    /// Error in a config value (environment variable or config file line).
    InvalidConfig(&'static str, &'static str),

    /// Plain IO error, not tied to a specific index file.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound(title) => write!(f, "no article titled '{}'", title),
            Error::IndexUnreadable(path, err) => {
                write!(f, "failed to read index file {}: {}", path.to_string_lossy(), err)
            }
            Error::Malformed(msg) => write!(f, "malformed index record: {}", msg),
            Error::InvalidConfig(key, msg) => write!(f, "invalid value for {}: {}", key, msg),
            Error::Io(err) => write!(f, "{}", err),
        }
    }
}

// TODO: Implement std::error::Error once the variants have settled; for now
// Display plus Debug is enough for the two CLI binaries that surface errors.

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

pub type Result<T> = result::Result<T, Error>;
