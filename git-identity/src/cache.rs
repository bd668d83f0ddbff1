// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The on-disk cache of raw signatures.
//!
//! The cache is a CSV file with the header `repo,name,email,hash,time` and
//! one row per signature, in ingestion order. Names and emails are written as
//! they were found, the time as an RFC 3339 timestamp. Fields are quoted when
//! they need to be. [`read`] normalizes names and emails, [`read_raw`] keeps
//! them as written.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{normalize, signature::Signature};

/// The columns of the cache, in order.
pub const HEADER: [&str; 5] = ["repo", "name", "email", "hash", "time"];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to open signature cache {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to write signature cache {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to read line {line} of signature cache {path:?}")]
    Read {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("signature cache {path:?} has header {found:?}, expected repo,name,email,hash,time")]
    Header { path: PathBuf, found: Vec<String> },
    #[error("invalid time {time:?} on line {line} of signature cache {path:?}")]
    Time {
        path: PathBuf,
        line: u64,
        time: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("invalid name on line {line} of signature cache {path:?}")]
    Name {
        path: PathBuf,
        line: u64,
        #[source]
        source: normalize::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    repo: String,
    name: String,
    email: String,
    hash: String,
    time: String,
}

impl From<&Signature> for Row {
    fn from(s: &Signature) -> Self {
        Self {
            repo: s.repo.clone(),
            name: s.name.clone(),
            email: s.email.clone(),
            hash: s.hash.clone(),
            time: s.rfc3339(),
        }
    }
}

/// Write `signatures` to the cache at `path`, replacing any previous content.
#[tracing::instrument(skip(signatures), fields(signatures = signatures.len()))]
pub fn write(path: &Path, signatures: &[Signature]) -> Result<(), Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    writer.write_record(HEADER).map_err(write_err)?;
    for signature in signatures {
        writer.serialize(Row::from(signature)).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|err| write_err(csv::Error::from(err)))?;

    tracing::debug!("wrote signature cache");
    Ok(())
}

/// Read the signatures cached at `path`, with names and emails as they were
/// written.
#[tracing::instrument]
pub fn read_raw(path: &Path) -> Result<Vec<Signature>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .from_path(path)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            line: 1,
            source,
        })?
        .clone();
    if headers.iter().ne(HEADER) {
        return Err(Error::Header {
            path: path.to_path_buf(),
            found: headers.iter().map(ToOwned::to_owned).collect(),
        });
    }

    let mut signatures = Vec::new();
    for (line, row) in lines().zip(reader.deserialize::<Row>()) {
        let row = row.map_err(|source| Error::Read {
            path: path.to_path_buf(),
            line,
            source,
        })?;
        let time = DateTime::parse_from_rfc3339(&row.time).map_err(|source| Error::Time {
            path: path.to_path_buf(),
            line,
            time: row.time.clone(),
            source,
        })?;
        signatures.push(Signature {
            repo: row.repo,
            name: row.name,
            email: row.email,
            hash: row.hash,
            time,
        });
    }

    tracing::debug!(signatures = signatures.len(), "read signature cache");
    Ok(signatures)
}

/// [`read_raw`], with names and emails normalized.
pub fn read(path: &Path) -> Result<Vec<Signature>, Error> {
    lines()
        .zip(read_raw(path)?)
        .map(|(line, signature)| {
            signature.normalized().map_err(|source| Error::Name {
                path: path.to_path_buf(),
                line,
                source,
            })
        })
        .collect()
}

// Line numbers of the rows, after the header.
fn lines() -> std::ops::RangeFrom<u64> {
    2..
}
