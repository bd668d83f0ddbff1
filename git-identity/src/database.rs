// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ingestion of signatures from a commit database.
//!
//! The database is a SQLite file holding a gitbase-style `commits` table:
//!
//! | column                | content                         |
//! |-----------------------|---------------------------------|
//! | `repository_id`       | the repository name             |
//! | `commit_hash`         | the commit hash                 |
//! | `commit_author_name`  | the raw author name             |
//! | `commit_author_email` | the raw author email            |
//! | `commit_author_when`  | the author time, RFC 3339       |
//!
//! Only commits listed in a hash file, one hash per line, are ingested.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use chrono::DateTime;
use rusqlite::{params, types::Value, vtab::array, Connection, OpenFlags};
use thiserror::Error;

use crate::{interrupt::Interrupt, normalize, signature::Signature};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS commits (
    repository_id       TEXT NOT NULL,
    commit_hash         TEXT NOT NULL,
    commit_author_name  TEXT NOT NULL,
    commit_author_email TEXT NOT NULL,
    commit_author_when  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS commits_hash ON commits (commit_hash);
";

// `?1` is the `rarray` of wanted hashes. Times are ordered by instant, not by
// their text.
const SELECT_SIGNATURES: &str = "
SELECT repository_id, commit_author_name, commit_author_email, commit_hash, commit_author_when
FROM commits
WHERE commit_hash IN rarray(?1)
GROUP BY repository_id, commit_author_name, commit_author_email, commit_hash, commit_author_when
ORDER BY repository_id, unixepoch(commit_author_when, 'subsec'), commit_hash
";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to open commit database {endpoint:?}")]
    Open {
        endpoint: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to query commit database {endpoint:?}")]
    Query {
        endpoint: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to read commit hashes from {path:?}")]
    HashFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid author time {time:?} of commit {hash} in {endpoint:?}")]
    Time {
        endpoint: PathBuf,
        hash: String,
        time: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("invalid author name of commit {hash} in {endpoint:?}")]
    Name {
        endpoint: PathBuf,
        hash: String,
        #[source]
        source: normalize::Error,
    },
    #[error("reading {endpoint:?} was interrupted")]
    Interrupted { endpoint: PathBuf },
}

/// A connection to a commit database.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    endpoint: PathBuf,
}

impl Database {
    /// Open the existing database at `endpoint`, read-only.
    pub fn open(endpoint: impl AsRef<Path>) -> Result<Self, Error> {
        let endpoint = endpoint.as_ref();
        let open_err = |source| Error::Open {
            endpoint: endpoint.to_path_buf(),
            source,
        };
        let conn = Connection::open_with_flags(
            endpoint,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(open_err)?;
        array::load_module(&conn).map_err(open_err)?;
        Ok(Self {
            conn,
            endpoint: endpoint.to_path_buf(),
        })
    }

    /// Open the database at `endpoint` for writing, creating it and its schema
    /// if needed.
    pub fn create(endpoint: impl AsRef<Path>) -> Result<Self, Error> {
        let endpoint = endpoint.as_ref();
        let open_err = |source| Error::Open {
            endpoint: endpoint.to_path_buf(),
            source,
        };
        let conn = Connection::open_with_flags(
            endpoint,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(open_err)?;
        conn.execute_batch(SCHEMA).map_err(open_err)?;
        array::load_module(&conn).map_err(open_err)?;
        Ok(Self {
            conn,
            endpoint: endpoint.to_path_buf(),
        })
    }

    pub fn endpoint(&self) -> &Path {
        &self.endpoint
    }

    /// Record the raw `signatures` as commits.
    pub fn insert(&mut self, signatures: &[Signature]) -> Result<(), Error> {
        let query_err = |source| Error::Query {
            endpoint: self.endpoint.clone(),
            source,
        };
        let tx = self.conn.transaction().map_err(query_err)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO commits (
                        repository_id, commit_hash, commit_author_name,
                        commit_author_email, commit_author_when
                     ) VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(query_err)?;
            for s in signatures {
                stmt.execute(params![s.repo, s.hash, s.name, s.email, s.rfc3339()])
                    .map_err(query_err)?;
            }
        }
        tx.commit().map_err(query_err)
    }

    /// The signatures of the commits in `hashes`, with names and emails as
    /// stored, ordered by repository, author time, and hash. Identical rows
    /// are returned once.
    ///
    /// # Errors
    ///
    /// * [`Error::Interrupted`] once `interrupt` fires.
    #[tracing::instrument(skip(self, hashes, interrupt), fields(endpoint = ?self.endpoint, hashes = hashes.len()))]
    pub fn raw_signatures(
        &self,
        hashes: &BTreeSet<String>,
        interrupt: &Interrupt,
    ) -> Result<Vec<Signature>, Error> {
        let query_err = |source| Error::Query {
            endpoint: self.endpoint.clone(),
            source,
        };
        let wanted = Rc::new(hashes.iter().cloned().map(Value::from).collect::<Vec<_>>());
        let mut stmt = self.conn.prepare(SELECT_SIGNATURES).map_err(query_err)?;
        let mut rows = stmt.query(params![wanted]).map_err(query_err)?;

        let mut signatures = Vec::new();
        while let Some(row) = rows.next().map_err(query_err)? {
            if interrupt.is_interrupted() {
                return Err(Error::Interrupted {
                    endpoint: self.endpoint.clone(),
                });
            }
            let hash: String = row.get(3).map_err(query_err)?;
            let time: String = row.get(4).map_err(query_err)?;
            let time = DateTime::parse_from_rfc3339(&time).map_err(|source| Error::Time {
                endpoint: self.endpoint.clone(),
                hash: hash.clone(),
                time: time.clone(),
                source,
            })?;
            signatures.push(Signature {
                repo: row.get(0).map_err(query_err)?,
                name: row.get(1).map_err(query_err)?,
                email: row.get(2).map_err(query_err)?,
                hash,
                time,
            });
        }

        tracing::info!(signatures = signatures.len(), "fetched signatures");
        Ok(signatures)
    }

    /// [`Database::raw_signatures`], with names and emails normalized.
    pub fn signatures(
        &self,
        hashes: &BTreeSet<String>,
        interrupt: &Interrupt,
    ) -> Result<Vec<Signature>, Error> {
        self.raw_signatures(hashes, interrupt)?
            .into_iter()
            .map(|signature| {
                let hash = signature.hash.clone();
                signature.normalized().map_err(|source| Error::Name {
                    endpoint: self.endpoint.clone(),
                    hash,
                    source,
                })
            })
            .collect()
    }
}

/// Read the commit hashes listed in `path`, one per line. Blank lines are
/// skipped and surrounding whitespace is ignored.
pub fn read_hashes(path: &Path) -> Result<BTreeSet<String>, Error> {
    let content = fs::read_to_string(path).map_err(|source| Error::HashFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect())
}

/// Fetch the normalized signatures of the commits listed in `hash_file` from
/// the database at `endpoint`.
pub fn fetch_signatures(
    endpoint: &Path,
    hash_file: &Path,
    interrupt: &Interrupt,
) -> Result<Vec<Signature>, Error> {
    let hashes = read_hashes(hash_file)?;
    Database::open(endpoint)?.signatures(&hashes, interrupt)
}
