// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Column-oriented persistence of resolved [`People`].
//!
//! The store is a JSON document with one array per column, indexed by row:
//!
//! ```text
//! {
//!   "provider": "github",
//!   "id": [1, 3],
//!   "names": [[{"name": "bob", "repo": ""}], [{"name": "alice", "repo": ""}]],
//!   "emails": [["bob@example.com"], ["alice@example.com"]],
//!   "external_id": ["bob", null],
//!   "sample_commit": [null, {"hash": "ccc", "repo": "repo1"}]
//! }
//! ```
//!
//! `provider` labels the identity provider that issued every `external_id` in
//! the document. It is empty when no provider was involved.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    people::People,
    person::{Commit, NameWithRepo, Person, PersonId},
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to access people store {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode people store {path:?}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("people store {path:?} does not match the expected schema")]
    Schema {
        path: PathBuf,
        #[source]
        source: Schema,
    },
}

/// Ways in which a store document can be malformed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Schema {
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error("column {column} has {found} rows, expected {expected}")]
    Length {
        column: &'static str,
        found: usize,
        expected: usize,
    },
    #[error("person {0} appears more than once")]
    Duplicate(PersonId),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Columns {
    provider: String,
    id: Vec<PersonId>,
    names: Vec<Vec<NameWithRepo>>,
    emails: Vec<Vec<String>>,
    external_id: Vec<Option<String>>,
    sample_commit: Vec<Option<Commit>>,
}

impl Columns {
    fn new(people: &People, provider: &str) -> Self {
        let mut columns = Self {
            provider: provider.to_owned(),
            ..Self::default()
        };
        for person in people {
            columns.id.push(person.id);
            columns.names.push(person.names_with_repos.clone());
            columns.emails.push(person.emails.clone());
            columns.external_id.push(person.external_id.clone());
            columns.sample_commit.push(person.sample_commit.clone());
        }
        columns
    }

    fn check(&self) -> Result<(), Schema> {
        let expected = self.id.len();
        for (column, found) in [
            ("names", self.names.len()),
            ("emails", self.emails.len()),
            ("external_id", self.external_id.len()),
            ("sample_commit", self.sample_commit.len()),
        ] {
            if found != expected {
                return Err(Schema::Length {
                    column,
                    found,
                    expected,
                });
            }
        }
        Ok(())
    }

    fn into_people(self) -> Result<(People, String), Schema> {
        self.check()?;
        let rows = self
            .id
            .into_iter()
            .zip(self.names)
            .zip(self.emails)
            .zip(self.external_id)
            .zip(self.sample_commit)
            .map(
                |((((id, names_with_repos), emails), external_id), sample_commit)| Person {
                    id,
                    names_with_repos,
                    emails,
                    sample_commit,
                    external_id,
                },
            );
        let people = People::from_people(rows).map_err(Schema::Duplicate)?;
        Ok((people, self.provider))
    }
}

/// Write `people` to `path`, labelling their external identifiers as issued
/// by `provider`.
#[tracing::instrument(skip(people), fields(people = people.len()))]
pub fn write(path: &Path, people: &People, provider: &str) -> Result<(), Error> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer(&mut writer, &Columns::new(people, provider)).map_err(|source| {
        Error::Encode {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(io_err)?;
    tracing::debug!("wrote people store");
    Ok(())
}

/// Read the people stored at `path`, along with the provider label.
#[tracing::instrument]
pub fn read(path: &Path) -> Result<(People, String), Error> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let schema_err = |source| Error::Schema {
        path: path.to_path_buf(),
        source,
    };
    let columns: Columns =
        serde_json::from_reader(BufReader::new(file)).map_err(|err| {
            if err.is_io() {
                Error::Io {
                    path: path.to_path_buf(),
                    source: err.into(),
                }
            } else {
                schema_err(Schema::Decode(err))
            }
        })?;
    let (people, provider) = columns.into_people().map_err(schema_err)?;
    tracing::debug!(people = people.len(), %provider, "read people store");
    Ok((people, provider))
}
