// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ingestion of signatures straight from local git repositories.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

use crate::{interrupt::Interrupt, normalize, signature::Signature};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to read repository {path:?}")]
    Git {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },
    #[error("author time of commit {hash} in {path:?} is out of range")]
    Time { path: PathBuf, hash: String },
    #[error("invalid author name of commit {hash} in {path:?}")]
    Name {
        path: PathBuf,
        hash: String,
        #[source]
        source: normalize::Error,
    },
    #[error("reading {path:?} was interrupted")]
    Interrupted { path: PathBuf },
}

fn is_unborn_err(e: &git2::Error) -> bool {
    e.code() == git2::ErrorCode::UnbornBranch
}

/// The author signatures of the history of `HEAD` in the repository at
/// `path`, tagged with `repo`. Names and emails are kept as found, see
/// [`signatures`] for normalized ones.
///
/// Commits are visited oldest first, parents before children, so that the
/// result is stable for a given history. A repository without commits yields
/// no signatures.
#[tracing::instrument(skip(interrupt))]
pub fn raw_signatures(
    path: &Path,
    repo: &str,
    interrupt: &Interrupt,
) -> Result<Vec<Signature>, Error> {
    let git_err = |source| Error::Git {
        path: path.to_path_buf(),
        source,
    };
    let repository = git2::Repository::open(path).map_err(git_err)?;
    match repository.head() {
        Ok(_) => {},
        Err(e) if is_unborn_err(&e) => {
            tracing::warn!("repository has no commits");
            return Ok(vec![]);
        },
        Err(e) => return Err(git_err(e)),
    }
    let mut revwalk = repository.revwalk().map_err(git_err)?;
    revwalk
        .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME | git2::Sort::REVERSE)
        .map_err(git_err)?;
    revwalk.push_head().map_err(git_err)?;

    let mut signatures = Vec::new();
    for oid in revwalk {
        if interrupt.is_interrupted() {
            return Err(Error::Interrupted {
                path: path.to_path_buf(),
            });
        }
        let oid = oid.map_err(git_err)?;
        let commit = repository.find_commit(oid).map_err(git_err)?;
        let author = commit.author();
        let hash = oid.to_string();
        let time = time(author.when()).ok_or_else(|| Error::Time {
            path: path.to_path_buf(),
            hash: hash.clone(),
        })?;
        signatures.push(Signature {
            repo: repo.to_owned(),
            name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
            email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
            hash,
            time,
        });
    }

    tracing::info!(signatures = signatures.len(), "walked repository history");
    Ok(signatures)
}

/// [`raw_signatures`], with names and emails normalized.
pub fn signatures(
    path: &Path,
    repo: &str,
    interrupt: &Interrupt,
) -> Result<Vec<Signature>, Error> {
    raw_signatures(path, repo, interrupt)?
        .into_iter()
        .map(|signature| {
            let hash = signature.hash.clone();
            signature.normalized().map_err(|source| Error::Name {
                path: path.to_path_buf(),
                hash,
                source,
            })
        })
        .collect()
}

fn time(when: git2::Time) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(when.offset_minutes().checked_mul(60)?)?;
    DateTime::<Utc>::from_timestamp(when.seconds(), 0).map(|utc| utc.with_timezone(&offset))
}
