// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Putting ingestion, the registry, and the statistics together.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::Utc;

use crate::{
    blacklist::Filter,
    cache,
    config::Config,
    database::{self, Database},
    freq::{self, Stats},
    git,
    interrupt::Interrupt,
    people::People,
    signature::Signature,
    Error,
};

/// Where signatures are ingested from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// A commit database, restricted to the commits listed in `hashes`.
    Database { endpoint: PathBuf, hashes: PathBuf },
    /// Local repositories, keyed by the name their signatures are tagged
    /// with. They are walked in the order of their names.
    Repositories(BTreeMap<String, PathBuf>),
}

impl Source {
    /// Fetch the raw signatures, with names and emails as found.
    pub fn fetch(&self, interrupt: &Interrupt) -> Result<Vec<Signature>, Error> {
        match self {
            Self::Database { endpoint, hashes } => {
                let hashes = database::read_hashes(hashes)?;
                Ok(Database::open(endpoint)?.raw_signatures(&hashes, interrupt)?)
            },
            Self::Repositories(repos) => {
                let mut signatures = Vec::new();
                for (name, path) in repos {
                    signatures.extend(git::raw_signatures(path, name, interrupt)?);
                }
                Ok(signatures)
            },
        }
    }
}

/// The outcome of [`resolve_people`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolved {
    /// One person per accepted signature, not merged yet.
    pub people: People,
    /// Name and email frequencies over all ingested signatures.
    pub stats: Stats,
}

/// The raw signatures of `source`, with names and emails as found.
///
/// If `cache` names an existing file, the signatures are read from it instead
/// and `source` is not touched. Otherwise the signatures fetched from `source`
/// are written to `cache`, when given.
pub fn find_raw_signatures(
    source: &Source,
    cache: Option<&Path>,
    interrupt: &Interrupt,
) -> Result<Vec<Signature>, Error> {
    if let Some(cache) = cache.filter(|cache| cache.is_file()) {
        tracing::debug!(?cache, "reading signatures from cache");
        return Ok(cache::read_raw(cache)?);
    }

    let signatures = source.fetch(interrupt)?;
    if let Some(cache) = cache {
        cache::write(cache, &signatures)?;
    }
    Ok(signatures)
}

/// [`find_raw_signatures`], with names and emails normalized.
pub fn find_signatures(
    source: &Source,
    cache: Option<&Path>,
    interrupt: &Interrupt,
) -> Result<Vec<Signature>, Error> {
    Ok(find_raw_signatures(source, cache, interrupt)?
        .into_iter()
        .map(Signature::normalized)
        .collect::<Result<_, _>>()?)
}

/// Ingest the signatures of `source`, through `cache`, and create the people
/// accepted by `filter` along with the statistics of the last `window_months`
/// months.
#[tracing::instrument(skip(filter, interrupt))]
pub fn resolve_people<F>(
    source: &Source,
    cache: Option<&Path>,
    filter: &F,
    window_months: u32,
    interrupt: &Interrupt,
) -> Result<Resolved, Error>
where
    F: Filter + ?Sized,
{
    // `People::new` and `freq::stats` normalize, so these must stay raw.
    let signatures = find_raw_signatures(source, cache, interrupt)?;
    let people = People::new(&signatures, filter)?;
    let stats = freq::stats(&signatures, freq::cutoff(Utc::now(), window_months))?;
    tracing::info!(
        signatures = signatures.len(),
        people = people.len(),
        "resolved people"
    );
    Ok(Resolved { people, stats })
}

/// [`resolve_people`] with the cache, blacklist, and window of `config`.
pub fn resolve_configured(
    source: &Source,
    config: &Config,
    interrupt: &Interrupt,
) -> Result<Resolved, Error> {
    resolve_people(
        source,
        config.cache.as_deref(),
        &config.blacklist,
        config.window_months,
        interrupt,
    )
}
