// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration, kept in a file in [git config][config] format.
//!
//! ```text
//! [identity]
//!     windowMonths = 12
//!     cache = /var/cache/identity/signatures.csv
//! [blacklist]
//!     name = admin
//!     email = noreply@example.com
//!     domain = localhost.localdomain
//! ```
//!
//! Every key is optional. `blacklist.*` keys may be repeated.
//!
//! [config]: https://git-scm.com/docs/git-config

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{blacklist::Blacklist, normalize};

const CONFIG_WINDOW_MONTHS: &str = "identity.windowMonths";
const CONFIG_CACHE: &str = "identity.cache";
const CONFIG_BLACKLIST_NAME: &str = "blacklist.name";
const CONFIG_BLACKLIST_EMAIL: &str = "blacklist.email";
const CONFIG_BLACKLIST_DOMAIN: &str = "blacklist.domain";

/// The recent window used when none is configured.
pub const DEFAULT_WINDOW_MONTHS: u32 = 12;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to read config {path:?}")]
    Git {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },
    #[error("'{key}' must be a non-negative number of months, found {value}")]
    WindowMonths { key: &'static str, value: i64 },
    #[error("blacklisted name {name:?} in {path:?} is empty once normalized")]
    Name {
        path: PathBuf,
        name: String,
        #[source]
        source: normalize::Error,
    },
}

fn is_not_found_err(e: &git2::Error) -> bool {
    e.code() == git2::ErrorCode::NotFound
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// How many months back a use still counts as recent.
    pub window_months: u32,
    /// Where raw signatures are cached between runs.
    pub cache: Option<PathBuf>,
    pub blacklist: Blacklist,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_months: DEFAULT_WINDOW_MONTHS,
            cache: None,
            blacklist: Blacklist::default(),
        }
    }
}

impl Config {
    /// Read the config file at `path`.
    #[tracing::instrument]
    pub fn open(path: &Path) -> Result<Self, Error> {
        let git_err = |source| Error::Git {
            path: path.to_path_buf(),
            source,
        };
        let config = git2::Config::open(path).map_err(git_err)?;

        let window_months = match config.get_i64(CONFIG_WINDOW_MONTHS) {
            Ok(value) => u32::try_from(value).map_err(|_| Error::WindowMonths {
                key: CONFIG_WINDOW_MONTHS,
                value,
            })?,
            Err(e) if is_not_found_err(&e) => DEFAULT_WINDOW_MONTHS,
            Err(e) => return Err(git_err(e)),
        };
        let cache = match config.get_path(CONFIG_CACHE) {
            Ok(cache) => Some(cache),
            Err(e) if is_not_found_err(&e) => None,
            Err(e) => return Err(git_err(e)),
        };

        let mut blacklist = Blacklist::new();
        for name in multivar(&config, CONFIG_BLACKLIST_NAME).map_err(git_err)? {
            blacklist
                .exclude_name(&name)
                .map_err(|source| Error::Name {
                    path: path.to_path_buf(),
                    name: name.clone(),
                    source,
                })?;
        }
        for email in multivar(&config, CONFIG_BLACKLIST_EMAIL).map_err(git_err)? {
            blacklist.exclude_email(&email);
        }
        for domain in multivar(&config, CONFIG_BLACKLIST_DOMAIN).map_err(git_err)? {
            blacklist.exclude_domain(&domain);
        }

        Ok(Self {
            window_months,
            cache,
            blacklist,
        })
    }
}

fn multivar(config: &git2::Config, key: &str) -> Result<Vec<String>, git2::Error> {
    let mut values = Vec::new();
    let mut entries = match config.multivar(key, None) {
        Ok(entries) => entries,
        Err(e) if is_not_found_err(&e) => return Ok(values),
        Err(e) => return Err(e),
    };
    while let Some(entry) = entries.next() {
        if let Some(value) = entry?.value() {
            values.push(value.to_owned());
        }
    }
    Ok(values)
}
