// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Definition for a crate level error type, which wraps up module level
//! error types transparently.

use crate::{cache, config, database, git, normalize, people, store};
use thiserror::Error;

/// The crate level error type that wraps up module level error types.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Cache(#[from] cache::Error),
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error(transparent)]
    Database(#[from] database::Error),
    #[error(transparent)]
    Git(#[from] git::Error),
    #[error(transparent)]
    Merge(#[from] people::error::Merge),
    #[error(transparent)]
    NotFound(#[from] people::error::NotFound),
    #[error(transparent)]
    Store(#[from] store::Error),
    #[error(transparent)]
    Validation(#[from] normalize::Error),
}
