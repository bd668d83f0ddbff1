// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::normalize::{self, clean_email, clean_name};

/// A raw observation of an author in commit history.
///
/// A `Signature` is never mutated. Ingestion hands out normalized copies, see
/// [`Signature::normalized`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// The repository the commit was found in.
    pub repo: String,
    /// The author's display name.
    pub name: String,
    /// The author's email.
    pub email: String,
    /// The commit hash.
    pub hash: String,
    /// When the commit was authored, in the author's timezone.
    pub time: DateTime<FixedOffset>,
}

impl Signature {
    /// Return this signature with its name and email normalized.
    ///
    /// # Errors
    ///
    /// * [`normalize::Error::EmptyName`]
    pub fn normalized(self) -> Result<Self, normalize::Error> {
        Ok(Self {
            name: clean_name(&self.name)?,
            email: clean_email(&self.email),
            ..self
        })
    }

    /// The authoring time as an RFC 3339 timestamp, e.g.
    /// `2020-01-30T10:00:00+02:00`. UTC is written as `Z`.
    pub fn rfc3339(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {}@{} {}",
            self.name,
            self.email,
            self.repo,
            self.hash,
            self.rfc3339()
        )
    }
}
