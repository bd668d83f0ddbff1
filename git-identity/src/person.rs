// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Represents a person resolved from commit signatures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a [`Person`] within a [`crate::People`] registry.
///
/// IDs are the 1-based position of the originating signature among the
/// accepted ones. A merged person keeps the smallest ID of its parts. IDs are
/// never reused.
pub type PersonId = u64;

/// A normalized name, scoped to a repository. The scope is empty when the
/// name holds across repositories.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NameWithRepo {
    pub name: String,
    pub repo: String,
}

impl NameWithRepo {
    pub fn new(name: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repo: repo.into(),
        }
    }

    /// A name that is not scoped to any repository.
    pub fn unscoped(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }
}

impl fmt::Display for NameWithRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repo.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} ({})", self.name, self.repo)
        }
    }
}

/// A sample commit attributed to a [`Person`]. It is illustrative and does not
/// record the person's full provenance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub repo: String,
}

impl Commit {
    pub fn new(hash: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            repo: repo.into(),
        }
    }
}

/// A canonical, possibly merged, identity.
///
/// `names_with_repos` and `emails` are kept sorted and free of duplicates by
/// every operation of [`crate::People`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub names_with_repos: Vec<NameWithRepo>,
    pub emails: Vec<String>,
    /// A commit of this person. Absent once the person results from a merge.
    pub sample_commit: Option<Commit>,
    /// An opaque identifier issued by an external identity provider. An empty
    /// identifier counts as unbound.
    pub external_id: Option<String>,
}

impl Person {
    /// The external identifier, if one is bound and non-empty.
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref().filter(|id| !id.is_empty())
    }

    /// The names of this person, without their repository scopes.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names_with_repos.iter().map(|n| n.name.as_str())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .names_with_repos
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(
            f,
            "{}: {} <{}>",
            self.id,
            names.join(", "),
            self.emails.join(", ")
        )?;
        if let Some(id) = self.external_id() {
            write!(f, " [{id}]")?;
        }
        Ok(())
    }
}
