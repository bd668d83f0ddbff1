// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The registry of [`Person`]s and the merge algebra over it.

use std::{
    collections::{btree_map, BTreeMap, BTreeSet},
    ops::ControlFlow,
};

use crate::{
    blacklist::Filter,
    normalize::{self, clean_email, clean_name},
    person::{Commit, NameWithRepo, Person, PersonId},
    signature::Signature,
};

pub mod error {
    use thiserror::Error;

    use crate::person::PersonId;

    #[derive(Debug, Error, PartialEq, Eq)]
    #[error("person {0} does not exist")]
    pub struct NotFound(pub PersonId);

    #[derive(Debug, Error, PartialEq, Eq)]
    #[non_exhaustive]
    pub enum Merge {
        #[error("no people were given to merge")]
        Empty,
        #[error(transparent)]
        NotFound(#[from] NotFound),
        #[error("people {people:?} are bound to distinct external identities {external_ids:?}")]
        ConflictingExternalIdentity {
            people: Vec<PersonId>,
            external_ids: Vec<String>,
        },
    }
}

/// The live people, keyed by their [`PersonId`].
///
/// Keys are exactly the IDs that have not been merged away. Iteration is in
/// ascending ID order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct People {
    inner: BTreeMap<PersonId, Person>,
}

impl People {
    /// Create one [`Person`] per signature that `filter` accepts.
    ///
    /// People are numbered from `1` in the order of the accepted signatures.
    /// Each gets the signature's normalized name, without a repository scope,
    /// its normalized email, and its commit as a sample. Signatures with
    /// identical names and emails still yield distinct people, deduplication
    /// is left to [`People::merge`].
    ///
    /// Names and emails are normalized here, `signatures` are expected raw.
    /// [`crate::normalize::clean_name`] is not idempotent.
    ///
    /// # Errors
    ///
    /// * [`normalize::Error::EmptyName`] if the name of a signature, which
    ///   would otherwise be accepted, normalizes to nothing.
    pub fn new<'a, I, F>(signatures: I, filter: &F) -> Result<Self, normalize::Error>
    where
        I: IntoIterator<Item = &'a Signature>,
        F: Filter + ?Sized,
    {
        let mut inner = BTreeMap::new();
        let mut seq: PersonId = 0;
        let mut rejected = 0usize;

        for signature in signatures {
            let email = clean_email(&signature.email);
            let name = match clean_name(&signature.name) {
                Ok(name) => name,
                Err(err) => {
                    // Without a name, only the email can disqualify the signature.
                    if filter.accepts("", &email) {
                        return Err(err);
                    }
                    rejected += 1;
                    continue;
                },
            };
            if !filter.accepts(&name, &email) {
                tracing::trace!(%signature, "rejected signature");
                rejected += 1;
                continue;
            }

            seq += 1;
            inner.insert(
                seq,
                Person {
                    id: seq,
                    names_with_repos: vec![NameWithRepo::unscoped(name)],
                    emails: vec![email],
                    sample_commit: Some(Commit::new(&signature.hash, &signature.repo)),
                    external_id: None,
                },
            );
        }

        tracing::debug!(accepted = seq, rejected, "created people from signatures");
        Ok(Self { inner })
    }

    /// Build a registry out of already resolved people. Returns the first
    /// duplicated ID, if any.
    pub(crate) fn from_people<I>(people: I) -> Result<Self, PersonId>
    where
        I: IntoIterator<Item = Person>,
    {
        let mut inner = BTreeMap::new();
        for person in people {
            let id = person.id;
            if inner.insert(id, person).is_some() {
                return Err(id);
            }
        }
        Ok(Self { inner })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.inner.contains_key(&id)
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.inner.get(&id)
    }

    /// The live IDs, in ascending order, at the time of the call.
    ///
    /// Use this snapshot to traverse the registry while mutating it. IDs that
    /// were merged away in the meantime are no longer [`People::contains`]ed.
    pub fn ids(&self) -> Vec<PersonId> {
        self.inner.keys().copied().collect()
    }

    /// Iterate over the people in ascending ID order.
    pub fn iter(&self) -> btree_map::Values<'_, PersonId, Person> {
        self.inner.values()
    }

    /// Call `visit` for each person in ascending ID order, until it returns
    /// [`ControlFlow::Break`].
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(PersonId, &Person) -> ControlFlow<()>,
    {
        for (id, person) in &self.inner {
            if visit(*id, person).is_break() {
                break;
            }
        }
    }

    /// Bind `external_id`, issued by an identity provider, to the person `id`.
    /// A previous binding is replaced.
    ///
    /// # Errors
    ///
    /// * [`error::NotFound`] if `id` is not live.
    pub fn bind_external_id(
        &mut self,
        id: PersonId,
        external_id: impl Into<String>,
    ) -> Result<(), error::NotFound> {
        let person = self.inner.get_mut(&id).ok_or(error::NotFound(id))?;
        person.external_id = Some(external_id.into());
        Ok(())
    }

    /// Merge the people `ids` into one, returning the surviving ID.
    ///
    /// The survivor is the smallest of `ids`. Its names and emails are the
    /// sorted, deduplicated union of all merged people, it has no sample
    /// commit, and it keeps the external identifier if any of the merged
    /// people had one. All other IDs are removed. Merging is associative:
    /// merging `{1, 2}` and then `{1, 3}` is the same as merging `{1, 2, 3}`.
    ///
    /// Repeated IDs count once. A single ID is a no-op.
    ///
    /// The registry is left untouched on error.
    ///
    /// # Errors
    ///
    /// * [`error::Merge::Empty`] if `ids` is empty.
    /// * [`error::Merge::NotFound`] if any of `ids` is not live.
    /// * [`error::Merge::ConflictingExternalIdentity`] if two of the people are
    ///   bound to different external identifiers.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn merge(&mut self, ids: &[PersonId]) -> Result<PersonId, error::Merge> {
        let ids = ids.iter().copied().collect::<BTreeSet<_>>();
        let survivor = *ids.first().ok_or(error::Merge::Empty)?;
        if let Some(missing) = ids.iter().find(|id| !self.inner.contains_key(id)) {
            return Err(error::NotFound(*missing).into());
        }
        let external_id = self.external_id_of(&ids)?;
        if ids.len() == 1 {
            return Ok(survivor);
        }

        let mut names = BTreeSet::new();
        let mut emails = BTreeSet::new();
        for id in &ids {
            if let Some(person) = self.inner.remove(id) {
                names.extend(person.names_with_repos);
                emails.extend(person.emails);
            }
        }
        self.inner.insert(
            survivor,
            Person {
                id: survivor,
                names_with_repos: names.into_iter().collect(),
                emails: emails.into_iter().collect(),
                sample_commit: None,
                external_id,
            },
        );

        tracing::debug!(survivor, merged = ids.len(), "merged people");
        Ok(survivor)
    }

    fn external_id_of(&self, ids: &BTreeSet<PersonId>) -> Result<Option<String>, error::Merge> {
        let external_ids = ids
            .iter()
            .filter_map(|id| self.inner.get(id))
            .filter_map(Person::external_id)
            .collect::<BTreeSet<_>>();
        let mut distinct = external_ids.into_iter();
        match (distinct.next(), distinct.next()) {
            (None, _) => Ok(None),
            (Some(id), None) => Ok(Some(id.to_owned())),
            (Some(first), Some(second)) => Err(error::Merge::ConflictingExternalIdentity {
                people: ids.iter().copied().collect(),
                external_ids: [first, second]
                    .into_iter()
                    .chain(distinct)
                    .map(ToOwned::to_owned)
                    .collect(),
            }),
        }
    }
}

impl<'a> IntoIterator for &'a People {
    type Item = &'a Person;
    type IntoIter = btree_map::Values<'a, PersonId, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
