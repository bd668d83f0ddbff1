// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The seam for the policy deciding which people are the same.
//!
//! No policy ships with this crate. A policy sees the registry and the
//! [`Stats`] of the signatures it was built from, and answers with clusters of
//! IDs. [`People::apply`] then merges each cluster.

use crate::{
    freq::Stats,
    people::{error, People},
    person::PersonId,
};

/// Groups people that should be merged.
pub trait Policy {
    /// Return the clusters of people to merge. Clusters must be disjoint.
    /// Clusters of fewer than two IDs are ignored.
    fn clusters(&self, people: &People, stats: &Stats) -> Vec<Vec<PersonId>>;
}

impl<F> Policy for F
where
    F: Fn(&People, &Stats) -> Vec<Vec<PersonId>>,
{
    fn clusters(&self, people: &People, stats: &Stats) -> Vec<Vec<PersonId>> {
        self(people, stats)
    }
}

impl People {
    /// Merge every cluster found by `policy`, returning the surviving IDs in
    /// the order of the clusters.
    ///
    /// Either all clusters are merged or, on error, none is.
    ///
    /// # Errors
    ///
    /// The first [`error::Merge`] encountered. Overlapping clusters fail with
    /// [`error::Merge::NotFound`], since the second one refers to an ID that
    /// the first already merged away.
    pub fn apply<P>(&mut self, policy: &P, stats: &Stats) -> Result<Vec<PersonId>, error::Merge>
    where
        P: Policy + ?Sized,
    {
        let clusters = policy.clusters(self, stats);
        let mut merged = self.clone();
        let mut survivors = Vec::with_capacity(clusters.len());
        for cluster in clusters.iter().filter(|c| c.len() > 1) {
            survivors.push(merged.merge(cluster)?);
        }
        tracing::debug!(
            clusters = survivors.len(),
            before = self.len(),
            after = merged.len(),
            "applied matching policy"
        );
        *self = merged;
        Ok(survivors)
    }
}
