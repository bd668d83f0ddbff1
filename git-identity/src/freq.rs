// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Usage statistics of names and emails.
//!
//! For every distinct normalized name and email, [`stats`] counts how many
//! signatures use it overall and how many since a cutoff. A matching
//! [`crate::Policy`] can weigh the two: a name shared by many signatures is
//! weak evidence, while one used recently is a sign of an active identity.

use std::collections::BTreeMap;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    normalize::{self, clean_email, clean_name},
    signature::Signature,
};

/// How often a key was used.
///
/// `recent <= total` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    /// Uses at or after the cutoff.
    pub recent: u64,
    /// All uses.
    pub total: u64,
}

impl Frequency {
    pub fn new(recent: u64, total: u64) -> Self {
        Self { recent, total }
    }
}

/// Frequencies keyed by a normalized name or email.
pub type Frequencies = BTreeMap<String, Frequency>;

/// Name and email frequencies over the same signatures and cutoff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub names: Frequencies,
    pub emails: Frequencies,
}

/// Count the signatures per normalized key.
///
/// `key` extracts the raw key from a signature, which `normalize` turns into
/// the counted key. The total is always incremented, the recent count only
/// when the signature's time is at or after `cutoff`.
///
/// # Errors
///
/// Any error of `normalize`, on the first signature it fails for.
pub fn count<'a, I, K, N>(
    signatures: I,
    key: K,
    normalize: N,
    cutoff: DateTime<Utc>,
) -> Result<Frequencies, normalize::Error>
where
    I: IntoIterator<Item = &'a Signature>,
    K: Fn(&Signature) -> &str,
    N: Fn(&str) -> Result<String, normalize::Error>,
{
    let mut freqs = Frequencies::new();
    for signature in signatures {
        let freq = freqs.entry(normalize(key(signature))?).or_default();
        freq.total += 1;
        if signature.time.with_timezone(&Utc) >= cutoff {
            freq.recent += 1;
        }
    }
    Ok(freqs)
}

/// Count names and emails independently, see [`count`]. Names and emails
/// of `signatures` are expected raw.
///
/// # Errors
///
/// * [`normalize::Error::EmptyName`]
pub fn stats<'a, I>(signatures: I, cutoff: DateTime<Utc>) -> Result<Stats, normalize::Error>
where
    I: IntoIterator<Item = &'a Signature>,
    I::IntoIter: Clone,
{
    let signatures = signatures.into_iter();
    let names = count(signatures.clone(), |s| s.name.as_str(), clean_name, cutoff)?;
    let emails = count(signatures, |s| s.email.as_str(), |e| Ok(clean_email(e)), cutoff)?;
    tracing::debug!(
        names = names.len(),
        emails = emails.len(),
        %cutoff,
        "counted name and email frequencies"
    );
    Ok(Stats { names, emails })
}

/// The start of the recent window: `months` calendar months before `now`.
///
/// Days that do not exist in the target month are clamped to its last day.
/// Saturates at the earliest representable time.
pub fn cutoff(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
