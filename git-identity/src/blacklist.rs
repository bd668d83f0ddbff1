// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deciding which signatures may serve as identity evidence.
//!
//! A signature is rejected when its name, email, or email domain is
//! [excluded](Filter::is_excluded), or when its email is not
//! [valid](is_valid_email). Rejection is silent: rejected signatures produce
//! no [`crate::Person`] and take no part in merges.

use std::collections::BTreeSet;

use crate::normalize::{self, clean_email, clean_name};

/// A predicate over normalized `(name, email)` pairs.
pub trait Filter {
    /// Whether the normalized `name` or `email` is on an exclusion list.
    fn is_excluded(&self, name: &str, email: &str) -> bool;

    /// Whether the normalized pair may serve as identity evidence.
    fn accepts(&self, name: &str, email: &str) -> bool {
        is_valid_email(email) && !self.is_excluded(name, email)
    }
}

/// Exclusion lists of generic, bot, or shared identities.
///
/// Entries are normalized on insertion, so they can be compared against
/// normalized signatures directly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blacklist {
    names: BTreeSet<String>,
    emails: BTreeSet<String>,
    domains: BTreeSet<String>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude every signature using `name`.
    ///
    /// # Errors
    ///
    /// * [`normalize::Error::EmptyName`] if `name` normalizes to nothing.
    pub fn exclude_name(&mut self, name: &str) -> Result<&mut Self, normalize::Error> {
        self.names.insert(clean_name(name)?);
        Ok(self)
    }

    /// Exclude every signature using `email`.
    pub fn exclude_email(&mut self, email: &str) -> &mut Self {
        self.emails.insert(clean_email(email));
        self
    }

    /// Exclude every signature whose email is at `domain`.
    pub fn exclude_domain(&mut self, domain: &str) -> &mut Self {
        self.domains
            .insert(clean_email(domain.trim_start_matches('@')));
        self
    }

    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_excluded_email(&self, email: &str) -> bool {
        self.emails.contains(email)
            || domain(email).map_or(false, |domain| self.domains.contains(domain))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.emails.is_empty() && self.domains.is_empty()
    }
}

impl Filter for Blacklist {
    fn is_excluded(&self, name: &str, email: &str) -> bool {
        self.is_excluded_name(name) || self.is_excluded_email(email)
    }
}

/// Whether `email` is structurally usable as identity evidence.
///
/// The local part, everything before the last `@`, must not be empty. The
/// domain must contain a dot that is neither its first nor its last
/// character. Malformed addresses carry no signal whatever the exclusion
/// lists say.
pub fn is_valid_email(email: &str) -> bool {
    match email.rsplit_once('@') {
        None => false,
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        },
    }
}

fn domain(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain)
}
