// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Canonical forms of names and emails.
//!
//! Two signatures are only comparable once their names and emails went
//! through [`clean_name`] and [`clean_email`].

use regex::Regex;
use thiserror::Error;

lazy_static::lazy_static! {
    // A parenthesised group that stands on its own, i.e. is delimited by
    // whitespace or the ends of the string. `foo(bar)` is left alone.
    static ref PARENS: Regex = Regex::new(r"(?:^|\s+)\([^)]+\)(?:\s+|$)").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("name {raw:?} is empty once normalized")]
    EmptyName { raw: String },
}

/// Normalize a display name.
///
/// Runs of whitespace, including the Unicode space variants, collapse to a
/// single space, free-standing parenthesised groups are dropped, the ends are
/// trimmed, and the result is lower-cased.
///
/// # Errors
///
/// * [`Error::EmptyName`] if nothing is left.
pub fn clean_name(raw: &str) -> Result<String, Error> {
    let name = normalize_spaces(raw);
    let name = remove_parens(&name);
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(Error::EmptyName {
            raw: raw.to_owned(),
        });
    }
    Ok(name)
}

/// Normalize an email. Emails are only lower-cased.
pub fn clean_email(raw: &str) -> String {
    raw.to_lowercase()
}

/// Collapse every run of whitespace into one ASCII space and trim both ends.
pub fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove parenthesised groups that are delimited by whitespace or the ends of
/// `s`. Matches do not overlap, so of two adjacent groups sharing a space only
/// the first is removed.
pub fn remove_parens(s: &str) -> String {
    PARENS.replace_all(s, " ").trim().to_owned()
}
