// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Signatures shared by the tests: two repositories, a prolific author with a
//! capitalised email, one with a malformed email, and a blacklisted one.

use chrono::{DateTime, FixedOffset, Months, SubsecRound as _, Utc};
use git_identity::{Blacklist, Commit, NameWithRepo, Person, PersonId, Signature};

/// The time `months` calendar months before `now`, to the second.
pub fn months_ago(now: DateTime<Utc>, months: u32) -> DateTime<FixedOffset> {
    now.checked_sub_months(Months::new(months))
        .unwrap()
        .trunc_subsecs(0)
        .into()
}

pub fn signature(
    repo: &str,
    name: &str,
    email: &str,
    hash: &str,
    time: DateTime<FixedOffset>,
) -> Signature {
    Signature {
        repo: repo.to_owned(),
        name: name.to_owned(),
        email: email.to_owned(),
        hash: hash.to_owned(),
        time,
    }
}

/// | hash  | repo  | name  | email              | months ago |
/// |-------|-------|-------|--------------------|------------|
/// | `aaa` | repo1 | Bob   | Bob@google.com     | 6          |
/// | `bbb` | repo2 | Bob   | Bob@google.com     | 18         |
/// | `ccc` | repo1 | Alice | alice@google.com   | 15         |
/// | `ddd` | repo1 | Bob   | Bob@google.com     | 2          |
/// | `eee` | repo1 | Bob   | bad-email@domen    | 20         |
/// | `fff` | repo1 | admin | someone@google.com | 4          |
pub fn signatures(now: DateTime<Utc>) -> Vec<Signature> {
    vec![
        signature("repo1", "Bob", "Bob@google.com", "aaa", months_ago(now, 6)),
        signature("repo2", "Bob", "Bob@google.com", "bbb", months_ago(now, 18)),
        signature("repo1", "Alice", "alice@google.com", "ccc", months_ago(now, 15)),
        signature("repo1", "Bob", "Bob@google.com", "ddd", months_ago(now, 2)),
        signature("repo1", "Bob", "bad-email@domen", "eee", months_ago(now, 20)),
        signature("repo1", "admin", "someone@google.com", "fff", months_ago(now, 4)),
    ]
}

/// A blacklist excluding `admin`.
pub fn blacklist() -> Blacklist {
    let mut blacklist = Blacklist::new();
    blacklist.exclude_name("admin").unwrap();
    blacklist
}

pub fn person(
    id: PersonId,
    names: &[&str],
    emails: &[&str],
    sample_commit: Option<(&str, &str)>,
) -> Person {
    Person {
        id,
        names_with_repos: names.iter().map(|n| NameWithRepo::unscoped(*n)).collect(),
        emails: emails.iter().map(|e| e.to_string()).collect(),
        sample_commit: sample_commit.map(|(hash, repo)| Commit::new(hash, repo)),
        external_id: None,
    }
}

/// The people created from [`signatures`] with [`blacklist`].
pub fn people() -> Vec<Person> {
    vec![
        person(1, &["bob"], &["bob@google.com"], Some(("aaa", "repo1"))),
        person(2, &["bob"], &["bob@google.com"], Some(("bbb", "repo2"))),
        person(3, &["alice"], &["alice@google.com"], Some(("ccc", "repo1"))),
        person(4, &["bob"], &["bob@google.com"], Some(("ddd", "repo1"))),
    ]
}
