// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provides proptest generators

use chrono::{DateTime, Utc};
use git_identity::Signature;
use proptest::{collection, prelude::*, sample};

/// Names from a small pool, so that generated signatures collide, with
/// varying case and spacing.
pub fn name() -> impl Strategy<Value = String> {
    (
        sample::select(vec!["Bob", "bob", "Alice", "Carol", "admin"]),
        sample::select(vec!["", " ", "  (work)", "\t"]),
    )
        .prop_map(|(name, suffix)| format!("{name}{suffix}"))
}

/// Emails from a small pool, including malformed ones.
pub fn email() -> impl Strategy<Value = String> {
    sample::select(vec![
        "bob@example.com",
        "Bob@Example.com",
        "alice@example.org",
        "carol@example.org",
        "root@localhost",
        "nobody",
    ])
    .prop_map(ToOwned::to_owned)
}

pub fn time() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..2_000_000_000).prop_map(|secs| DateTime::<Utc>::from_timestamp(secs, 0).unwrap())
}

pub fn signature() -> impl Strategy<Value = Signature> {
    (
        sample::select(vec!["repo1", "repo2"]),
        name(),
        email(),
        "[a-f0-9]{40}",
        time(),
    )
        .prop_map(|(repo, name, email, hash, time)| Signature {
            repo: repo.to_owned(),
            name,
            email,
            hash,
            time: time.into(),
        })
}

pub fn signatures() -> impl Strategy<Value = Vec<Signature>> {
    collection::vec(signature(), 0..32)
}
