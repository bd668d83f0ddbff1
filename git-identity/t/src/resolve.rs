// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{collections::BTreeMap, fs};

use chrono::Utc;
use git_identity::{
    cache,
    resolve::{find_raw_signatures, find_signatures},
    resolve_people,
    Blacklist,
    Config,
    Database,
    Error,
    Frequencies,
    Frequency,
    Interrupt,
    People,
    Resolved,
    Source,
};
use pretty_assertions::assert_eq;
use test_helpers::tempdir;

use crate::{fixtures, git};

#[test]
fn cache_hit() {
    test_helpers::logging::init();
    let dir = tempdir::file("signatures.csv");
    let signatures = fixtures::signatures(Utc::now());
    cache::write(&dir, &signatures).unwrap();

    // The source is never touched.
    let source = Source::Database {
        endpoint: dir.dir().join("missing.db"),
        hashes: dir.dir().join("missing.txt"),
    };

    let found = find_signatures(&source, Some(dir.as_path()), &Interrupt::new()).unwrap();
    assert_eq!(
        found,
        signatures
            .into_iter()
            .map(|s| s.normalized().unwrap())
            .collect::<Vec<_>>()
    );

    let Resolved { people, stats } = resolve_people(
        &source,
        Some(dir.as_path()),
        &fixtures::blacklist(),
        12,
        &Interrupt::new(),
    )
    .unwrap();
    assert_eq!(people.iter().cloned().collect::<Vec<_>>(), fixtures::people());
    assert_eq!(
        stats.names,
        [
            ("alice", Frequency::new(0, 1)),
            ("admin", Frequency::new(1, 1)),
            ("bob", Frequency::new(2, 4)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect::<Frequencies>()
    );
    assert_eq!(
        stats.emails,
        [
            ("bob@google.com", Frequency::new(2, 3)),
            ("alice@google.com", Frequency::new(0, 1)),
            ("bad-email@domen", Frequency::new(0, 1)),
            ("someone@google.com", Frequency::new(1, 1)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect::<Frequencies>()
    );
}

#[test]
fn normalizes_names_once() {
    let dir = tempdir::file("signatures.csv");
    let now = Utc::now();
    let signatures = vec![
        fixtures::signature(
            "repo1",
            "Bob (x) (y)",
            "bob@google.com",
            "aaa",
            fixtures::months_ago(now, 1),
        ),
        fixtures::signature(
            "repo1",
            "(x) (y)",
            "anon@google.com",
            "bbb",
            fixtures::months_ago(now, 2),
        ),
    ];
    cache::write(&dir, &signatures).unwrap();
    let source = Source::Repositories(BTreeMap::new());

    let cached = cache::read(&dir).unwrap();
    assert_eq!(
        cached.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        vec!["bob (y)", "(y)"]
    );
    assert_eq!(
        find_signatures(&source, Some(dir.as_path()), &Interrupt::new()).unwrap(),
        cached
    );
    assert_eq!(
        find_raw_signatures(&source, Some(dir.as_path()), &Interrupt::new()).unwrap(),
        signatures
    );

    let Resolved { people, stats } = resolve_people(
        &source,
        Some(dir.as_path()),
        &Blacklist::new(),
        12,
        &Interrupt::new(),
    )
    .unwrap();
    assert_eq!(people, People::new(&signatures, &Blacklist::new()).unwrap());
    assert_eq!(
        people
            .iter()
            .flat_map(|p| p.names())
            .collect::<Vec<_>>(),
        vec!["bob (y)", "(y)"]
    );
    assert_eq!(
        stats.names.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["(y)", "bob (y)"]
    );
}

#[test]
fn cache_miss() {
    let cache_path = tempdir::file("signatures.csv");
    let signatures = fixtures::signatures(Utc::now());
    let endpoint = cache_path.dir().join("commits.db");
    let hashes = cache_path.dir().join("hashes.txt");
    Database::create(&endpoint)
        .unwrap()
        .insert(&signatures)
        .unwrap();
    fs::write(&hashes, "aaa\nbbb\nccc\nddd\neee\nfff\n").unwrap();
    let source = Source::Database { endpoint, hashes };

    let Resolved { people, .. } = resolve_people(
        &source,
        Some(cache_path.as_path()),
        &fixtures::blacklist(),
        12,
        &Interrupt::new(),
    )
    .unwrap();
    assert_eq!(
        people
            .iter()
            .map(|p| p.sample_commit.as_ref().unwrap().hash.as_str())
            .collect::<Vec<_>>(),
        vec!["ccc", "aaa", "ddd", "bbb"]
    );

    // Names and emails are cached as found.
    let cached = fs::read_to_string(&*cache_path).unwrap();
    assert!(cached.starts_with("repo,name,email,hash,time\nrepo1,Bob,bad-email@domen,eee,"));
    assert!(cached.contains("\nrepo2,Bob,Bob@google.com,bbb,"));

    // A second run reads the cache.
    fs::remove_file(source_endpoint(&source)).unwrap();
    let again = resolve_people(
        &source,
        Some(cache_path.as_path()),
        &fixtures::blacklist(),
        12,
        &Interrupt::new(),
    )
    .unwrap();
    assert_eq!(again.people, people);
}

fn source_endpoint(source: &Source) -> &std::path::Path {
    match source {
        Source::Database { endpoint, .. } => endpoint,
        Source::Repositories(_) => unreachable!(),
    }
}

#[test]
fn repositories() {
    let first = git::repo(&[
        ("Bob", "Bob@Example.com", 1_600_000_000, 0),
        ("admin", "admin@example.com", 1_600_000_100, 0),
    ]);
    let second = git::repo(&[("Bob (Home)", "bob@example.com", 1_500_000_000, 60)]);
    let source = Source::Repositories(BTreeMap::from([
        ("b-repo".to_owned(), first.to_path_buf()),
        ("a-repo".to_owned(), second.to_path_buf()),
    ]));

    let mut config = Config::default();
    config.blacklist.exclude_name("admin").unwrap();
    let Resolved { people, stats } =
        git_identity::resolve::resolve_configured(&source, &config, &Interrupt::new()).unwrap();

    assert_eq!(
        people
            .iter()
            .map(|p| (p.id, p.sample_commit.as_ref().unwrap().repo.as_str()))
            .collect::<Vec<_>>(),
        vec![(1, "a-repo"), (2, "b-repo")]
    );
    assert_eq!(stats.names["bob"], Frequency::new(0, 2));
    assert_eq!(stats.emails["bob@example.com"], Frequency::new(0, 2));
    assert_eq!(stats.names["admin"], Frequency::new(0, 1));
}

#[test]
fn empty_repository() {
    let empty = git::repo(&[]);
    let full = git::repo(&[("Bob", "bob@example.com", 1_600_000_000, 0)]);
    let source = Source::Repositories(BTreeMap::from([
        ("empty".to_owned(), empty.to_path_buf()),
        ("full".to_owned(), full.to_path_buf()),
    ]));

    let resolved = resolve_people(&source, None, &Blacklist::new(), 12, &Interrupt::new()).unwrap();
    assert_eq!(resolved.people.ids(), vec![1]);
    assert_eq!(resolved.stats.names["bob"], Frequency::new(0, 1));
}

#[test]
fn no_filter() {
    let dir = tempdir::file("signatures.csv");
    cache::write(&dir, &fixtures::signatures(Utc::now())).unwrap();
    let source = Source::Repositories(BTreeMap::new());

    let resolved =
        resolve_people(&source, Some(dir.as_path()), &Blacklist::new(), 12, &Interrupt::new()).unwrap();
    assert_eq!(resolved.people.len(), 5);
}

#[test]
fn missing_source() {
    let dir = tempdir::file("signatures.csv");
    let source = Source::Database {
        endpoint: dir.dir().join("missing.db"),
        hashes: dir.dir().join("missing.txt"),
    };
    assert_matches!(
        resolve_people(&source, Some(dir.as_path()), &Blacklist::new(), 12, &Interrupt::new()),
        Err(Error::Database(_))
    );
    assert!(!dir.exists());
}
