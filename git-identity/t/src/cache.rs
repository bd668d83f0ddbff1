// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;

use chrono::Utc;
use git_identity::{cache, Signature};
use pretty_assertions::assert_eq;
use test_helpers::tempdir;

use crate::fixtures;

fn normalized(signatures: Vec<Signature>) -> Vec<Signature> {
    signatures
        .into_iter()
        .map(|s| s.normalized().unwrap())
        .collect()
}

#[test]
fn store_and_read() {
    test_helpers::logging::init();
    let path = tempdir::file("signatures.csv");
    let signatures = fixtures::signatures(Utc::now());

    cache::write(&path, &signatures).unwrap();

    let mut expected = String::from("repo,name,email,hash,time\n");
    for s in &signatures {
        expected.push_str(&format!(
            "{},{},{},{},{}\n",
            s.repo,
            s.name,
            s.email,
            s.hash,
            s.rfc3339()
        ));
    }
    assert_eq!(fs::read_to_string(&*path).unwrap(), expected);
    assert!(expected.contains("repo1,Bob,Bob@google.com,aaa,"));

    assert_eq!(cache::read_raw(&path).unwrap(), signatures);

    let read = cache::read(&path).unwrap();
    assert_eq!(read, normalized(signatures));
    assert_eq!(read[4].email, "bad-email@domen");
    assert_eq!(read[5].name, "admin");
}

#[test]
fn quoting() {
    let path = tempdir::file("signatures.csv");
    let now = Utc::now();
    let signatures = vec![
        fixtures::signature(
            "repo,1",
            "Smith, Bob",
            "bob@google.com",
            "aaa",
            fixtures::months_ago(now, 1),
        ),
        fixtures::signature(
            "repo1",
            "Bob \"The Builder\"",
            "bob@google.com",
            "bbb",
            fixtures::months_ago(now, 2),
        ),
    ];

    cache::write(&path, &signatures).unwrap();
    assert_eq!(cache::read(&path).unwrap(), normalized(signatures));
}

#[test]
fn offsets_survive() {
    let path = tempdir::file("signatures.csv");
    let time = chrono::DateTime::parse_from_rfc3339("2020-09-13T14:26:40+02:00").unwrap();
    let signatures = vec![fixtures::signature(
        "repo1",
        "bob",
        "bob@google.com",
        "aaa",
        time,
    )];

    cache::write(&path, &signatures).unwrap();
    assert!(fs::read_to_string(&*path)
        .unwrap()
        .ends_with(",2020-09-13T14:26:40+02:00\n"));
    let read = cache::read(&path).unwrap();
    assert_eq!(read[0].time.offset(), time.offset());
}

#[test]
fn empty() {
    let path = tempdir::file("signatures.csv");
    cache::write(&path, &[]).unwrap();
    assert_eq!(fs::read_to_string(&*path).unwrap(), "repo,name,email,hash,time\n");
    assert!(cache::read(&path).unwrap().is_empty());
}

#[test]
fn bad_header() {
    let path = tempdir::file("signatures.csv");
    fs::write(&*path, "repo,name,email,time\nrepo1,bob,bob@google.com,aaa\n").unwrap();
    assert_matches!(
        cache::read(&path),
        Err(cache::Error::Header { found, .. }) if found == ["repo", "name", "email", "time"]
    );
}

#[test]
fn bad_time() {
    let path = tempdir::file("signatures.csv");
    fs::write(
        &*path,
        "repo,name,email,hash,time\n\
         repo1,bob,bob@google.com,aaa,2020-09-13T14:26:40Z\n\
         repo1,bob,bob@google.com,bbb,yesterday\n",
    )
    .unwrap();
    assert_matches!(
        cache::read(&path),
        Err(cache::Error::Time { line: 3, time, .. }) if time == "yesterday"
    );
}

#[test]
fn bad_name() {
    let path = tempdir::file("signatures.csv");
    fs::write(
        &*path,
        "repo,name,email,hash,time\nrepo1,(bot),bot@google.com,aaa,2020-09-13T14:26:40Z\n",
    )
    .unwrap();
    assert_matches!(cache::read(&path), Err(cache::Error::Name { line: 2, .. }));
}

#[test]
fn missing() {
    let path = tempdir::file("signatures.csv");
    assert_matches!(cache::read(&path), Err(cache::Error::Open { .. }));
}
