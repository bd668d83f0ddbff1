// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use git_identity::normalize::{clean_email, clean_name, normalize_spaces, remove_parens, Error};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::gen;

#[test]
fn clean_names() {
    for (raw, clean) in [
        ("  name", "name"),
        ("name  \tname  ", "name name"),
        ("name  \tname\nsurname", "name name surname"),
        ("name\u{3000}name", "name name"),
        ("Bob Smith (Work)", "bob smith"),
        ("(bot) Alice", "alice"),
    ] {
        assert_eq!(clean_name(raw).as_deref(), Ok(clean), "{raw:?}");
    }
}

#[test]
fn empty_names() {
    for raw in ["", "   ", "\u{3000}\n", "(bot)", "  (ci bot)  "] {
        assert_eq!(
            clean_name(raw),
            Err(Error::EmptyName {
                raw: raw.to_owned()
            })
        );
    }
}

#[test]
fn clean_emails() {
    assert_eq!(clean_email("Bob@Google.COM"), "bob@google.com");
    assert_eq!(clean_email(" bob@google.com"), " bob@google.com");
}

#[test]
fn parens() {
    assert_eq!(
        remove_parens("something (delete it) something2"),
        "something something2"
    );
    assert_eq!(
        remove_parens("something () something2"),
        "something () something2"
    );
    assert_eq!(
        remove_parens("something (1) (2) something2"),
        "something (2) something2"
    );
    assert_eq!(
        remove_parens("something(nospace)something2"),
        "something(nospace)something2"
    );
}

#[test]
fn spaces() {
    assert_eq!(normalize_spaces("1 2"), "1 2");
    assert_eq!(normalize_spaces("1  \t  2 \n\n"), "1 2");
    assert_eq!(normalize_spaces("12"), "12");
}

proptest! {
    #[test]
    fn clean_name_shape(raw in gen::name()) {
        if let Ok(name) = clean_name(&raw) {
            prop_assert!(!name.is_empty());
            prop_assert_eq!(name.trim(), name.as_str());
            prop_assert!(!name.contains("  "));
            prop_assert_eq!(name.to_lowercase(), name.clone());
        }
    }

    #[test]
    fn clean_email_idempotent(raw in "[A-Za-z0-9@. ]*") {
        let once = clean_email(&raw);
        prop_assert_eq!(clean_email(&once), once);
    }
}
