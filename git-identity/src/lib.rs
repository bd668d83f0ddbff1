// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! # `git-identity`
//!
//! Resolves the raw author signatures found in commit history, i.e. `(name,
//! email)` pairs tagged with a repository, a commit hash, and a timestamp,
//! into a set of [`Person`]s that can be deduplicated for attribution
//! across repositories.
//!
//! The flow is:
//!
//! 1. [`Signature`]s are ingested from a [`cache`], a [`database`], or local
//!    [`git`] repositories. Names and emails are [`normalize`]d exactly once,
//!    either on read or by steps 2 and 3.
//! 2. [`People::new`] creates one [`Person`] per signature accepted by a
//!    [`Filter`], e.g. a [`Blacklist`].
//! 3. [`freq::stats`] counts how often each name and email was used, overall
//!    and within a recent window.
//! 4. An external [`Policy`] decides which people are the same, and
//!    [`People::merge`] fuses them.
//! 5. The result is persisted with [`store`].
//!
//! [`resolve::resolve_people`] runs steps 1 to 3.
//!
//! ## Concurrency
//!
//! Everything except ingestion is a synchronous, in-memory transformation.
//! [`People`] is `Send` but mutations must be serialised by the caller, e.g.
//! by keeping it behind a lock. Ingestion may block; it can be cancelled
//! through an [`Interrupt`].

pub mod blacklist;
pub use blacklist::{Blacklist, Filter};

pub mod cache;

pub mod config;
pub use config::Config;

pub mod database;
pub use database::Database;

pub mod error;
pub use error::Error;

pub mod freq;
pub use freq::{Frequencies, Frequency, Stats};

pub mod git;

mod interrupt;
pub use interrupt::Interrupt;

pub mod normalize;

pub mod people;
pub use people::People;

pub mod person;
pub use person::{Commit, NameWithRepo, Person, PersonId};

pub mod policy;
pub use policy::Policy;

pub mod resolve;
pub use resolve::{resolve_people, Resolved, Source};

pub mod signature;
pub use signature::Signature;

pub mod store;
