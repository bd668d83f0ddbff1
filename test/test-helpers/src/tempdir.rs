// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    io,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use tempfile::{tempdir, TempDir};

/// A value paired with the temporary directory it lives in. The directory is
/// removed when this is dropped.
#[derive(Debug)]
pub struct WithTmpDir<A> {
    tmp: TempDir,
    inner: A,
}

impl<A> WithTmpDir<A> {
    pub fn new<F, E>(mk_inner: F) -> Result<Self, E>
    where
        F: FnOnce(&Path) -> Result<A, E>,
        E: From<io::Error>,
    {
        let tmp = tempdir()?;
        let inner = mk_inner(tmp.path())?;
        Ok(Self { tmp, inner })
    }

    /// The root of the temporary directory.
    pub fn dir(&self) -> &Path {
        self.tmp.path()
    }
}

impl<A> Deref for WithTmpDir<A> {
    type Target = A;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<A> DerefMut for WithTmpDir<A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// A path to a file, not yet created, inside a fresh temporary directory.
pub type TmpFile = WithTmpDir<PathBuf>;

/// Reserve `name` inside a new temporary directory.
pub fn file(name: &str) -> TmpFile {
    WithTmpDir::new::<_, io::Error>(|dir| Ok(dir.join(name))).unwrap()
}
