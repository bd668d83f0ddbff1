// Copyright © 2022 The Radicle Git Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(any(test, feature = "test"))]
pub mod fixtures;

#[cfg(any(test, feature = "test"))]
pub mod gen;


#[cfg(test)]
mod cache;





#[cfg(test)]
mod normalize;



#[cfg(test)]
mod resolve;
