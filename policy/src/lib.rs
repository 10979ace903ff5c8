// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Perimeter Policy Engine
//!
//! A declarative predicate engine over security-group fact records.
//!
//! A policy is a pair of TOML sources: a rule set (typed matchers plus a
//! combine mode) and an optional data set (named string lists the `*_in`
//! matchers reference). Both are compiled eagerly into a
//! [`RulesetEngine`], which answers the core's `PolicyEngine` capability
//! with a plain boolean per fact record.

pub mod engine;
pub mod loader;
pub mod schema;

pub use engine::RulesetEngine;
