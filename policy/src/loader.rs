// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Loading and compiling policy sources.

use std::path::Path;

use anyhow::Context;

use crate::engine::RulesetEngine;
use crate::schema::{DataSet, RuleSet};

pub fn load_ruleset(path: &Path) -> anyhow::Result<RuleSet> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rule source {}", path.display()))?;
    ruleset_from_str(&raw).with_context(|| format!("failed to parse rule source {}", path.display()))
}

pub fn ruleset_from_str(raw: &str) -> anyhow::Result<RuleSet> {
    Ok(toml::from_str(raw)?)
}

/// No data source means an empty data set; `*_in` matchers then fail to
/// compile with a dangling-list error.
pub fn load_dataset(path: Option<&Path>) -> anyhow::Result<DataSet> {
    let Some(path) = path else {
        return Ok(DataSet::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read data source {}", path.display()))?;
    dataset_from_str(&raw).with_context(|| format!("failed to parse data source {}", path.display()))
}

pub fn dataset_from_str(raw: &str) -> anyhow::Result<DataSet> {
    Ok(toml::from_str(raw)?)
}

/// Compiles an engine straight from its source paths.
pub fn load_engine(rules: &Path, data: Option<&Path>) -> anyhow::Result<RulesetEngine> {
    let ruleset = load_ruleset(rules)?;
    let dataset = load_dataset(data)?;
    RulesetEngine::new(ruleset, dataset)
}
