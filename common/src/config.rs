// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Runtime options and the TOML configuration surface.
//!
//! Two layers live here. [`RunOptions`] shapes a single invocation and is
//! typically mapped from CLI flags. [`CheckerConfig`] is the checker's
//! configuration file: notification settings, API endpoints, the static
//! `[[allow]]` exceptions and the named `[[policy]]` definitions.
//! Credentials never appear in the file; they come from the conventional
//! `OS_*` environment variables at session setup.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::models::allow::AllowRule;

/// Options shaping a single invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Keep logs and colors but skip the startup ASCII art.
    pub no_banner: bool,

    /// Compute findings but never deliver notifications.
    ///
    /// The effective dry-run state of a run is this flag OR'ed with the
    /// `dry_run` key of the configuration file.
    pub dry_run: bool,

    /// Output density: 0 full UI, 1 reduced styling, 2 raw findings.
    pub quiet: u8,
}

/// Environment variable overriding the exemption endpoint.
pub const EXEMPTIONS_URL_ENV: &str = "PERIMETER_EXEMPTIONS_URL";

/// The checker configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckerConfig {
    #[serde(default)]
    pub dry_run: bool,

    /// Posted before the open-access findings batch.
    #[serde(default)]
    pub prefix_message: String,

    /// Posted after the open-access findings batch.
    #[serde(default)]
    pub suffix_message: String,

    pub slack: SlackConfig,
    pub openstack: OpenStackConfig,

    #[serde(default)]
    pub exemptions: ExemptionConfig,

    #[serde(default, rename = "allow")]
    pub allow_rules: Vec<AllowRule>,

    #[serde(default, rename = "policy")]
    pub policies: Vec<PolicyDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    pub webhook_url: String,
    pub channel: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_icon")]
    pub icon_emoji: String,
}

fn default_username() -> String {
    "perimeter".to_string()
}

fn default_icon() -> String {
    ":rotating_light:".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenStackConfig {
    pub auth_url: String,
    pub region: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default = "default_domain")]
    pub user_domain: String,
    #[serde(default = "default_domain")]
    pub project_domain: String,

    /// Optional CA bundle for self-signed identity endpoints.
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    /// Client certificate/key pair for mutual TLS, both or neither.
    #[serde(default)]
    pub client_cert: Option<PathBuf>,
    #[serde(default)]
    pub client_key: Option<PathBuf>,
}

fn default_domain() -> String {
    "Default".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExemptionConfig {
    /// JSON endpoint returning the currently exempted group ids.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ExemptionConfig {
    /// Endpoint with the environment override applied.
    pub fn resolved_endpoint(&self) -> Option<String> {
        std::env::var(EXEMPTIONS_URL_ENV).ok().or_else(|| self.endpoint.clone())
    }
}

/// One named policy. The rule and data sources are opaque paths handed to
/// the predicate engine; the messages frame that policy's notification
/// batch.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyDefinition {
    pub name: String,
    pub rules: PathBuf,
    #[serde(default)]
    pub data: Option<PathBuf>,
    #[serde(default)]
    pub prefix_message: String,
    #[serde(default)]
    pub suffix_message: String,
}

impl CheckerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let cfg: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        crate::info!(
            "Loaded configuration: {} allow rules, {} policies",
            cfg.allow_rules.len(),
            cfg.policies.len()
        );
        Ok(cfg)
    }
}
