// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! The dynamic allow-list source.

use anyhow::{Context, bail};
use async_trait::async_trait;
use perimeter_common::debug;
use perimeter_common::models::allow::ExemptionList;
use perimeter_core::sources::ExemptionSource;
use reqwest::Client;

/// Fetches the temporarily exempted group ids from a JSON endpoint once
/// per run. The endpoint answers a plain array of id strings; an empty
/// array is a valid answer.
pub struct HttpExemptionSource {
    endpoint: String,
    http: Client,
}

impl HttpExemptionSource {
    pub fn new(endpoint: String) -> Self {
        Self { endpoint, http: Client::new() }
    }
}

#[async_trait]
impl ExemptionSource for HttpExemptionSource {
    async fn fetch(&self) -> anyhow::Result<ExemptionList> {
        debug!("GET {}", self.endpoint);
        let resp = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.endpoint))?;
        if !resp.status().is_success() {
            bail!("{} answered with status {}", self.endpoint, resp.status());
        }
        let ids: Vec<String> =
            resp.json().await.context("exemption endpoint returned malformed JSON")?;
        Ok(ExemptionList::new(ids))
    }
}

/// A fixed list, used when no endpoint is configured.
pub struct StaticExemptionSource(pub ExemptionList);

#[async_trait]
impl ExemptionSource for StaticExemptionSource {
    async fn fetch(&self) -> anyhow::Result<ExemptionList> {
        Ok(self.0.clone())
    }
}
