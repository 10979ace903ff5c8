// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Chat delivery of finding batches.
//!
//! One batch is a fixed sequence on the incoming webhook: the prefix
//! message, one attachment message per finding, the suffix message. Any
//! failed post aborts the batch; there is no retry.

use anyhow::{Context, bail};
use async_trait::async_trait;
use perimeter_common::config::SlackConfig;
use perimeter_common::debug;
use perimeter_common::models::finding::Finding;
use perimeter_core::sources::Notifier;
use reqwest::Client;
use serde::Serialize;

/// Attachment accent for warnings. Tomato.
const WARNING_COLOR: &str = "#ff6347";

pub struct SlackNotifier {
    webhook_url: String,
    channel: String,
    username: String,
    icon_emoji: String,
    http: Client,
}

impl SlackNotifier {
    pub fn new(cfg: &SlackConfig) -> Self {
        Self {
            webhook_url: cfg.webhook_url.clone(),
            channel: cfg.channel.clone(),
            username: cfg.username.clone(),
            icon_emoji: cfg.icon_emoji.clone(),
            http: Client::new(),
        }
    }

    async fn post(&self, text: &str, attachments: Vec<Attachment>) -> anyhow::Result<()> {
        let message = WebhookMessage {
            channel: &self.channel,
            username: &self.username,
            icon_emoji: &self.icon_emoji,
            text,
            attachments,
        };

        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .context("webhook request failed")?;
        if !resp.status().is_success() {
            bail!("webhook answered with status {}", resp.status());
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn deliver(
        &self,
        findings: &[Finding],
        prefix: &str,
        suffix: &str,
    ) -> anyhow::Result<()> {
        self.post(prefix, Vec::new()).await.context("failed to post the prefix message")?;

        for finding in findings {
            debug!("Posting finding for group {}", finding.group_name);
            self.post("", vec![Attachment::from(finding)])
                .await
                .with_context(|| format!("failed to post the finding for {}", finding.group_name))?;
        }

        self.post(suffix, Vec::new()).await.context("failed to post the suffix message")?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    channel: &'a str,
    username: &'a str,
    icon_emoji: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
struct Attachment {
    color: &'static str,
    fields: Vec<AttachmentField>,
}

#[derive(Debug, Serialize)]
struct AttachmentField {
    title: String,
    value: String,
    short: bool,
}

impl From<&Finding> for Attachment {
    fn from(finding: &Finding) -> Self {
        Self {
            color: WARNING_COLOR,
            fields: finding
                .fields
                .iter()
                .map(|f| AttachmentField {
                    title: f.title.to_string(),
                    value: f.value.clone(),
                    short: f.short,
                })
                .collect(),
        }
    }
}
