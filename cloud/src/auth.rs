// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Keystone v3 authentication and session setup.
//!
//! Produces a [`Session`]: an HTTP client carrying the TLS material from
//! configuration, the subject token, and the public network/identity
//! endpoints for the configured region as discovered from the service
//! catalog.

use std::path::Path;

use anyhow::{Context, bail};
use perimeter_common::config::OpenStackConfig;
use perimeter_common::{info, success};
use reqwest::{Certificate, Client, Identity};
use serde::Deserialize;
use serde_json::json;

/// Credentials and endpoints for one identity, layered from the config
/// file and the conventional OS_* environment variables. Username and
/// password come exclusively from the environment.
#[derive(Debug, Clone)]
pub struct AuthOptions {
    pub auth_url: String,
    pub region: String,
    pub username: String,
    pub password: String,
    pub project_name: String,
    pub user_domain: String,
    pub project_domain: String,
}

impl AuthOptions {
    pub fn from_config_env(cfg: &OpenStackConfig) -> anyhow::Result<Self> {
        let username = std::env::var("OS_USERNAME").context("OS_USERNAME is not set")?;
        let password = std::env::var("OS_PASSWORD").context("OS_PASSWORD is not set")?;
        let auth_url = std::env::var("OS_AUTH_URL").unwrap_or_else(|_| cfg.auth_url.clone());
        let project_name =
            std::env::var("OS_PROJECT_NAME").unwrap_or_else(|_| cfg.project_name.clone());

        if auth_url.is_empty() {
            bail!("no authentication endpoint configured");
        }

        Ok(Self {
            auth_url,
            region: cfg.region.clone(),
            username,
            password,
            project_name,
            user_domain: cfg.user_domain.clone(),
            project_domain: cfg.project_domain.clone(),
        })
    }
}

/// An authenticated API session.
#[derive(Debug, Clone)]
pub struct Session {
    pub http: Client,
    pub token: String,
    pub network_url: String,
    pub identity_url: String,
}

pub async fn authenticate(opts: &AuthOptions, cfg: &OpenStackConfig) -> anyhow::Result<Session> {
    let http = build_client(cfg).context("failed to build the TLS client")?;

    let body = json!({
        "auth": {
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": opts.username,
                        "domain": { "name": opts.user_domain },
                        "password": opts.password,
                    }
                }
            },
            "scope": {
                "project": {
                    "name": opts.project_name,
                    "domain": { "name": opts.project_domain },
                }
            }
        }
    });

    let url = format!("{}/auth/tokens", opts.auth_url.trim_end_matches('/'));
    info!("Authenticating against {url}");

    let resp = http.post(&url).json(&body).send().await.context("token request failed")?;
    if !resp.status().is_success() {
        bail!("authentication rejected with status {}", resp.status());
    }

    let token = resp
        .headers()
        .get("x-subject-token")
        .and_then(|v| v.to_str().ok())
        .context("identity service returned no subject token")?
        .to_string();

    let catalog: TokenResponse = resp.json().await.context("malformed token response")?;

    let network_url = public_endpoint(&catalog, "network", &opts.region)
        .context("no public network endpoint in the catalog")?;
    let identity_url = public_endpoint(&catalog, "identity", &opts.region)
        .context("no public identity endpoint in the catalog")?;
    success!("Authenticated, network endpoint is {network_url}");

    Ok(Session { http, token, network_url, identity_url })
}

/// The CA bundle and client keypair are both optional; a keypair needs
/// both halves to be loaded.
fn build_client(cfg: &OpenStackConfig) -> anyhow::Result<Client> {
    let mut builder = Client::builder();

    if let Some(ca) = &cfg.ca_cert {
        let pem = read_pem(ca)?;
        builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
    }

    if let (Some(cert), Some(key)) = (&cfg.client_cert, &cfg.client_key) {
        let mut pem = read_pem(cert)?;
        pem.extend(read_pem(key)?);
        builder = builder.identity(Identity::from_pem(&pem)?);
    }

    Ok(builder.build()?)
}

fn read_pem(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    interface: String,
    region: String,
    url: String,
}

fn public_endpoint(resp: &TokenResponse, service: &str, region: &str) -> Option<String> {
    resp.token
        .catalog
        .iter()
        .filter(|entry| entry.service_type == service)
        .flat_map(|entry| entry.endpoints.iter())
        .find(|ep| ep.interface == "public" && ep.region == region)
        .map(|ep| ep.url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::{TokenResponse, public_endpoint};

    fn catalog() -> TokenResponse {
        serde_json::from_str(
            r#"{
                "token": {
                    "catalog": [
                        {
                            "type": "network",
                            "endpoints": [
                                {"interface": "internal", "region": "r1", "url": "http://int:9696"},
                                {"interface": "public", "region": "r1", "url": "http://pub:9696/"},
                                {"interface": "public", "region": "r2", "url": "http://other:9696"}
                            ]
                        },
                        {
                            "type": "identity",
                            "endpoints": [
                                {"interface": "public", "region": "r1", "url": "http://keystone:5000"}
                            ]
                        }
                    ]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn picks_the_public_endpoint_for_the_region() {
        let resp = catalog();
        assert_eq!(
            public_endpoint(&resp, "network", "r1").as_deref(),
            Some("http://pub:9696")
        );
        assert_eq!(
            public_endpoint(&resp, "network", "r2").as_deref(),
            Some("http://other:9696")
        );
        assert_eq!(
            public_endpoint(&resp, "identity", "r1").as_deref(),
            Some("http://keystone:5000")
        );
    }

    #[test]
    fn missing_service_or_region_is_none() {
        let resp = catalog();
        assert!(public_endpoint(&resp, "compute", "r1").is_none());
        assert!(public_endpoint(&resp, "network", "r9").is_none());
    }

    #[test]
    fn empty_catalog_parses() {
        let resp: TokenResponse = serde_json::from_str(r#"{"token": {}}"#).unwrap();
        assert!(public_endpoint(&resp, "network", "r1").is_none());
    }
}
