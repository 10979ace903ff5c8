// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Perimeter Cloud Collaborators
//!
//! OpenStack-facing implementations of the core's capability traits:
//! Keystone authentication and session setup, paginated Neutron/Keystone
//! inventory fetching, the HTTP exemption-list source and the Slack
//! webhook notifier. Wire shapes stay in this crate; everything crossing
//! into the core is a typed record.

pub mod allowlist;
pub mod auth;
pub mod inventory;
pub mod notify;
