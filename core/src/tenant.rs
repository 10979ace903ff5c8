// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Tenant-id to display-label resolution.

use perimeter_common::debug;
use perimeter_common::models::project::Project;

/// Resolves a tenant id to its project name. A miss degrades to the raw
/// id; reporting never aborts over a missing project.
pub fn tenant_label(tenant_id: &str, projects: &[Project]) -> String {
    match projects.iter().find(|p| p.id == tenant_id) {
        Some(project) => project.name.clone(),
        None => {
            debug!("No project found for tenant {tenant_id}, falling back to the raw id");
            tenant_id.to_string()
        }
    }
}
