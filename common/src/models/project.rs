// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

/// A tenant, used only to resolve ids into display labels.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    pub name: String,
}
