// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use colored::*;

use crate::pprint;

const ART: &str = r#"
    ███████╗ ███████╗ ███████╗ ██╗ ███╗   ███╗
    ██╔══██║ ██╔════╝ ██╔══██║ ██║ ████╗ ████║ ██╗
    ███████║ ██████╗  ███████║ ██║ ██╔████╔██║ ╚═╝
    ██╔════╝ ██╔═══╝  ██╔═██╔╝ ██║ ██║╚██╔╝██║ ██╗
    ██║      ███████╗ ██║ ╚██╗ ██║ ██║ ╚═╝ ██║ ╚═╝
    ╚═╝      ╚══════╝ ╚═╝  ╚═╝ ╚═╝ ╚═╝     ╚═╝
"#;

pub const ALL_CLEAR: &str = r#"
        every reachable security group is guarded
"#;

pub fn print() {
    for line in ART.lines() {
        pprint!("{}", line.bright_green());
    }
}
