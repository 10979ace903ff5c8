// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::{fmt::Display, sync::OnceLock};

use anyhow::bail;
use colored::*;
use perimeter_common::config::RunOptions;
use perimeter_common::models::finding::{Finding, FindingKind};
use perimeter_core::runner::AuditOutcome;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{banner, colors};

pub const TOTAL_WIDTH: usize = 64;

/// Key column width for aligned detail lines.
const KEY_WIDTH: usize = 10;

static PRINT: OnceLock<Print> = OnceLock::new();

/// Raw terminal output routed through tracing so lines interleave
/// cleanly with the log stream and the spinner.
#[macro_export]
macro_rules! pprint {
    () => {
        $crate::pprint!("");
    };
    ($($arg:tt)*) => {
        tracing::info!(
            target: "perimeter::print",
            raw_msg = %format_args!($($arg)*)
        );
    };
}

pub struct Print {
    no_banner: bool,
    q_level: u8,
}

impl Print {
    fn new(opts: &RunOptions) -> Self {
        Self {
            no_banner: opts.no_banner,
            q_level: opts.quiet,
        }
    }

    pub fn init(opts: &RunOptions) -> anyhow::Result<()> {
        let term = Self::new(opts);
        if PRINT.set(term).is_err() {
            bail!("terminal has already been initialized")
        }
        Ok(())
    }

    fn get() -> &'static Self {
        PRINT.get().expect("terminal has not been initialized")
    }

    pub fn banner() {
        let p = Self::get();
        if p.no_banner || p.q_level > 0 {
            return;
        }

        let text_content: String = format!("⟦ PERIMETER v{} ⟧ ", env!("CARGO_PKG_VERSION"));
        let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
        let text: ColoredString = text_content.bright_green().bold();
        let sep: ColoredString = "═"
            .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
            .bright_black();

        pprint!("{}{}{}", sep, text, sep);
        banner::print();
    }

    pub fn header(msg: &str) {
        let p = Self::get();
        if p.q_level > 0 {
            pprint!();
            return;
        }

        let formatted: String = format!("⟦ {} ⟧", msg);
        let msg_len: usize = formatted.chars().count();

        let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
        let left: usize = dash_count / 2;
        let right: usize = dash_count - left;

        let line: ColoredString = format!(
            "{}{}{}",
            "─".repeat(left),
            formatted.to_uppercase().bright_green(),
            "─".repeat(right)
        )
        .bright_black();

        pprint!("{}", line);
    }

    /// Renders a completed audit: finding trees, `[[allow]]` snippets for
    /// open-access findings, and the closing summary.
    pub fn outcome(outcome: &AuditOutcome) {
        let p = Self::get();

        if p.q_level >= 2 {
            Self::raw_outcome(outcome);
            return;
        }

        if outcome.open_access.any_open {
            Self::header("open access findings");
            Self::findings(&outcome.open_access.findings);
        }

        for (name, findings) in &outcome.policy_findings {
            if !findings.is_empty() {
                Self::header(&format!("policy: {name}"));
                Self::findings(findings);
            }
        }

        Self::summary(outcome);
    }

    /// One line per finding, suitable for piping into other tools.
    fn raw_outcome(outcome: &AuditOutcome) {
        for finding in &outcome.open_access.findings {
            pprint!(
                "open-access\t{}\t{}\t{}\t{}",
                finding.tenant,
                finding.group_id,
                finding.group_name,
                finding.port_range().unwrap_or("-")
            );
        }
        for (name, findings) in &outcome.policy_findings {
            for finding in findings {
                pprint!(
                    "policy-match\t{}\t{}\t{}\t{}",
                    name,
                    finding.tenant,
                    finding.group_id,
                    finding.group_name
                );
            }
        }
    }

    fn findings(findings: &[Finding]) {
        for (idx, finding) in findings.iter().enumerate() {
            Self::finding_tree(idx, finding);
            if finding.kind == FindingKind::OpenAccess {
                Self::allow_snippet(finding);
            }
            if idx + 1 != findings.len() {
                pprint!();
            }
        }
    }

    fn finding_tree(idx: usize, finding: &Finding) {
        tree_head(idx, &format!("{} ({})", finding.group_name, finding.tenant));

        let details: Vec<(String, ColoredString)> = finding
            .fields
            .iter()
            .map(|f| {
                let color = match f.title {
                    "PortRange" | "Rules" => colors::ALERT,
                    "Tenant" => colors::TENANT,
                    "ID" | "Created" => colors::SECONDARY,
                    _ => colors::TEXT_DEFAULT,
                };
                (f.title.to_string(), f.value.color(color))
            })
            .collect();

        as_tree(details);
    }

    /// The paste-ready exception entry, dimmed below the finding so
    /// operators can lift it straight into the configuration file.
    fn allow_snippet(finding: &Finding) {
        for line in finding.allow_snippet().lines() {
            pprint!("     {}", line.color(colors::SEPARATOR).italic());
        }
    }

    fn summary(outcome: &AuditOutcome) {
        let p = Self::get();
        let open = outcome.open_access.findings.len();
        let policy: usize = outcome.policy_findings.iter().map(|(_, f)| f.len()).sum();

        if open + policy == 0 {
            if p.q_level == 0 && !p.no_banner {
                Self::header("no findings");
                pprint!("{}", banner::ALL_CLEAR.green().bold());
            }
            return;
        }

        let open_str: ColoredString = format!("{open} open-access").bold().red();
        let policy_str: ColoredString = format!("{policy} policy").bold().yellow();
        let output: &ColoredString = &format!("Audit complete: {open_str}, {policy_str} finding(s)")
            .color(colors::TEXT_DEFAULT);

        match p.q_level {
            0 => {
                divider();
                centerln(&output.to_string());
            }
            _ => {
                pprint!();
                perimeter_common::warn!("{output}");
            }
        }
    }

    pub fn end_of_program() {
        let p = Self::get();
        if p.q_level > 0 {
            return;
        }
        pprint!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR));
    }
}

pub fn divider() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    pprint!("{}", sep);
}

pub fn aligned_line<V: Display>(key: &str, value: V) {
    let dots: String = ".".repeat((KEY_WIDTH + 1).saturating_sub(key.len()));
    pprint!(
        "{} {}{}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value.to_string().color(colors::TEXT_DEFAULT)
    );
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    pprint!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    );
}

/// Renders key/value details as a tree. Multi-line values (like rule
/// dumps) continue under their branch, indented past the key column.
pub fn as_tree(details: Vec<(String, ColoredString)>) {
    let padding_width: usize = details.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    for (i, (key, value)) in details.iter().enumerate() {
        let last: bool = i + 1 == details.len();
        let branch: ColoredString = if !last { "├─" } else { "└─" }.bright_black();

        let dots_count: usize = padding_width.saturating_sub(key.len());
        let dots: ColoredString = ".".repeat(dots_count).color(colors::SEPARATOR);

        let mut lines = value.to_string();
        if !lines.contains('\n') {
            pprint!(
                " {} {}{}{} {}",
                branch,
                key.color(colors::TEXT_DEFAULT),
                dots,
                ":".color(colors::SEPARATOR),
                value
            );
            continue;
        }

        // Continuation lines keep the tree shape readable.
        let first = lines.lines().next().unwrap_or_default().to_string();
        pprint!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            dots,
            ":".color(colors::SEPARATOR),
            first
        );
        let cont_branch = if !last { "│ " } else { "  " };
        lines = lines.lines().skip(1).collect::<Vec<_>>().join("\n");
        for line in lines.lines() {
            pprint!(
                " {} {}{}",
                cont_branch.bright_black(),
                " ".repeat(padding_width + 2),
                line
            );
        }
    }
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(UnicodeWidthStr::width(msg)) / 2);
    pprint!("{}{}{}", space, msg, space);
}
