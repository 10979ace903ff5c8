// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Typed errors of the evaluation core.
//!
//! Collaborator failures (inventory fetch, allow-list fetch, notification
//! delivery) are plain `anyhow` errors wrapped with phase context at the
//! orchestration boundary; the variants here are the ones the evaluators
//! themselves can produce. Both halt the run where they occur. A tenant
//! resolution miss is deliberately not an error: reporting degrades to the
//! raw id instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// An address could not be parsed during exposure classification.
    /// Callers must treat this as "cannot classify", never as a verdict.
    #[error("cannot classify address '{0}'")]
    InvalidAddress(String),

    /// The policy predicate engine failed to evaluate a fact record.
    /// Fatal to the policy pass it occurred in; a malformed policy must
    /// not yield a partial report.
    #[error("policy evaluation failed: {0}")]
    Evaluation(String),
}
