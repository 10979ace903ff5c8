// Copyright (c) 2026 Perimeter Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Logging subscriber wiring and the phase spinner.
//!
//! The spinner exists for the slow parts of a run: authentication and
//! the paginated inventory fetch can take several seconds on a large
//! deployment, and a silent terminal reads as a hung process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::ProgressStyle;
use tracing_indicatif::{IndicatifLayer, span_ext::IndicatifSpanExt};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::terminal::logging;

/// Wires up the global tracing subscriber.
///
/// The layer stack, bottom to top:
/// 1.  **Filter**: `RUST_LOG` or a default that keeps dependency noise
///     (hyper, reqwest) out of the audit log.
/// 2.  **Formatter**: the custom [`logging::AuditFormatter`].
/// 3.  **Indicatif**: makes logs print *above* the spinner line.
pub fn init_logging(verbosity: u8) {
    let indicatif_layer = IndicatifLayer::new().with_progress_style(
        ProgressStyle::with_template("{spinner:.yellow} {msg}")
            .unwrap()
            .tick_strings(&["▹▹▹▹", "▸▹▹▹", "▹▸▹▹", "▹▹▸▹", "▹▹▹▸", "▹▹▹▹"]),
    );

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "info,perimeter_core=debug,perimeter_cloud=debug,perimeter_policy=debug,hyper=error,reqwest=warn",
        )
    });

    let formatting_layer = tracing_subscriber::fmt::layer()
        .event_format(logging::AuditFormatter {
            max_verbosity: verbosity,
        })
        .with_writer(indicatif_layer.get_stderr_writer());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(formatting_layer)
        .with(indicatif_layer)
        .init();
}

/// A RAII guard that keeps a phase spinner alive.
///
/// When this struct is dropped (at the end of the guarded block), it
/// signals the background task to stop and clears the line.
pub struct SpinnerGuard {
    running: Arc<AtomicBool>,
    handle: tokio::task::JoinHandle<()>,
}

impl SpinnerGuard {
    /// Starts a spinner showing a fixed phase message.
    pub fn phase(message: &'static str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let run_clone = running.clone();

        // Spawn off the main task so evaluation isn't blocked by UI updates.
        let handle = tokio::spawn(async move {
            let span = tracing::info_span!("phase");
            span.pb_set_message(message);

            let mut interval = tokio::time::interval(Duration::from_millis(100));
            while run_clone.load(Ordering::Relaxed) {
                interval.tick().await;
            }
        });

        Self { running, handle }
    }
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        // Signal the loop to exit and abort the handle in case it's stuck sleeping.
        self.running.store(false, Ordering::Relaxed);
        self.handle.abort();
    }
}
