//! The long-running monitor loop.
//!
//! Each iteration snapshots the current vocabulary, runs one check cycle,
//! and idles until the next one. Idling is sliced so a shutdown signal is
//! honored within seconds even with hour-long check intervals.

use std::path::PathBuf;
use std::time::Duration;

use docwatch_extract::ExtractOptions;
use tokio::sync::watch;

use crate::config_watch::VocabHandle;
use crate::cycle::{run_check_cycle, CycleDeps, CycleSettings};

const SLEEP_SLICE: Duration = Duration::from_secs(5);

/// Loop-level parameters.
pub struct MonitorSettings {
    pub record_code: String,
    pub check_interval: Duration,
    pub extract_opts: ExtractOptions,
    pub page_dump_dir: Option<PathBuf>,
}

/// Sleeps for `total`, waking early when `shutdown` flips to `true` or its
/// sender goes away. Returns `true` when shutdown was requested.
pub async fn interruptible_sleep(total: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }
    let mut remaining = total;
    while !remaining.is_zero() {
        let slice = remaining.min(SLEEP_SLICE);
        tokio::select! {
            () = tokio::time::sleep(slice) => {
                remaining = remaining.saturating_sub(slice);
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
    false
}

/// Runs check cycles until `shutdown` flips to `true`.
///
/// A failed cycle is logged and the loop continues; the baseline from the
/// last successful cycle stays in place.
pub async fn run_monitor(
    deps: &CycleDeps<'_>,
    settings: &MonitorSettings,
    vocab: &VocabHandle,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::info!(
        record_code = %settings.record_code,
        interval_secs = settings.check_interval.as_secs(),
        "monitor started"
    );
    loop {
        let snapshot = vocab.snapshot();
        let cycle_settings = CycleSettings {
            record_code: &settings.record_code,
            extract_opts: settings.extract_opts,
            page_dump_dir: settings.page_dump_dir.as_deref(),
        };
        match run_check_cycle(deps, &cycle_settings, &snapshot).await {
            Ok(outcome) => {
                tracing::info!(
                    changed = outcome.changed,
                    kind = %outcome.kind,
                    "check cycle complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "check cycle failed");
            }
        }

        if interruptible_sleep(settings.check_interval, &mut shutdown).await {
            tracing::info!("monitor stopping");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleep_runs_to_completion_without_shutdown() {
        let (_tx, mut rx) = watch::channel(false);
        let start = tokio::time::Instant::now();
        assert!(!interruptible_sleep(Duration::from_secs(60), &mut rx).await);
        assert!(start.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_wakes_on_shutdown_signal() {
        let (tx, mut rx) = watch::channel(false);
        let sleeper = tokio::spawn(async move {
            interruptible_sleep(Duration::from_secs(3600), &mut rx).await
        });
        tx.send(true).unwrap();
        assert!(sleeper.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_returns_immediately_when_already_shut_down() {
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();
        let start = tokio::time::Instant::now();
        assert!(interruptible_sleep(Duration::from_secs(3600), &mut rx).await);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_treats_dropped_sender_as_shutdown() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        assert!(interruptible_sleep(Duration::from_secs(3600), &mut rx).await);
    }
}
