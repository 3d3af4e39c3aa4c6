//! Run-mode drivers: single pass, polling daemon and channel connectivity test

use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::core::cycle::{CycleReport, EvaluationCycle};
use crate::models::Notification;
use crate::services::{DeliveryReport, NotificationHub};

/// Drives an [`EvaluationCycle`] once or on a fixed interval.
pub struct AlertRuntime {
    cycle: EvaluationCycle,
    interval: Duration,
}

impl AlertRuntime {
    pub fn new(cycle: EvaluationCycle, interval: Duration) -> Self {
        Self { cycle, interval }
    }

    pub fn cycle(&self) -> &EvaluationCycle {
        &self.cycle
    }

    pub async fn run_once(&mut self) -> Vec<CycleReport> {
        let reports = self.cycle.run_all().await;
        let failed = reports.iter().filter(|r| r.is_failure()).count();
        let events: usize = reports.iter().map(|r| r.events().len()).sum();
        info!(
            pairs = reports.len(),
            failed,
            events,
            "AlertRuntime: cycle complete"
        );
        reports
    }

    /// Run cycles until `shutdown` flips to `true` (or its sender is dropped).
    ///
    /// Only the sleep between cycles is interrupted; a running cycle completes first.
    /// Returns the number of cycles run.
    pub async fn run_daemon(&mut self, mut shutdown: watch::Receiver<bool>) -> usize {
        info!(
            interval_secs = self.interval.as_secs(),
            pairs = self.cycle.pairs().len(),
            "AlertRuntime: daemon started"
        );

        let mut cycles = 0;
        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_once().await;
            cycles += 1;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        warn!("AlertRuntime: shutdown channel closed, stopping");
                    }
                    break;
                }
            }
        }

        info!(cycles, "AlertRuntime: daemon stopped");
        cycles
    }
}

/// Send the canned test message through every channel.
pub async fn run_connectivity_test(hub: &NotificationHub) -> DeliveryReport {
    if hub.is_empty() {
        warn!("Connectivity test: no notification channel configured");
    }

    let report = hub.broadcast(&Notification::connectivity_test()).await;
    for failure in &report.failures {
        error!(
            channel = failure.channel(),
            error = %failure,
            "Connectivity test: channel failed"
        );
    }
    info!(
        delivered = ?report.delivered,
        failed = report.failures.len(),
        "Connectivity test finished"
    );
    report
}
