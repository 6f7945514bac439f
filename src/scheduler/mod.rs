//! Periodic re-verification sweep driver.
//!
//! Runs [`VerificationService::run_sweep`] on a fixed schedule (hourly by
//! default). The schedule is expressed as a cron expression derived from
//! the configured interval; if that expression cannot be parsed, a plain
//! tokio interval timer drives the loop instead.

use crate::config::Config;
use crate::verify::{SweepStats, VerificationService};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct VerificationScheduler {
    service: Arc<VerificationService>,
    schedule: Option<Schedule>,
    interval_seconds: u64,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl VerificationScheduler {
    pub fn new(service: Arc<VerificationService>, config: &Config) -> Self {
        let interval_seconds = config.sweep_interval_seconds.max(1);

        let cron_expr = Self::cron_expression(interval_seconds);
        let schedule = match Schedule::from_str(&cron_expr) {
            Ok(schedule) => Some(schedule),
            Err(e) => {
                warn!(
                    cron = %cron_expr,
                    error = %e,
                    "invalid cron expression, falling back to interval timer"
                );
                None
            }
        };

        Self {
            service,
            schedule,
            interval_seconds,
            handle: Arc::new(RwLock::new(None)),
        }
    }

    /// Cron format: second minute hour day month weekday. A minute-step
    /// expression cannot express an hour: `*/59` matches minutes 0 and 59
    /// and would double-fire, so hour-scale intervals get an hour step.
    fn cron_expression(interval_seconds: u64) -> String {
        if interval_seconds >= 3600 {
            format!("0 0 */{} * * *", (interval_seconds / 3600).clamp(1, 23))
        } else if interval_seconds >= 60 {
            format!("0 */{} * * * *", (interval_seconds / 60).clamp(1, 59))
        } else {
            format!("*/{} * * * * *", interval_seconds)
        }
    }

    /// Start the background sweep loop. Idempotent: a second start while
    /// running is a no-op.
    pub async fn start(&self) {
        let mut handle_slot = self.handle.write().await;
        if handle_slot.is_some() {
            info!("VerificationScheduler: already running");
            return;
        }

        let service = self.service.clone();
        let schedule = self.schedule.clone();
        let interval_seconds = self.interval_seconds;

        let handle = tokio::spawn(async move {
            info!(
                interval = interval_seconds,
                "VerificationScheduler: started"
            );

            loop {
                match &schedule {
                    Some(schedule) => {
                        let mut upcoming = schedule.upcoming(chrono::Utc);
                        if let Some(next_tick) = upcoming.next() {
                            let now = chrono::Utc::now();
                            if next_tick > now {
                                let wait = (next_tick - now).to_std().unwrap_or_default();
                                tokio::time::sleep(wait).await;
                            }
                        } else {
                            tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                            continue;
                        }
                    }
                    None => {
                        tokio::time::sleep(tokio::time::Duration::from_secs(interval_seconds))
                            .await;
                    }
                }

                info!("VerificationScheduler: sweep tick");
                let stats = service.run_sweep().await;
                if stats.checked == 0 {
                    info!("VerificationScheduler: nothing pending");
                } else {
                    info!(
                        checked = stats.checked,
                        updated = stats.updated,
                        "VerificationScheduler: sweep finished"
                    );
                }
            }
        });

        *handle_slot = Some(handle);
    }

    /// Stop the background loop. A sweep already in flight is aborted;
    /// per-judgment verification is idempotent so this is safe.
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("VerificationScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }

    /// Run one sweep immediately, outside the schedule.
    pub async fn trigger_now(&self) -> SweepStats {
        info!("VerificationScheduler: manual trigger");
        self.service.run_sweep().await
    }
}
