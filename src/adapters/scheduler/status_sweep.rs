//! Periodic status sweep.
//!
//! Runs `RunStatusSweepHandler` on a fixed interval until shutdown. The
//! first sweep happens immediately on start.
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 5m | Time between sweeps |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::application::handlers::{RunStatusSweepHandler, StatusSweepReport};
use crate::config::SchedulerConfig;
use crate::domain::membership::MembershipError;

/// Drives the status sweep in the background.
pub struct StatusSweepScheduler {
    handler: Arc<RunStatusSweepHandler>,
    interval: Duration,
}

impl StatusSweepScheduler {
    pub fn new(handler: Arc<RunStatusSweepHandler>, interval: Duration) -> Self {
        Self { handler, interval }
    }

    pub fn from_config(handler: Arc<RunStatusSweepHandler>, config: &SchedulerConfig) -> Self {
        Self::new(handler, config.status_sweep_interval())
    }

    /// Sweeps until `shutdown` flips to true or its sender is dropped.
    ///
    /// A failed sweep is logged and retried at the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs(), "status sweep scheduler started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("status sweep scheduler stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    // Errors are already logged by run_once.
                    let _ = self.run_once().await;
                }
            }
        }
    }

    /// Runs a single sweep. The handler logs what changed; only failures
    /// are logged here.
    pub async fn run_once(&self) -> Result<StatusSweepReport, MembershipError> {
        self.handler.handle().await.map_err(|e| {
            tracing::error!(error = %e, "status sweep failed");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{today, Fixture};
    use crate::domain::membership::MemberStatus;
    use crate::ports::MembershipReader;
    use chrono::Duration as Days;

    fn scheduler(fx: &Fixture, interval: Duration) -> StatusSweepScheduler {
        let store = Arc::new(fx.store.clone());
        let handler = RunStatusSweepHandler::new(store.clone(), store, fx.clock());
        StatusSweepScheduler::new(Arc::new(handler), interval)
    }

    async fn lapsed_member(fx: &Fixture) -> crate::domain::foundation::MemberId {
        let plan = fx.plan("Monthly", "1000", 30).await;
        let mut cmd = fx.create_command(&plan, "lapsed@gym.test", "1000");
        cmd.start_date = today() - Days::days(40);
        cmd.end_date = today() - Days::days(10);
        fx.create_handler().handle(cmd).await.unwrap().member.id
    }

    #[tokio::test]
    async fn run_once_reports_expired_members() {
        let fx = Fixture::new();
        let id = lapsed_member(&fx).await;

        let report = scheduler(&fx, Duration::from_secs(60)).run_once().await.unwrap();

        assert_eq!(report.expired, 1);
        let view = fx.store.get_member(&id).await.unwrap().unwrap();
        assert_eq!(view.member.status, MemberStatus::Expired);
    }

    #[tokio::test]
    async fn run_sweeps_on_start_and_stops_on_shutdown() {
        let fx = Fixture::new();
        let id = lapsed_member(&fx).await;
        let scheduler = scheduler(&fx, Duration::from_millis(10));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        let view = fx.store.get_member(&id).await.unwrap().unwrap();
        assert_eq!(view.member.status, MemberStatus::Expired);
    }

    #[tokio::test]
    async fn run_stops_when_sender_is_dropped() {
        let fx = Fixture::new();
        let scheduler = scheduler(&fx, Duration::from_secs(3600));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });
        drop(shutdown_tx);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }
}
