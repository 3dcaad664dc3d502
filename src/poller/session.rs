use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::target::RenderTarget;
use crate::client::{ClientError, SnapshotSource};
use crate::config::MonitorConfig;
use crate::render::{RenderedView, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub period: Duration,
    /// Skip a tick while the previous cycle is still in flight.
    pub skip_overlapping: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            skip_overlapping: false,
        }
    }
}

impl From<&MonitorConfig> for SchedulerConfig {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            period: config.poll_interval(),
            skip_overlapping: config.skip_overlapping_cycles,
        }
    }
}

#[derive(Debug, Default)]
struct CycleStats {
    started: AtomicU64,
    rendered: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleCounts {
    pub started: u64,
    pub rendered: u64,
    pub failed: u64,
    pub skipped: u64,
}

/// One fetch-then-render pass shared by every tick of a session.
struct PollCycle {
    session: Uuid,
    source: Arc<dyn SnapshotSource>,
    target: Arc<dyn RenderTarget>,
    views: Vec<Box<dyn View>>,
    stats: CycleStats,
}

impl PollCycle {
    async fn execute(&self) -> Result<(), ClientError> {
        self.stats.started.fetch_add(1, Ordering::Relaxed);

        let snapshot = match self.source.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                warn!(session = %self.session, "Status poll failed, keeping last render: {}", e);
                return Err(e);
            }
        };

        let rendered: Vec<RenderedView> = {
            let view = snapshot.view();
            self.views.iter().map(|v| v.render(&view)).collect()
        };
        for output in &rendered {
            self.target.present(output).await;
        }

        self.stats.rendered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn counts(&self) -> CycleCounts {
        CycleCounts {
            started: self.stats.started.load(Ordering::Relaxed),
            rendered: self.stats.rendered.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
            skipped: self.stats.skipped.load(Ordering::Relaxed),
        }
    }
}

/// A polling loop bound to one set of views and one render target.
///
/// `start` renders immediately and then once per period. A failed cycle is
/// logged and skipped; the next tick still fires on schedule. Cycles may
/// overlap unless `skip_overlapping` is set, in which case the last response
/// to resolve wins. The loop runs until `shutdown` or drop.
pub struct DashboardSession {
    id: Uuid,
    cycle: Arc<PollCycle>,
    config: SchedulerConfig,
    timer: Option<JoinHandle<()>>,
}

impl DashboardSession {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        target: Arc<dyn RenderTarget>,
        views: Vec<Box<dyn View>>,
        config: SchedulerConfig,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            cycle: Arc::new(PollCycle {
                session: id,
                source,
                target,
                views,
                stats: CycleStats::default(),
            }),
            config,
            timer: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    pub fn counts(&self) -> CycleCounts {
        self.cycle.counts()
    }

    /// Runs a single cycle outside the schedule.
    pub async fn run_cycle(&self) -> Result<(), ClientError> {
        self.cycle.execute().await
    }

    /// Starts the timer. Must be called inside a tokio runtime; calling it on
    /// a running session does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let views: Vec<String> = self.cycle.views.iter().map(|v| v.kind().to_string()).collect();
        info!(
            session = %self.id,
            "Dashboard session started: views={:?}, period={:?}",
            views,
            self.config.period
        );
        self.timer = Some(tokio::spawn(drive(
            Arc::clone(&self.cycle),
            self.config.clone(),
        )));
    }

    /// Stops the timer and cancels any cycle still in flight.
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            info!(session = %self.id, "Dashboard session stopped");
        }
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Clears the in-flight flag when a cycle ends, panicked or not.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn drive(cycle: Arc<PollCycle>, config: SchedulerConfig) {
    let mut ticker = time::interval(config.period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let in_flight = Arc::new(AtomicBool::new(false));
    // Dropping the set when the timer is aborted aborts the cycles too.
    let mut cycles = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if in_flight.swap(true, Ordering::AcqRel) && config.skip_overlapping {
                    cycle.stats.skipped.fetch_add(1, Ordering::Relaxed);
                    debug!(session = %cycle.session, "Previous cycle still running, skipping tick");
                } else {
                    let cycle = Arc::clone(&cycle);
                    let in_flight = Arc::clone(&in_flight);
                    cycles.spawn(async move {
                        let _done = InFlightGuard(in_flight);
                        let _ = cycle.execute().await;
                    });
                }
            }
            Some(joined) = cycles.join_next(), if !cycles.is_empty() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        warn!(session = %cycle.session, "Poll cycle panicked: {}", e);
                    }
                }
            }
        }
    }
}
