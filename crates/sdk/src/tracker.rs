//! Task Lifecycle Tracker
//!
//! Polls a submitted task until the server reports a terminal status,
//! enforcing an optional local deadline. One task per tracker instance;
//! concurrent trackers share nothing but the transport.
//!
//! The clock and the suspension strategy are ports, so the same state machine
//! runs under tokio in production and under scripted time in tests, and
//! callers on other runtimes can supply their own waiter.

use crate::error::{Error, Result};
use crate::types::Task;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default interval between status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Default local deadline (20 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1200);

/// Where task snapshots come from (allows polling without a live server).
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch(&self, task_id: &str) -> Result<Task>;
}

/// Monotonic clock interface (allows mocking in tests).
///
/// Backed by a monotonic source in production, so the deadline is immune to
/// wall-clock adjustments.
pub trait MonotonicClock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Instant-backed clock (production).
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Suspension strategy between polls.
///
/// The production impl is a plain async sleep; it never blocks a thread, so
/// any number of trackers can wait concurrently and independently.
#[async_trait]
pub trait PollWait: Send + Sync {
    async fn wait(&self, interval: Duration);
}

/// tokio sleep waiter (production).
pub struct SleepWait;

#[async_trait]
impl PollWait for SleepWait {
    async fn wait(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

/// Tracker knobs. Poll interval and timeout are independent.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    /// `None` waits forever; only a terminal status ends the loop.
    pub timeout: Option<Duration>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl TrackerConfig {
    pub fn no_timeout() -> Self {
        Self {
            timeout: None,
            ..Default::default()
        }
    }
}

/// Outcome of inspecting one fetched snapshot.
#[derive(Debug, PartialEq, Eq)]
enum PollDecision {
    /// Terminal status reached; return the snapshot immediately.
    Finished,
    /// Local deadline exceeded; stop waiting (the remote task keeps running).
    DeadlineExceeded(Duration),
    /// Still in progress; wait one interval and fetch again.
    Continue,
}

/// Client-side component polling a single task to completion.
pub struct TaskTracker {
    source: Arc<dyn TaskSource>,
    clock: Arc<dyn MonotonicClock>,
    waiter: Arc<dyn PollWait>,
    config: TrackerConfig,
}

impl TaskTracker {
    pub fn new(source: Arc<dyn TaskSource>, config: TrackerConfig) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock::new()),
            waiter: Arc::new(SleepWait),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn MonotonicClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_waiter(mut self, waiter: Arc<dyn PollWait>) -> Self {
        self.waiter = waiter;
        self
    }

    /// Poll until the task reaches a terminal status.
    ///
    /// `submitted` is the snapshot returned by task creation. Its
    /// terminal-ness is checked before the first wait, so a task that
    /// finished between submission and tracking returns without a fetch.
    ///
    /// The deadline is checked strictly before each wait; total excess
    /// waiting past the timeout is bounded by one poll interval. Fetch
    /// failures propagate as-is, with no retry.
    pub async fn wait_until_terminal(&self, submitted: Task) -> Result<Task> {
        let started = self.clock.now_millis();
        let task_id = submitted.id.clone();

        if submitted.status.is_terminal() {
            info!(
                task_id = %task_id,
                status = %submitted.status,
                "Task already terminal at submission"
            );
            return Ok(submitted);
        }

        loop {
            let task = self.source.fetch(&task_id).await?;
            let elapsed =
                Duration::from_millis(self.clock.now_millis().saturating_sub(started));

            match self.decide(&task, elapsed) {
                PollDecision::Finished => {
                    info!(
                        task_id = %task.id,
                        status = %task.status,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Task reached terminal status"
                    );
                    return Ok(task);
                }
                PollDecision::DeadlineExceeded(timeout) => {
                    warn!(
                        task_id = %task_id,
                        timeout_secs = timeout.as_secs(),
                        "Gave up waiting for task"
                    );
                    return Err(Error::TaskTimeout { task_id, timeout });
                }
                PollDecision::Continue => {
                    debug!(
                        task_id = %task.id,
                        status = %task.status,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Task still in progress"
                    );
                    self.waiter.wait(self.config.poll_interval).await;
                }
            }
        }
    }

    /// The state machine step. Terminal-ness wins over the deadline: a
    /// snapshot that is both terminal and late still ends the loop normally.
    fn decide(&self, task: &Task, elapsed: Duration) -> PollDecision {
        if task.status.is_terminal() {
            return PollDecision::Finished;
        }
        match self.config.timeout {
            Some(timeout) if elapsed >= timeout => PollDecision::DeadlineExceeded(timeout),
            _ => PollDecision::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskStatus;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            status,
            result_summary: None,
            created_at: None,
            started_at: None,
            completed_at: None,
        }
    }

    struct FakeSource {
        snapshots: Mutex<VecDeque<Task>>,
        fetches: AtomicUsize,
    }

    impl FakeSource {
        fn new(snapshots: Vec<Task>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots.into()),
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TaskSource for FakeSource {
        async fn fetch(&self, _task_id: &str) -> Result<Task> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let mut snapshots = self.snapshots.lock().unwrap();
            let next = snapshots.front().cloned().expect("no snapshot scripted");
            if snapshots.len() > 1 {
                snapshots.pop_front();
            }
            Ok(next)
        }
    }

    struct ManualClock {
        now: AtomicU64,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: AtomicU64::new(0),
            }
        }

        fn advance(&self, millis: u64) {
            self.now.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl MonotonicClock for ManualClock {
        fn now_millis(&self) -> u64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    /// Waiter that advances a manual clock instead of sleeping.
    struct AdvancingWait {
        clock: Arc<ManualClock>,
        step_millis: u64,
    }

    #[async_trait]
    impl PollWait for AdvancingWait {
        async fn wait(&self, _interval: Duration) {
            self.clock.advance(self.step_millis);
        }
    }

    struct NoopWait;

    #[async_trait]
    impl PollWait for NoopWait {
        async fn wait(&self, _interval: Duration) {}
    }

    #[tokio::test]
    async fn test_returns_terminal_snapshot_after_two_polls() {
        let mut completed = task("T1", TaskStatus::Completed);
        completed.result_summary = Some("done".to_string());
        let source = Arc::new(FakeSource::new(vec![
            task("T1", TaskStatus::Queued),
            completed,
        ]));

        let tracker = TaskTracker::new(
            Arc::clone(&source) as Arc<dyn TaskSource>,
            TrackerConfig {
                poll_interval: Duration::ZERO,
                timeout: None,
            },
        )
        .with_waiter(Arc::new(NoopWait));

        let result = tracker
            .wait_until_terminal(task("T1", TaskStatus::Queued))
            .await
            .unwrap();

        assert_eq!(result.status, TaskStatus::Completed);
        assert_eq!(result.result_summary.as_deref(), Some("done"));
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_terminal_submission_snapshot_skips_polling() {
        let source = Arc::new(FakeSource::new(vec![]));
        let tracker = TaskTracker::new(
            Arc::clone(&source) as Arc<dyn TaskSource>,
            TrackerConfig::default(),
        );

        let result = tracker
            .wait_until_terminal(task("T1", TaskStatus::Failed))
            .await
            .unwrap();

        assert_eq!(result.status, TaskStatus::Failed);
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_carries_task_id_and_value() {
        let source = Arc::new(FakeSource::new(vec![task("T1", TaskStatus::Running)]));
        let clock = Arc::new(ManualClock::new());

        let tracker = TaskTracker::new(
            Arc::clone(&source) as Arc<dyn TaskSource>,
            TrackerConfig {
                poll_interval: Duration::from_secs(5),
                timeout: Some(Duration::from_secs(10)),
            },
        )
        .with_clock(Arc::clone(&clock) as Arc<dyn MonotonicClock>)
        .with_waiter(Arc::new(AdvancingWait {
            clock: Arc::clone(&clock),
            step_millis: 11_000,
        }));

        let err = tracker
            .wait_until_terminal(task("T1", TaskStatus::Queued))
            .await
            .unwrap_err();

        match err {
            Error::TaskTimeout { task_id, timeout } => {
                assert_eq!(task_id, "T1");
                assert_eq!(timeout, Duration::from_secs(10));
            }
            other => panic!("expected TaskTimeout, got {other:?}"),
        }
        // First fetch at t=0 continues; the deadline fires on the second,
        // before any further waiting.
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_no_timeout_never_gives_up() {
        let source = Arc::new(FakeSource::new(vec![
            task("T1", TaskStatus::Queued),
            task("T1", TaskStatus::Running),
            task("T1", TaskStatus::Running),
            task("T1", TaskStatus::Running),
            task("T1", TaskStatus::Completed),
        ]));
        let clock = Arc::new(ManualClock::new());

        let tracker = TaskTracker::new(
            Arc::clone(&source) as Arc<dyn TaskSource>,
            TrackerConfig::no_timeout(),
        )
        .with_clock(Arc::clone(&clock) as Arc<dyn MonotonicClock>)
        .with_waiter(Arc::new(AdvancingWait {
            clock: Arc::clone(&clock),
            // Each wait jumps a year of scripted time.
            step_millis: 31_536_000_000,
        }));

        let result = tracker
            .wait_until_terminal(task("T1", TaskStatus::Queued))
            .await
            .unwrap();

        assert_eq!(result.status, TaskStatus::Completed);
        assert_eq!(source.fetch_count(), 5);
    }

    #[tokio::test]
    async fn test_late_terminal_snapshot_still_finishes() {
        // A snapshot that is both terminal and past the deadline ends the
        // loop normally; terminal-ness wins.
        let source = Arc::new(FakeSource::new(vec![task("T1", TaskStatus::Completed)]));
        let clock = Arc::new(ManualClock::new());
        clock.advance(3_600_000);

        let tracker = TaskTracker::new(
            Arc::clone(&source) as Arc<dyn TaskSource>,
            TrackerConfig {
                poll_interval: Duration::from_secs(5),
                timeout: Some(Duration::from_secs(10)),
            },
        )
        .with_clock(Arc::clone(&clock) as Arc<dyn MonotonicClock>)
        .with_waiter(Arc::new(NoopWait));

        let result = tracker
            .wait_until_terminal(task("T1", TaskStatus::Queued))
            .await
            .unwrap();

        assert_eq!(result.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_without_retry() {
        struct FailingSource {
            fetches: AtomicUsize,
        }

        #[async_trait]
        impl TaskSource for FailingSource {
            async fn fetch(&self, _task_id: &str) -> Result<Task> {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                Err(Error::Transport("connection reset".into()))
            }
        }

        let source = Arc::new(FailingSource {
            fetches: AtomicUsize::new(0),
        });
        let tracker = TaskTracker::new(
            Arc::clone(&source) as Arc<dyn TaskSource>,
            TrackerConfig::default(),
        );

        let err = tracker
            .wait_until_terminal(task("T1", TaskStatus::Queued))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }
}
