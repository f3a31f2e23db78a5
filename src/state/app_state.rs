//! Timer state holder

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{CompletionEvent, Time, TimerState};
use crate::tasks::countdown_task;

/// A spawned countdown loop and the generation it belongs to
#[derive(Debug)]
struct CountdownJob {
    id: u64,
    handle: JoinHandle<()>,
}

/// Owns the countdown values, the running loop, and server bookkeeping
#[derive(Debug)]
pub struct AppState {
    /// Observable countdown values
    time_tx: watch::Sender<Time>,
    timer_state_tx: watch::Sender<TimerState>,
    /// One message per finished countdown
    completion_tx: broadcast::Sender<CompletionEvent>,
    /// The active tick loop, if any
    job: Mutex<Option<CountdownJob>>,
    next_job_id: AtomicU64,
    /// Default +/- adjustment in seconds
    pub step_seconds: u64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Failures reported by the completion listener
    pub errors: Mutex<Vec<String>>,
}

impl AppState {
    /// Create a stopped timer holding `initial_seconds`
    pub fn new(port: u16, host: String, initial_seconds: u64, step_seconds: u64) -> Self {
        let (time_tx, _) = watch::channel(Time::new(initial_seconds));
        let (timer_state_tx, _) = watch::channel(TimerState::Stopped);
        let (completion_tx, _) = broadcast::channel(16);

        Self {
            time_tx,
            timer_state_tx,
            completion_tx,
            job: Mutex::new(None),
            next_job_id: AtomicU64::new(1),
            step_seconds,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            errors: Mutex::new(Vec::new()),
        }
    }

    /// Current countdown values
    pub fn time(&self) -> Time {
        *self.time_tx.borrow()
    }

    /// Current timer state
    pub fn timer_state(&self) -> TimerState {
        *self.timer_state_tx.borrow()
    }

    /// Whether start/pause makes sense right now
    pub fn can_toggle(&self) -> bool {
        !self.time().is_elapsed()
    }

    /// Watch the countdown values
    pub fn subscribe_time(&self) -> watch::Receiver<Time> {
        self.time_tx.subscribe()
    }

    /// Watch the running/stopped state
    pub fn subscribe_timer_state(&self) -> watch::Receiver<TimerState> {
        self.timer_state_tx.subscribe()
    }

    /// Listen for finished countdowns. The timer is already `Stopped` when an
    /// event arrives, unless a newer countdown replaced the finished one.
    pub fn subscribe_completion(&self) -> broadcast::Receiver<CompletionEvent> {
        self.completion_tx.subscribe()
    }

    /// Add to the remaining time; the total only grows if the new remaining exceeds it.
    /// Sub-second parts of `amount` are ignored.
    pub fn add_time(&self, amount: Duration) -> Time {
        self.record_action("add");
        let time = self.update_time(|time| time.added(amount.as_secs()));
        info!("Added {}s, remaining {}", amount.as_secs(), time.formatted());
        time
    }

    /// Subtract from the remaining time, never going below zero.
    /// A fractional amount rounds the result down.
    pub fn subtract_time(&self, amount: Duration) -> Time {
        self.record_action("subtract");
        let seconds = amount.as_secs().saturating_add(u64::from(amount.subsec_nanos() > 0));
        let time = self.update_time(|time| time.subtracted(seconds));
        info!("Subtracted {}s, remaining {}", seconds, time.formatted());
        time
    }

    /// Remove one second on behalf of the countdown loop
    pub(crate) fn tick(&self) -> Time {
        self.update_time(|time| time.subtracted(1))
    }

    fn update_time<F>(&self, updater: F) -> Time
    where
        F: FnOnce(Time) -> Time,
    {
        let mut updated = Time::default();
        self.time_tx.send_modify(|time| {
            *time = updater(*time);
            updated = *time;
        });
        updated
    }

    /// Start (or restart) the countdown loop. Does nothing but stop when no time is left.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_timer(self: &Arc<Self>) -> Result<TimerState, String> {
        self.record_action("start");

        let mut job = self.job.lock()
            .map_err(|e| format!("Failed to lock countdown job: {}", e))?;

        if let Some(previous) = job.take() {
            debug!("Restarting countdown, cancelling job {}", previous.id);
            previous.handle.abort();
        }

        if self.time().is_elapsed() {
            debug!("No time remaining, not starting countdown");
            self.timer_state_tx.send_replace(TimerState::Stopped);
            return Ok(TimerState::Stopped);
        }

        let id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        let handle = tokio::spawn(countdown_task(Arc::clone(self), id));
        *job = Some(CountdownJob { id, handle });

        // Still holding the job lock so a finishing loop cannot race this
        self.timer_state_tx.send_replace(TimerState::Running);
        info!("Countdown started at {}", self.time().formatted());
        Ok(TimerState::Running)
    }

    /// Cancel the countdown loop, if any, and mark the timer stopped
    pub fn stop_timer(&self) -> Result<TimerState, String> {
        self.record_action("stop");

        let mut job = self.job.lock()
            .map_err(|e| format!("Failed to lock countdown job: {}", e))?;

        if let Some(previous) = job.take() {
            previous.handle.abort();
            info!("Countdown stopped at {}", self.time().formatted());
        }
        self.timer_state_tx.send_replace(TimerState::Stopped);
        Ok(TimerState::Stopped)
    }

    /// Stop when running, start otherwise
    pub fn toggle_timer(self: &Arc<Self>) -> Result<TimerState, String> {
        if self.timer_state().is_running() {
            self.stop_timer()
        } else {
            self.start_timer()
        }
    }

    /// Publish a completion event on behalf of the countdown loop
    pub(crate) fn notify_completion(&self) {
        let event = CompletionEvent::now(self.time().total_seconds);
        match self.completion_tx.send(event) {
            Ok(receivers) => debug!("Completion delivered to {} listener(s)", receivers),
            Err(_) => debug!("Completion emitted with no listeners"),
        }
    }

    /// Release job `id` after its loop ran out. A newer job is left untouched.
    pub(crate) fn finish_countdown(&self, id: u64) -> Result<(), String> {
        let mut job = self.job.lock()
            .map_err(|e| format!("Failed to lock countdown job: {}", e))?;

        if job.as_ref().map(|j| j.id) == Some(id) {
            // Dropping our own handle detaches it
            *job = None;
            self.timer_state_tx.send_replace(TimerState::Stopped);
        }
        Ok(())
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Record an error for client visibility
    pub fn add_error(&self, error: String) -> Result<(), String> {
        let mut errors = self.errors.lock()
            .map_err(|e| format!("Failed to lock errors: {}", e))?;

        warn!("Adding error to state: {}", error);
        errors.push(error);
        Ok(())
    }

    /// Forget all recorded errors
    pub fn clear_errors(&self) -> Result<(), String> {
        let mut errors = self.errors.lock()
            .map_err(|e| format!("Failed to lock errors: {}", e))?;

        if !errors.is_empty() {
            info!("Cleared {} error(s)", errors.len());
            errors.clear();
        }
        Ok(())
    }

    /// Get recorded errors
    pub fn get_errors(&self) -> Result<Vec<String>, String> {
        self.errors.lock()
            .map(|errors| errors.clone())
            .map_err(|e| format!("Failed to lock errors: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    fn timer(seconds: u64) -> Arc<AppState> {
        Arc::new(AppState::new(0, "127.0.0.1".to_string(), seconds, 15))
    }

    #[test]
    fn starts_stopped_with_full_time() {
        let state = timer(60);
        assert_eq!(state.time(), Time::new(60));
        assert_eq!(state.timer_state(), TimerState::Stopped);
        assert!(state.can_toggle());
    }

    #[test]
    fn subtract_never_goes_below_zero() {
        let state = timer(20);
        assert_eq!(state.subtract_time(Duration::from_secs(15)).remaining_seconds, 5);
        assert_eq!(state.subtract_time(Duration::from_secs(15)).remaining_seconds, 0);
        assert_eq!(state.time().total_seconds, 20);
        assert!(!state.can_toggle());
    }

    #[test]
    fn fractional_subtract_rounds_down() {
        let state = timer(10);
        let time = state.subtract_time(Duration::from_millis(1500));
        assert_eq!(time.remaining_seconds, 8);
    }

    #[test]
    fn subtracting_the_largest_duration_floors_at_zero() {
        let state = timer(10);
        let time = state.subtract_time(Duration::MAX);
        assert_eq!(time, Time { total_seconds: 10, remaining_seconds: 0 });

        assert_eq!(state.add_time(Duration::from_secs(5)).remaining_seconds, 5);
        assert_eq!(state.subtract_time(Duration::new(u64::MAX, 1)).remaining_seconds, 0);
    }

    #[test]
    fn add_never_decreases_total() {
        let state = timer(60);
        state.subtract_time(Duration::from_secs(45));
        let time = state.add_time(Duration::from_millis(15_900));
        assert_eq!(time, Time { total_seconds: 60, remaining_seconds: 30 });
        let time = state.add_time(Duration::from_secs(45));
        assert_eq!(time, Time { total_seconds: 75, remaining_seconds: 75 });
        assert_eq!(state.get_last_action().0.as_deref(), Some("add"));
    }

    #[tokio::test(start_paused = true)]
    async fn start_at_zero_stays_stopped() {
        let state = timer(0);
        assert_eq!(state.start_timer().unwrap(), TimerState::Stopped);
        assert_eq!(state.timer_state(), TimerState::Stopped);
        assert!(state.job.lock().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn full_countdown_completes_once() {
        let state = timer(3);
        let mut completions = state.subscribe_completion();
        let started = tokio::time::Instant::now();

        assert_eq!(state.start_timer().unwrap(), TimerState::Running);
        let event = completions.recv().await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
        assert_eq!(event.total_seconds, 3);
        assert_eq!(state.time().remaining_seconds, 0);
        assert_eq!(state.timer_state(), TimerState::Stopped);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(completions.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_remaining() {
        let state = timer(10);
        state.start_timer().unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(state.time().remaining_seconds, 8);

        assert_eq!(state.stop_timer().unwrap(), TimerState::Stopped);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.time().remaining_seconds, 8);
        assert_eq!(state.timer_state(), TimerState::Stopped);

        // Stopping again is a no-op
        assert_eq!(state.stop_timer().unwrap(), TimerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_running_loop() {
        let state = timer(60);
        state.start_timer().unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        state.start_timer().unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(state.time().remaining_seconds, 58);
        assert_eq!(state.timer_state(), TimerState::Running);
        state.stop_timer().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn subtracting_to_zero_while_running_completes() {
        let state = timer(30);
        let mut completions = state.subscribe_completion();
        state.start_timer().unwrap();
        state.subtract_time(Duration::from_secs(100));

        let started = tokio::time::Instant::now();
        completions.recv().await.unwrap();
        assert!(started.elapsed() <= Duration::from_secs(1));
        assert_eq!(state.timer_state(), TimerState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn completion_listeners_see_a_stopped_timer() {
        for _ in 0..3 {
            let state = timer(1);
            let mut completions = state.subscribe_completion();
            state.start_timer().unwrap();
            completions.recv().await.unwrap();
            assert_eq!(state.timer_state(), TimerState::Stopped);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_alternates_states() {
        let state = timer(5);
        assert_eq!(state.toggle_timer().unwrap(), TimerState::Running);
        assert_eq!(state.toggle_timer().unwrap(), TimerState::Stopped);
        assert_eq!(state.get_last_action().0.as_deref(), Some("stop"));
    }

    #[test]
    fn errors_are_recorded_and_cleared() {
        let state = timer(5);
        state.add_error("vibration failed".to_string()).unwrap();
        assert_eq!(state.get_errors().unwrap(), vec!["vibration failed".to_string()]);
        state.clear_errors().unwrap();
        assert!(state.get_errors().unwrap().is_empty());
    }
}
