//! Countdown tick loop

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Time between two decrements of the countdown
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Decrement the remaining time once per tick until it reaches zero, then
/// release the job and announce completion.
///
/// Cancelled by aborting the task; `job_id` identifies this run to the state holder.
pub async fn countdown_task(state: Arc<AppState>, job_id: u64) {
    debug!("Countdown job {} running", job_id);

    let mut ticks = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !state.time().is_elapsed() {
        ticks.tick().await;
        let time = state.tick();
        debug!("Tick: {}", time.formatted());
    }

    info!("Countdown finished");

    // Listeners must observe the stopped state when the event arrives
    if let Err(e) = state.finish_countdown(job_id) {
        error!("Failed to release countdown job {}: {}", job_id, e);
    }
    state.notify_completion();
}
