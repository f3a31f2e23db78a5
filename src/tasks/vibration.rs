//! Completion listener that fires the vibrator

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    services::{vibrate, VibrationConfig},
    state::AppState,
};

/// Background task that vibrates once for every finished countdown
pub async fn vibration_task(state: Arc<AppState>, config: VibrationConfig) {
    info!("Starting vibration task");

    let mut completions = state.subscribe_completion();

    loop {
        match completions.recv().await {
            Ok(event) => {
                info!("Countdown of {}s completed at {}", event.total_seconds, event.completed_at);

                match vibrate(&config).await {
                    Ok(()) => {
                        if let Err(e) = state.clear_errors() {
                            error!("Failed to clear errors: {}", e);
                        }
                    }
                    Err(e) => {
                        error!("Vibration failed: {}", e);
                        if let Err(e) = state.add_error(format!("Vibration failed: {}", e)) {
                            error!("Failed to add vibration error: {}", e);
                        }
                    }
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Vibration task lagged, skipped {} completion(s)", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Completion channel closed, stopping vibration task");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn failed_vibration_is_recorded() {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), 0, 15));
        let config = VibrationConfig {
            duration_ms: 10,
            command: Some("windup-no-such-vibrator {ms}".to_string()),
        };

        let listener = tokio::spawn(vibration_task(Arc::clone(&state), config));
        tokio::task::yield_now().await;
        state.notify_completion();

        let mut recorded = Vec::new();
        for _ in 0..100 {
            recorded = state.get_errors().unwrap();
            if !recorded.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        listener.abort();

        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].starts_with("Vibration failed"));
    }
}
