//! Server-sent event stream of timer changes

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    watch,
};
use tracing::{debug, warn};

use crate::state::{AppState, CompletionEvent, Time, TimerState};

/// Receivers a single client listens on
struct Subscription {
    time_rx: watch::Receiver<Time>,
    timer_state_rx: watch::Receiver<TimerState>,
    completion_rx: broadcast::Receiver<CompletionEvent>,
}

fn json_event<T: Serialize>(name: &str, value: &T) -> Event {
    Event::default()
        .event(name)
        .json_data(value)
        .unwrap_or_else(|e| {
            warn!("Failed to serialize {} event: {}", name, e);
            Event::default().comment("serialization failed")
        })
}

/// Next change, in the order time, completion, state when several are pending
async fn next_event(subscription: &mut Subscription) -> Option<Event> {
    loop {
        tokio::select! {
            biased;

            changed = subscription.time_rx.changed() => {
                changed.ok()?;
                let time = *subscription.time_rx.borrow_and_update();
                return Some(json_event("time", &time));
            }
            received = subscription.completion_rx.recv() => match received {
                Ok(event) => return Some(json_event("complete", &event)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} completion(s)", skipped);
                }
                Err(RecvError::Closed) => return None,
            },
            changed = subscription.timer_state_rx.changed() => {
                changed.ok()?;
                let timer_state = *subscription.timer_state_rx.borrow_and_update();
                return Some(json_event("state", &timer_state));
            }
        }
    }
}

/// Current snapshot followed by every change
pub fn timer_events(state: &AppState) -> impl Stream<Item = Result<Event, Infallible>> {
    let subscription = Subscription {
        time_rx: state.subscribe_time(),
        timer_state_rx: state.subscribe_timer_state(),
        completion_rx: state.subscribe_completion(),
    };

    let snapshot = vec![
        json_event("time", &state.time()),
        json_event("state", &state.timer_state()),
    ];

    let changes = stream::unfold(subscription, |mut subscription| async move {
        next_event(&mut subscription).await.map(|event| (event, subscription))
    });

    stream::iter(snapshot).chain(changes).map(Ok)
}

/// Handle GET /events - Stream time, state and completion events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Event stream client connected");
    Sse::new(timer_events(&state)).keep_alive(KeepAlive::default())
}
