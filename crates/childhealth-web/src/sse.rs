//! Server-Sent Events: assistant start-up progress for the chat page.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_core::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

use crate::handlers::chat::StatusView;
use crate::state::SharedState;

/// Emits the current status immediately, then every change.
pub async fn chat_status_events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.assistant.subscribe();
    let stream = WatchStream::new(rx).filter_map(|status| {
        serde_json::to_string(&StatusView::from(&status))
            .ok()
            .map(|data| Ok(Event::default().data(data)))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
