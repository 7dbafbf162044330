//! SSE plumbing for feed change notifications.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use crate::feed::FeedEvent;

/// Wrap a stream of feed events as an SSE response.
///
/// Every event is named for HTMX `sse-*` trigger routing; the payload is
/// the JSON-serialized event for clients that want the revision.
pub fn build_sse_response<S>(stream: S) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send>
where
    S: Stream<Item = FeedEvent> + Send + 'static,
{
    let stream = stream.map(|event| {
        let json = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());

        let sse_event = match event {
            FeedEvent::Changed { .. } => Event::default().event("changed").data(json),
        };

        Ok(sse_event)
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_event_payload() {
        let event = FeedEvent::Changed { revision: 3, count: 7 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"changed\""));
        assert!(json.contains("\"revision\":3"));
    }
}
