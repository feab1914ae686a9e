//! Progress events and a helper for draining them while a run is in flight.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// Upper bound on draining leftover events once the run has finished.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Progress events emitted during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichEvent {
    /// The owner's collection feed has been decoded.
    CollectionLoaded { owner: String, total: usize },
    /// Fan-out is about to start.
    Started { total: usize },
    GameStarted { index: usize, id: String },
    GameEnriched {
        index: usize,
        id: String,
        name: Option<String>,
    },
    /// A game failed; its siblings carry on.
    GameFailed {
        index: usize,
        id: String,
        reason: String,
    },
    Done { enriched: usize, failed: usize },
}

/// Drive `task` to completion, handing every event from `event_rx` to
/// `on_event` as it arrives.
///
/// Events still queued when the task finishes are drained before returning,
/// bounded by a timeout in case a sender outlives the task.
pub async fn run_with_events<F, R>(
    task: F,
    mut event_rx: mpsc::UnboundedReceiver<EnrichEvent>,
    mut on_event: impl FnMut(EnrichEvent),
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);
    let mut result = None;

    loop {
        tokio::select! {
            r = &mut task, if result.is_none() => {
                result = Some(r);
                break;
            }
            event = event_rx.recv() => match event {
                Some(e) => on_event(e),
                None => break,
            },
        }
    }

    match result {
        Some(r) => {
            let deadline = Instant::now() + DRAIN_TIMEOUT;
            loop {
                match tokio::time::timeout_at(deadline, event_rx.recv()).await {
                    Ok(Some(e)) => on_event(e),
                    Ok(None) => break,
                    Err(_) => {
                        log::warn!(
                            "Stopped draining progress events after {}s",
                            DRAIN_TIMEOUT.as_secs()
                        );
                        break;
                    }
                }
            }
            r
        }
        // Every sender dropped before the task finished.
        None => task.await,
    }
}
