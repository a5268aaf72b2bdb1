//! Waiting on a flag owned by an external collaborator (for example a consent
//! manager finishing its own start-up).
//!
//! Prefer [`ReadinessSource::Events`] when the collaborator can publish its
//! state; [`ReadinessSource::Poll`] probes on an interval and gives up after
//! `max-attempts`.

use tokio::sync::watch;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ReadinessOptions;

pub enum ReadinessSource {
    Events(watch::Receiver<bool>),
    Poll(Box<dyn FnMut() -> bool + Send>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    TimedOut { attempts: u32 },
    Cancelled,
    /// The event publisher went away before reporting ready.
    SourceClosed,
}

pub async fn wait_until_ready(
    source: ReadinessSource,
    opts: &ReadinessOptions,
    cancel: CancellationToken,
) -> Readiness {
    let outcome = match source {
        ReadinessSource::Events(rx) => wait_for_event(rx, opts, &cancel).await,
        ReadinessSource::Poll(probe) => poll(probe, opts, &cancel).await,
    };
    info!(?outcome, "readiness wait finished");
    outcome
}

async fn wait_for_event(
    mut rx: watch::Receiver<bool>,
    opts: &ReadinessOptions,
    cancel: &CancellationToken,
) -> Readiness {
    // Same overall budget as polling would get.
    let deadline = Instant::now() + opts.poll_interval * opts.max_attempts;
    loop {
        if *rx.borrow_and_update() {
            return Readiness::Ready;
        }
        tokio::select! {
            _ = cancel.cancelled() => return Readiness::Cancelled,
            _ = sleep_until(deadline) => {
                return Readiness::TimedOut { attempts: opts.max_attempts };
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    return Readiness::SourceClosed;
                }
            }
        }
    }
}

async fn poll(
    mut probe: Box<dyn FnMut() -> bool + Send>,
    opts: &ReadinessOptions,
    cancel: &CancellationToken,
) -> Readiness {
    for attempt in 1..=opts.max_attempts {
        if probe() {
            debug!(attempt, "readiness probe succeeded");
            return Readiness::Ready;
        }
        if attempt == opts.max_attempts {
            break;
        }
        tokio::select! {
            _ = cancel.cancelled() => return Readiness::Cancelled,
            _ = sleep(opts.poll_interval) => {}
        }
    }
    Readiness::TimedOut {
        attempts: opts.max_attempts,
    }
}
