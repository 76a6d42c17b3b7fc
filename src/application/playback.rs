//! Paced consumption of a decomposition event stream.
//!
//! The stream itself has no notion of time; the player pulls one event,
//! hands it to a sink, then waits before pulling the next.

use std::thread;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{CentroidEvent, DomainResult};

#[derive(Debug, Clone)]
pub struct Player {
    step_delay: Duration,
    limit: Option<usize>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Player {
    pub fn new(step_delay: Duration) -> Self {
        Self {
            step_delay,
            limit: None,
        }
    }

    /// Stop after `steps` events; the rest of the stream is never computed.
    pub fn with_limit(mut self, steps: usize) -> Self {
        self.limit = Some(steps);
        self
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Feeds events to `sink` one at a time and returns how many were shown.
    /// There is no delay before the first event or after the last one. A
    /// failing event or sink ends playback with that error.
    #[instrument(level = "debug", skip(self, events, sink))]
    pub fn play<I, F>(&self, events: I, mut sink: F) -> ApplicationResult<usize>
    where
        I: IntoIterator<Item = DomainResult<CentroidEvent>>,
        F: FnMut(&CentroidEvent) -> ApplicationResult<()>,
    {
        let mut shown = 0;
        let mut events = events.into_iter();
        loop {
            if self.limit.is_some_and(|limit| shown >= limit) {
                debug!("play: limit reached after {} steps", shown);
                break;
            }
            let Some(event) = events.next() else {
                break;
            };
            let event = event?;
            if shown > 0 && !self.step_delay.is_zero() {
                thread::sleep(self.step_delay);
            }
            sink(&event)?;
            shown += 1;
        }
        Ok(shown)
    }
}
