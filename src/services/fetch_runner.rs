//! Background fetch runner
//!
//! Runs each lunar-data request on its own thread and hands the result back
//! through a channel that the UI loop polls on every tick. Every request is
//! stamped with a generation; only the newest generation's result is
//! delivered, older ones are dropped when they arrive.

use crate::services::client::{self, FetchError, FetchedPayload, Transport};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Message sent from a fetch thread
struct FetchMessage {
    generation: u64,
    location: String,
    elapsed: Duration,
    result: Result<FetchedPayload, FetchError>,
}

/// Result of the newest fetch
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub location: String,
    pub elapsed: Duration,
    pub result: Result<FetchedPayload, FetchError>,
}

/// Spawns fetches and collects their results
pub struct FetchRunner {
    transport: Arc<dyn Transport>,
    base_url: String,
    sender: Sender<FetchMessage>,
    receiver: Receiver<FetchMessage>,
    /// Generation of the most recently spawned fetch
    latest: u64,
    /// Whether the most recent fetch is still outstanding
    pending: bool,
}

impl FetchRunner {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            transport,
            base_url: base_url.into(),
            sender,
            receiver,
            latest: 0,
            pending: false,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the newest request has not completed yet
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start fetching `location` in the background, returning its generation
    ///
    /// Earlier requests keep running; their results will be discarded.
    pub fn spawn(&mut self, location: String) -> u64 {
        self.latest += 1;
        self.pending = true;

        let generation = self.latest;
        let transport = Arc::clone(&self.transport);
        let base_url = self.base_url.clone();
        let tx = self.sender.clone();

        thread::spawn(move || {
            let started = Instant::now();
            let result = client::fetch_snapshot(transport.as_ref(), &base_url, &location);
            // The receiver only goes away when the app is shutting down
            let _ = tx.send(FetchMessage {
                generation,
                location,
                elapsed: started.elapsed(),
                result,
            });
        });

        generation
    }

    /// Drain finished fetches, returning the newest generation's result once
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        let mut outcome = None;

        loop {
            match self.receiver.try_recv() {
                Ok(message) if message.generation == self.latest => {
                    self.pending = false;
                    outcome = Some(FetchOutcome {
                        generation: message.generation,
                        location: message.location,
                        elapsed: message.elapsed,
                        result: message.result,
                    });
                }
                Ok(message) => {
                    tracing::debug!(
                        generation = message.generation,
                        latest = self.latest,
                        location = %message.location,
                        "discarding stale lunar data response"
                    );
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::snapshot::fixtures::SAMPLE_JSON;
    use crate::services::client::stub::StubTransport;
    use crate::services::client::HttpReply;
    use anyhow::Result;

    fn wait_for(runner: &mut FetchRunner) -> FetchOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = runner.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "fetch did not complete");
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Replies slowly to the first location and quickly to every other one
    struct SlowFirstTransport;

    impl Transport for SlowFirstTransport {
        fn get(&self, url: &str) -> Result<HttpReply> {
            if url.contains("location=Slow") {
                thread::sleep(Duration::from_millis(200));
                Ok(HttpReply {
                    status: 404,
                    body: r#"{"detail":"stale"}"#.to_string(),
                })
            } else {
                Ok(HttpReply {
                    status: 200,
                    body: SAMPLE_JSON.to_string(),
                })
            }
        }
    }

    #[test]
    fn test_spawn_and_poll() {
        let transport = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut runner = FetchRunner::new(transport, "http://localhost:8000");

        let generation = runner.spawn("Paris".to_string());
        assert!(runner.is_pending());

        let outcome = wait_for(&mut runner);
        assert_eq!(outcome.generation, generation);
        assert_eq!(outcome.location, "Paris");
        assert!(outcome.result.is_ok());
        assert!(!runner.is_pending());
        assert!(runner.poll().is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut runner = FetchRunner::new(Arc::new(SlowFirstTransport), "http://localhost:8000");

        runner.spawn("Slow".to_string());
        let newest = runner.spawn("Fast".to_string());

        let outcome = wait_for(&mut runner);
        assert_eq!(outcome.generation, newest);
        assert!(outcome.result.is_ok());

        // Let the slow response arrive; it must never be delivered
        thread::sleep(Duration::from_millis(300));
        assert!(runner.poll().is_none());
        assert!(!runner.is_pending());
    }

    #[test]
    fn test_pending_until_newest_completes() {
        let mut runner = FetchRunner::new(Arc::new(SlowFirstTransport), "http://localhost:8000");

        runner.spawn("Fast".to_string());
        let newest = runner.spawn("Slow".to_string());

        // The fast, older response arrives first and is dropped
        thread::sleep(Duration::from_millis(50));
        assert!(runner.poll().is_none());
        assert!(runner.is_pending());

        let outcome = wait_for(&mut runner);
        assert_eq!(outcome.generation, newest);
        assert!(outcome.result.is_err());
    }
}
