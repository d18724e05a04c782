//! Scripted in-memory transport
//!
//! Available in this crate's tests and to other crates through the `fake`
//! feature. Responses are queued per URL; the last queued response for a URL
//! is repeated once the queue is drained. URLs without a script answer 404.

use crate::error::TransportError;
use crate::transport::{RawResponse, Transport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Outcome = Result<RawResponse, TransportError>;

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, VecDeque<Outcome>>,
    delays: HashMap<String, Duration>,
    requests: Vec<RecordedRequest>,
}

/// A request seen by the fake transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// Fake transport for tests
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    script: Arc<Mutex<Script>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for `url`
    pub fn push(&self, url: impl Into<String>, outcome: Outcome) {
        self.script
            .lock()
            .unwrap()
            .responses
            .entry(url.into())
            .or_default()
            .push_back(outcome);
    }

    /// Queue a 200 response with the given JSON body
    pub fn ok_json(&self, url: impl Into<String>, body: impl Into<String>) {
        self.push(url, Ok(RawResponse::new(200, body)));
    }

    /// Queue a response with the given status and an empty body
    pub fn status(&self, url: impl Into<String>, status: u16) {
        self.push(url, Ok(RawResponse::new(status, "")));
    }

    /// Delay every answer for `url`
    pub fn delay(&self, url: impl Into<String>, delay: Duration) {
        self.script.lock().unwrap().delays.insert(url.into(), delay);
    }

    /// All requests in the order they were received
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    /// Requested URLs in the order they were received
    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    /// Number of requests made to `url`
    pub fn request_count(&self, url: &str) -> usize {
        self.script
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    fn next_outcome(&self, url: &str, headers: &[(&str, &str)]) -> (Outcome, Option<Duration>) {
        let mut script = self.script.lock().unwrap();
        script.requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let delay = script.delays.get(url).copied();
        let outcome = match script.responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        (outcome.unwrap_or_else(|| Ok(RawResponse::new(404, ""))), delay)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Outcome {
        let (outcome, delay) = self.next_outcome(url, headers);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}
