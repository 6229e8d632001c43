// Shared fixtures for the integration tests: a scripted vendor transport
// and a clock that records pauses instead of sleeping.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use phishsweep::vendor::models::EmailRecord;
use phishsweep::vendor::rate_limiter::{Clock, RateLimiter};
use phishsweep::vendor::transport::{VendorResponse, VendorTransport};
use phishsweep::{Error, Result};

/// A request seen by the scripted transport.
#[derive(Debug, Clone)]
pub enum Call {
    Get {
        path: String,
        query: Vec<(String, String)>,
    },
    Post {
        path: String,
        body: serde_json::Value,
    },
}

/// Replays queued responses (or transport errors) in order and records every
/// request. When the queue is empty, GETs answer 200 `{"value": []}` and
/// POSTs 201.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<VendorResponse>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, status: u16, body: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(VendorResponse {
            status,
            body: body.into(),
        }));
    }

    /// Queue a failure that never reached the vendor, like a dropped
    /// connection.
    pub fn push_transport_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                message.to_string(),
            ))));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<serde_json::Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Post { body, .. } => Some(body),
                Call::Get { .. } => None,
            })
            .collect()
    }

    fn next_or(&self, default_status: u16, default_body: &str) -> Result<VendorResponse> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(VendorResponse {
                    status: default_status,
                    body: default_body.to_string(),
                })
            })
    }
}

#[async_trait]
impl VendorTransport for ScriptedTransport {
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<VendorResponse> {
        self.calls.lock().unwrap().push(Call::Get {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        self.next_or(200, r#"{"value": []}"#)
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<VendorResponse> {
        self.calls.lock().unwrap().push(Call::Post {
            path: path.to_string(),
            body: body.clone(),
        });
        self.next_or(201, "")
    }
}

/// Records requested pauses without sleeping.
#[derive(Default)]
pub struct RecordingClock {
    pub pauses: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

/// Limiter with the vendor defaults (20 calls / 60 s) on a recording clock.
pub fn test_limiter() -> (RateLimiter, Arc<RecordingClock>) {
    let clock = Arc::new(RecordingClock::default());
    let limiter = RateLimiter::with_clock(20, Duration::from_secs(60), clock.clone());
    (limiter, clock)
}

pub fn records(n: usize) -> Vec<EmailRecord> {
    (0..n)
        .map(|i| EmailRecord {
            mailbox: format!("user{i}@example.com"),
            message_id: format!("<m{i}@evil.org>"),
            unique_id: format!("u{i}"),
            delivery_time: "2019-04-29T08:00:00.000Z".to_string(),
        })
        .collect()
}

/// Sweeping response body with `n` matches.
pub fn sweep_body(n: usize) -> String {
    let value: Vec<serde_json::Value> = records(n)
        .iter()
        .map(|r| {
            serde_json::json!({
                "mailbox": r.mailbox,
                "mail_message_id": r.message_id,
                "mail_unique_id": r.unique_id,
                "mail_message_delivery_time": r.delivery_time,
            })
        })
        .collect();
    serde_json::json!({ "current_link": "", "next_link": "", "value": value }).to_string()
}
