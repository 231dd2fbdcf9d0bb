//! In-memory transport and throttle for tests.

use super::rate_limiter::Throttle;
use super::transport::{ApiReply, Transport};
use anyhow::Result;

pub(crate) type Request = Vec<(String, String)>;

type Responder = Box<dyn FnMut(&[(String, String)]) -> Result<ApiReply>>;

/// Answers every request with a closure and records what was asked
pub(crate) struct ScriptedTransport {
    responder: Responder,
    requests: Vec<Request>,
}

impl ScriptedTransport {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: FnMut(&[(String, String)]) -> Result<ApiReply> + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Vec::new(),
        }
    }

    /// Reply with JSON bodies and no lag signal
    pub(crate) fn json<F>(mut responder: F) -> Self
    where
        F: FnMut(&[(String, String)]) -> serde_json::Value + 'static,
    {
        Self::new(move |request| {
            Ok(ApiReply {
                body: responder(request).to_string(),
                lagged: false,
            })
        })
    }

    pub(crate) fn requests(&self) -> &[Request] {
        &self.requests
    }
}

impl Transport for ScriptedTransport {
    async fn get(&mut self, params: &[(&str, String)]) -> Result<ApiReply> {
        let request: Request = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        let reply = (self.responder)(&request);
        self.requests.push(request);
        reply
    }
}

/// Look up a query parameter in a recorded request
pub(crate) fn param<'a>(request: &'a [(String, String)], key: &str) -> Option<&'a str> {
    request
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Throttle that only counts calls
#[derive(Debug, Default)]
pub(crate) struct CountingThrottle {
    pub(crate) acquired: usize,
    pub(crate) backed_off: usize,
}

impl Throttle for CountingThrottle {
    async fn acquire(&mut self) {
        self.acquired += 1;
    }

    async fn back_off(&mut self) {
        self.backed_off += 1;
    }
}
