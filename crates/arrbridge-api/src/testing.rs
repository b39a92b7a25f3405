//! Scripted in-memory [`Transport`] for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::TransportError;
use crate::transport::{RawResponse, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request as the fake transport saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub api_key: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

type Reply = Result<RawResponse, TransportError>;

/// Replays queued replies per URL, in order. A URL with no reply left
/// answers with a connection failure.
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `url`.
    pub fn reply(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.push(url, Ok(RawResponse::new(status, body)))
    }

    /// Queue a JSON response for `url`.
    pub fn reply_json(self, url: &str, status: u16, body: serde_json::Value) -> Self {
        self.reply(url, status, body.to_string())
    }

    /// Queue a network-level failure for `url`.
    pub fn fail(self, url: &str, err: TransportError) -> Self {
        self.push(url, Err(err))
    }

    fn push(self, url: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == url)
            .collect()
    }

    fn record(&self, request: RecordedRequest) -> Reply {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .get_mut(&url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::Connect(format!("no reply queued for {url}"))))
    }
}

impl Transport for FakeTransport {
    async fn get(
        &self,
        url: &str,
        api_key: &str,
        query: &[(&str, &str)],
    ) -> Result<RawResponse, TransportError> {
        self.record(RecordedRequest {
            method: Method::Get,
            url: url.to_string(),
            api_key: api_key.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: None,
        })
    }

    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<RawResponse, TransportError> {
        self.record(RecordedRequest {
            method: Method::Post,
            url: url.to_string(),
            api_key: api_key.to_string(),
            query: Vec::new(),
            body: Some(body.clone()),
        })
    }
}
