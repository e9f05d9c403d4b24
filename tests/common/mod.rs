#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use flotiq_cli::api::{
    ApiError, ApiResult, ContentApiClient, HttpRequest, HttpResponse, HttpTransport,
};
use flotiq_cli::config::{CredentialProvider, Credentials, StaticCredentials};

/// Transport that replays scripted responses and records every request.
pub struct FakeTransport {
    responses: Mutex<VecDeque<ApiResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string().into_bytes(),
        }));
    }

    pub fn push_raw(&self, status: u16, body: &[u8]) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_vec(),
        }));
    }

    pub fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Transport(message.to_string())));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .expect("no request was sent")
            .clone()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_string())))
    }
}

/// Provider with nothing stored, for the fatal-precondition paths.
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn get(&self) -> ApiResult<Credentials> {
        Err(ApiError::MissingCredentials)
    }
}

pub fn client_with(transport: Arc<FakeTransport>) -> ContentApiClient {
    ContentApiClient::new(
        transport,
        Arc::new(StaticCredentials::new(
            "test-token",
            "https://cms.example.com/api",
        )),
    )
}

/// Find a decoded query parameter on a recorded request.
pub fn query_param(request: &HttpRequest, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Find a header on a recorded request.
pub fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
