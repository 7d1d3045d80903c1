// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking API server responses.

use crate::error::Result;
use crate::rest::{ByteStream, RequestExecutor};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;
use url::form_urlencoded;

/// A request as seen by a mock transport
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: http::Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    fn from_parts(parts: &http::request::Parts, body: Vec<u8>) -> Self {
        let query = parts
            .uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            query,
            content_type: parts
                .headers
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn is_watch(&self) -> bool {
        self.query_value("watch") == Some("true")
    }
}

type Responder = dyn Fn(&RecordedRequest) -> (u16, Vec<u8>) + Send + Sync;

/// An in-process [`RequestExecutor`] answering from a closure and recording every request.
///
/// Streaming bodies are cut into small chunks so consumers have to reassemble lines.
#[derive(Clone)]
pub struct StubExecutor {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubExecutor {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, Vec<u8>) + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every request with the same status and body
    pub fn respond(status: u16, body: &str) -> Self {
        let body = body.as_bytes().to_vec();
        Self::new(move |_| (status, body.clone()))
    }

    /// Answer with the request body, as a server storing the object unchanged would
    pub fn echo() -> Self {
        Self::new(|req| {
            let status = if req.method == http::Method::POST { 201 } else { 200 };
            (status, req.body.clone())
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    fn answer(&self, request: Request<Vec<u8>>) -> (http::response::Builder, Vec<u8>) {
        let (parts, body) = request.into_parts();
        let recorded = RecordedRequest::from_parts(&parts, body);
        let (status, body) = (self.responder)(&recorded);
        self.requests.lock().unwrap().push(recorded);
        let builder = Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json");
        (builder, body)
    }
}

#[async_trait]
impl RequestExecutor for StubExecutor {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Bytes>> {
        let (builder, body) = self.answer(request);
        Ok(builder.body(Bytes::from(body)).unwrap())
    }

    async fn execute_stream(&self, request: Request<Vec<u8>>) -> Result<Response<ByteStream>> {
        let (builder, body) = self.answer(request);
        let chunks = body.chunks(7).map(|c| c.to_vec()).collect::<Vec<_>>();
        let stream = stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c)))).boxed();
        Ok(builder.body(stream).unwrap())
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Turned into a real [`kube::Client`], which then serves as the request executor.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    watches: Arc<Mutex<HashMap<String, (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            watches: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Add a streamed response for watch requests on the path
    pub fn on_watch(self, path: &str, status: u16, body: &str) -> Self {
        self.watches
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, request: &RecordedRequest) -> Option<(u16, String)> {
        if request.is_watch() {
            return self.watches.lock().unwrap().get(&request.path).cloned();
        }
        self.responses
            .lock()
            .unwrap()
            .get(&(request.method.to_string(), request.path.clone()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = Pin<Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let this = self.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = http_body_util::BodyExt::collect(body).await?.to_bytes();
            let recorded = RecordedRequest::from_parts(&parts, body.to_vec());
            let response = this.find_response(&recorded);
            this.requests.lock().unwrap().push(recorded);

            let (status, body) = response.unwrap_or_else(|| {
                // Default 404 for unmatched requests
                (404, not_found_json("resource", "unknown"))
            });
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// A byte stream yielding the given chunks
pub fn byte_stream(chunks: Vec<String>) -> ByteStream {
    stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c)))).boxed()
}

/// Like [`byte_stream`], plus a flag that flips once the stream is dropped
pub fn tracked_stream(chunks: Vec<String>) -> (ByteStream, Arc<AtomicBool>) {
    let dropped = Arc::new(AtomicBool::new(false));
    let stream = DropTracked {
        inner: byte_stream(chunks),
        dropped: dropped.clone(),
    };
    (stream.boxed(), dropped)
}

struct DropTracked {
    inner: ByteStream,
    dropped: Arc<AtomicBool>,
}

impl Stream for DropTracked {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl Drop for DropTracked {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

/// Create a `Status` failure body
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": if code < 300 { "Success" } else { "Failure" },
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(
        404,
        "NotFound",
        &format!("{} \"{}\" not found", resource, name),
    )
}
