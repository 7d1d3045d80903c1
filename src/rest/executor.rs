// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The transport seam: something that can send an assembled request.

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use tracing::trace;

/// Body of a streaming response, delivered chunk by chunk
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Sends requests to the API server.
///
/// Implementations own TLS, authentication, retries and connection pooling.
/// They only fail with [`Error::Transport`]: a response with a non-success
/// status is still an `Ok` response and is interpreted by the caller.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Send the request and buffer the whole response body
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Bytes>>;

    /// Send the request and hand back the body as it arrives.
    ///
    /// Dropping the returned stream must release the underlying connection.
    async fn execute_stream(&self, request: Request<Vec<u8>>) -> Result<Response<ByteStream>>;
}

#[async_trait]
impl RequestExecutor for kube::Client {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Bytes>> {
        trace!("Sending {} {}", request.method(), request.uri());
        let response = self
            .send(request.map(Body::from))
            .await
            .map_err(|e| Error::Transport(e.into()))?;

        let (parts, body) = response.into_parts();
        let bytes = body
            .collect()
            .await
            .map_err(|e| Error::Transport(e.into()))?
            .to_bytes();
        Ok(Response::from_parts(parts, bytes))
    }

    async fn execute_stream(&self, request: Request<Vec<u8>>) -> Result<Response<ByteStream>> {
        trace!("Opening stream {} {}", request.method(), request.uri());
        let response = self
            .send(request.map(Body::from))
            .await
            .map_err(|e| Error::Transport(e.into()))?;

        Ok(response.map(|body| {
            body.into_data_stream()
                .map_err(|e| Error::Transport(e.into()))
                .boxed()
        }))
    }
}

/// Drain a streaming body into memory, used when a stream turns out to be an error response
pub async fn collect_stream(stream: ByteStream) -> Result<Vec<u8>> {
    stream
        .try_fold(Vec::new(), |mut buf, chunk| async move {
            buf.extend_from_slice(&chunk);
            Ok(buf)
        })
        .await
}
