// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Decoding of watch streams into typed change events.

use crate::constants::watch::MAX_EVENT_BYTES;
use crate::error::{Error, ResourceRef, Result, StatusError};
use crate::rest::executor::ByteStream;
use futures::future;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::WatchEvent as RawEvent;
use serde::de::DeserializeOwned;
use std::fmt;
use std::io;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;
use tracing::debug;

/// A change to a watched resource
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent<K> {
    Added(K),
    Modified(K),
    Deleted(K),
    /// Progress marker; the collection is current as of this resource version
    Bookmark { resource_version: String },
}

/// An open watch.
///
/// Owns the response stream. [`WatchHandle::close`] (or dropping the handle)
/// releases it, whether or not all events were consumed. After the stream
/// reports an error, that error is returned once and the handle is exhausted.
pub struct WatchHandle<K> {
    events: Option<BoxStream<'static, Result<WatchEvent<K>>>>,
}

impl<K> WatchHandle<K>
where
    K: DeserializeOwned + Send + 'static,
{
    pub(crate) fn new(body: ByteStream, resource: ResourceRef) -> Self {
        Self::with_max_event_bytes(body, resource, MAX_EVENT_BYTES)
    }

    /// A line longer than `max_event_bytes` ends the watch with [`Error::WatchStream`]
    pub(crate) fn with_max_event_bytes(
        body: ByteStream,
        resource: ResourceRef,
        max_event_bytes: usize,
    ) -> Self {
        let reader = StreamReader::new(body.map_err(io::Error::other));
        let events = FramedRead::new(reader, LinesCodec::new_with_max_length(max_event_bytes))
            .map_err(|e| match e {
                LinesCodecError::Io(err) => Error::Transport(err.into()),
                other => Error::WatchStream(other.to_string()),
            })
            .try_filter(|line| future::ready(!line.trim().is_empty()))
            .and_then(move |line| future::ready(decode_event::<K>(&line, &resource)))
            .boxed();

        Self {
            events: Some(events),
        }
    }

    /// Wait for the next event. `None` once the stream ended or was closed.
    pub async fn next(&mut self) -> Option<Result<WatchEvent<K>>> {
        let events = self.events.as_mut()?;
        match events.next().await {
            Some(Ok(event)) => Some(Ok(event)),
            Some(Err(err)) => {
                debug!("Watch terminated by error: {}", err);
                self.events = None;
                Some(Err(err))
            }
            None => {
                self.events = None;
                None
            }
        }
    }

    /// Release the underlying stream. Safe to call more than once.
    pub fn close(&mut self) {
        if self.events.take().is_some() {
            debug!("Watch closed by caller");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_none()
    }
}

impl<K> fmt::Debug for WatchHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("closed", &self.events.is_none())
            .finish()
    }
}

fn decode_event<K: DeserializeOwned>(
    line: &str,
    resource: &ResourceRef,
) -> Result<WatchEvent<K>> {
    let raw: RawEvent<K> = serde_json::from_str(line).map_err(Error::Decode)?;
    match raw {
        RawEvent::Added(obj) => Ok(WatchEvent::Added(obj)),
        RawEvent::Modified(obj) => Ok(WatchEvent::Modified(obj)),
        RawEvent::Deleted(obj) => Ok(WatchEvent::Deleted(obj)),
        RawEvent::Bookmark {
            resource_version, ..
        } => Ok(WatchEvent::Bookmark { resource_version }),
        RawEvent::ErrorStatus(status) => {
            Err(StatusError::from_status(&status, 500, resource.clone()).into())
        }
        RawEvent::ErrorOther(other) => Err(Error::WatchStream(format!(
            "error event without a Status: {}",
            other.0
        ))),
    }
}
