// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Polling until an eventually consistent condition holds

use crate::constants::poll::{INTERVAL_MILLIS, TIMEOUT_SECS};
use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::debug;

/// Check `condition` every `interval` until it returns `true`.
///
/// The first check happens after one interval. An error from the condition
/// stops polling and is returned as is; running out of time gives
/// [`Error::WaitTimeout`].
pub async fn poll<F, Fut>(interval: Duration, limit: Duration, mut condition: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let attempts = async {
        let mut attempt = 0u32;
        loop {
            sleep(interval).await;
            attempt += 1;
            if condition().await? {
                debug!("Condition met after {} attempts", attempt);
                return Ok(());
            }
        }
    };

    match timeout(limit, attempts).await {
        Ok(result) => result,
        Err(_) => {
            debug!("Condition not met within {:?}", limit);
            Err(Error::WaitTimeout(limit))
        }
    }
}

/// [`poll`] with the default interval and timeout
pub async fn poll_with_defaults<F, Fut>(condition: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    poll(
        Duration::from_millis(INTERVAL_MILLIS),
        Duration::from_secs(TIMEOUT_SECS),
        condition,
    )
    .await
}
