// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::rest::ListOptions;
use anyhow::{Context, Result};
use std::env;

/// Configuration of the build lister, loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Namespace to list builds in
    pub namespace: String,
    pub label_selector: Option<String>,
    /// Keep watching for changes after the initial list
    pub watch: bool,
    pub watch_timeout_secs: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let namespace = lookup("BUILD_NAMESPACE")
            .filter(|ns| !ns.is_empty())
            .context("BUILD_NAMESPACE environment variable not set")?;
        let label_selector = lookup("LABEL_SELECTOR").filter(|s| !s.is_empty());
        let watch = match lookup("WATCH") {
            Some(value) => value
                .parse()
                .with_context(|| format!("WATCH must be true or false, got {:?}", value))?,
            None => false,
        };
        let watch_timeout_secs = lookup("WATCH_TIMEOUT_SECS")
            .map(|value| {
                value
                    .parse()
                    .with_context(|| format!("WATCH_TIMEOUT_SECS is not a number: {:?}", value))
            })
            .transpose()?;

        Ok(Config {
            namespace,
            label_selector,
            watch,
            watch_timeout_secs,
        })
    }

    /// Options for the initial list and the watch that follows it
    pub fn list_options(&self) -> ListOptions {
        let mut options = ListOptions::default();
        if let Some(selector) = &self.label_selector {
            options = options.labels(selector);
        }
        if let Some(secs) = self.watch_timeout_secs {
            options = options.timeout(secs);
        }
        options
    }
}
