// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod rest;
pub mod types;
pub mod wait;

#[cfg(test)]
mod test_utils;

pub use client::{BuildClient, ResourceClient};
pub use error::{Error, ErrorKind, Result, StatusError};
