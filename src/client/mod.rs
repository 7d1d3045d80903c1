// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed clients for resources served by the API server.

pub mod build;
pub mod resource;

pub use build::BuildClient;
pub use resource::ResourceClient;

/// Marker for kinds whose status is written through the `status` subresource.
///
/// Only these kinds get [`ResourceClient::update_status`].
pub trait StatusSubresource {}
