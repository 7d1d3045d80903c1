// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request assembly, parameter encoding, transport seam and watch decoding.

pub mod codec;
pub mod executor;
pub mod params;
pub mod request;
pub mod watch;

pub use codec::{GroupVersion, ParameterCodec, QueryParameterCodec};
pub use executor::{ByteStream, RequestExecutor};
pub use params::{
    DeleteOptions, GetOptions, ListOptions, PatchParams, PatchType, Preconditions, PropagationPolicy,
    VersionMatch,
};
pub use request::{RequestBuilder, RequestDescriptor, Verb};
pub use watch::{WatchEvent, WatchHandle};
