// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client for the `build.openshift.io` API group.

use crate::client::ResourceClient;
use crate::rest::{ParameterCodec, QueryParameterCodec, RequestExecutor};
use crate::types::build::Build;
use std::sync::Arc;

/// Hands out resource clients for the group, all sharing one executor and codec
#[derive(Clone)]
pub struct BuildClient {
    executor: Arc<dyn RequestExecutor>,
    codec: Arc<dyn ParameterCodec>,
}

impl BuildClient {
    pub fn new<E: RequestExecutor + 'static>(executor: E) -> Self {
        Self::from_executor(Arc::new(executor))
    }

    pub fn from_executor(executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            executor,
            codec: Arc::new(QueryParameterCodec),
        }
    }

    #[must_use]
    pub fn with_parameter_codec(mut self, codec: Arc<dyn ParameterCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn builds(&self, namespace: &str) -> ResourceClient<Build> {
        ResourceClient::namespaced(self.executor.clone(), namespace)
            .with_parameter_codec(self.codec.clone())
    }
}
