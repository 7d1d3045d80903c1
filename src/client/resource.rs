// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic client for one resource kind in one namespace.

use crate::client::StatusSubresource;
use crate::constants::STATUS_SUBRESOURCE;
use crate::error::{Error, ResourceRef, Result, StatusError};
use crate::rest::executor::collect_stream;
use crate::rest::{
    DeleteOptions, GetOptions, GroupVersion, ListOptions, ParameterCodec, PatchParams, PatchType,
    QueryParameterCodec, RequestBuilder, RequestDescriptor, RequestExecutor, Verb, WatchHandle,
};
use bytes::Bytes;
use k8s_openapi::NamespaceResourceScope;
use kube::core::ObjectList;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Client for the resource kind `K`, bound to a namespace (or to cluster scope).
///
/// Holds no per-call state: cloning is cheap and one instance can serve
/// concurrent callers. Every call assembles a fresh request, hands it to the
/// [`RequestExecutor`] and decodes the answer; non-success responses come back
/// as [`Error::Api`] without retries.
pub struct ResourceClient<K> {
    executor: Arc<dyn RequestExecutor>,
    codec: Arc<dyn ParameterCodec>,
    group_version: GroupVersion,
    resource: String,
    namespace: Option<String>,
    _phantom: PhantomData<fn() -> K>,
}

impl<K> Clone for ResourceClient<K> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            codec: self.codec.clone(),
            group_version: self.group_version.clone(),
            resource: self.resource.clone(),
            namespace: self.namespace.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<K> fmt::Debug for ResourceClient<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("group_version", &self.group_version)
            .field("resource", &self.resource)
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl<K: Resource<DynamicType = ()>> ResourceClient<K> {
    /// Client for a namespaced kind within `namespace`
    pub fn namespaced(executor: Arc<dyn RequestExecutor>, namespace: &str) -> Self
    where
        K: Resource<Scope = NamespaceResourceScope>,
    {
        Self::new(executor, Some(namespace.to_string()))
    }

    /// Client for a cluster-scoped kind, or a namespaced kind across all namespaces
    pub fn all(executor: Arc<dyn RequestExecutor>) -> Self {
        Self::new(executor, None)
    }

    fn new(executor: Arc<dyn RequestExecutor>, namespace: Option<String>) -> Self {
        Self {
            executor,
            codec: Arc::new(QueryParameterCodec),
            group_version: GroupVersion::new(&K::group(&()), &K::version(&())),
            resource: K::plural(&()).to_string(),
            namespace: namespace.filter(|ns| !ns.is_empty()),
            _phantom: PhantomData,
        }
    }
}

impl<K> ResourceClient<K> {
    /// Replace the codec used to encode list/get options
    #[must_use]
    pub fn with_parameter_codec(mut self, codec: Arc<dyn ParameterCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    fn request(&self, verb: Verb) -> RequestBuilder {
        let builder = RequestBuilder::new(self.group_version.clone())
            .verb(verb)
            .resource(&self.resource);
        match &self.namespace {
            Some(namespace) => builder.namespace(namespace),
            None => builder,
        }
    }

    /// Send the request and return the body of a successful response
    async fn execute(&self, request: RequestDescriptor) -> Result<Bytes> {
        debug!("{} {}", request.verb(), request.url());
        let response = self.executor.execute(request.to_http()?).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.into_body());
        }
        Err(api_error(status.as_u16(), response.body(), request.resource()))
    }

    async fn execute_into<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<T> {
        let body = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(Error::Decode)
    }
}

fn api_error(code: u16, body: &[u8], resource: &ResourceRef) -> Error {
    let err = StatusError::from_response(code, body, resource.clone());
    warn!("Request for {} failed: {}", resource, err);
    err.into()
}

impl<K> ResourceClient<K>
where
    K: Resource + Clone + Serialize + DeserializeOwned + Send + 'static,
{
    /// Create `obj` and return the server's representation of it
    #[instrument(skip(self, obj), fields(resource = %self.resource, namespace = ?self.namespace))]
    pub async fn create(&self, obj: &K) -> Result<K> {
        let request = self.request(Verb::Post).body(obj)?.build()?;
        self.execute_into(request).await
    }

    /// Replace the stored object with `obj`.
    ///
    /// `obj` must be complete and carry the resource version it was read at;
    /// a stale version is answered with a conflict.
    #[instrument(skip(self, obj), fields(resource = %self.resource, namespace = ?self.namespace))]
    pub async fn update(&self, obj: &K) -> Result<K> {
        let name = object_name(obj)?;
        let request = self.request(Verb::Put).name(name).body(obj)?.build()?;
        self.execute_into(request).await
    }

    /// Replace `obj` through one of its subresources
    #[instrument(skip(self, obj), fields(resource = %self.resource, namespace = ?self.namespace))]
    pub async fn update_subresource(&self, subresource: &str, obj: &K) -> Result<K> {
        let name = object_name(obj)?;
        let request = self
            .request(Verb::Put)
            .name(name)
            .subresource(&[subresource])
            .body(obj)?
            .build()?;
        self.execute_into(request).await
    }

    /// Write the status of `obj`. Changes outside the status are ignored by the server.
    pub async fn update_status(&self, obj: &K) -> Result<K>
    where
        K: StatusSubresource,
    {
        self.update_subresource(STATUS_SUBRESOURCE, obj).await
    }

    #[instrument(skip(self, options), fields(resource = %self.resource, namespace = ?self.namespace))]
    pub async fn delete(&self, name: &str, options: &DeleteOptions) -> Result<()> {
        let request = self.request(Verb::Delete).name(name).body(options)?.build()?;
        self.execute(request).await.map(|_| ())
    }

    /// Delete every object matching `list_options`
    #[instrument(skip(self, options, list_options), fields(resource = %self.resource, namespace = ?self.namespace))]
    pub async fn delete_collection(
        &self,
        options: &DeleteOptions,
        list_options: &ListOptions,
    ) -> Result<()> {
        let request = self
            .request(Verb::Delete)
            .versioned_params(list_options, self.codec.as_ref())?
            .body(options)?
            .build()?;
        self.execute(request).await.map(|_| ())
    }

    #[instrument(skip(self, options), fields(resource = %self.resource, namespace = ?self.namespace))]
    pub async fn get(&self, name: &str, options: &GetOptions) -> Result<K> {
        let request = self
            .request(Verb::Get)
            .name(name)
            .versioned_params(options, self.codec.as_ref())?
            .build()?;
        self.execute_into(request).await
    }

    #[instrument(skip(self, options), fields(resource = %self.resource, namespace = ?self.namespace))]
    pub async fn list(&self, options: &ListOptions) -> Result<ObjectList<K>> {
        let request = self
            .request(Verb::Get)
            .versioned_params(options, self.codec.as_ref())?
            .build()?;
        self.execute_into(request).await
    }

    /// Open a watch on the collection. The handle must be drained or closed by the caller.
    #[instrument(skip(self, options), fields(resource = %self.resource, namespace = ?self.namespace))]
    pub async fn watch(&self, options: &ListOptions) -> Result<WatchHandle<K>> {
        let options = ListOptions {
            watch: true,
            ..options.clone()
        };
        let request = self
            .request(Verb::Get)
            .versioned_params(&options, self.codec.as_ref())?
            .watch()
            .build()?;
        debug!("{} {} (watch)", request.verb(), request.url());

        let response = self.executor.execute_stream(request.to_http()?).await?;
        let status = response.status();
        if !status.is_success() {
            let body = collect_stream(response.into_body()).await?;
            return Err(api_error(status.as_u16(), &body, request.resource()));
        }
        Ok(WatchHandle::new(
            response.into_body(),
            request.resource().clone(),
        ))
    }

    /// Apply `data` to the named object. The bytes are sent untouched; `patch_type`
    /// tells the server how to interpret them. Apply patches need a field manager in `params`.
    #[instrument(skip(self, params, data), fields(resource = %self.resource, namespace = ?self.namespace))]
    pub async fn patch(
        &self,
        name: &str,
        params: &PatchParams,
        patch_type: PatchType,
        data: Vec<u8>,
        subresources: &[&str],
    ) -> Result<K> {
        params.validate(patch_type)?;
        let request = self
            .request(Verb::Patch(patch_type))
            .name(name)
            .subresource(subresources)
            .versioned_params(params, self.codec.as_ref())?
            .raw_body(data)
            .build()?;
        self.execute_into(request).await
    }
}

fn object_name<K: Resource>(obj: &K) -> Result<&str> {
    obj.meta()
        .name
        .as_deref()
        .ok_or_else(|| Error::InvalidRequest("object has no metadata.name".to_string()))
}
