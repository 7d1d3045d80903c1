// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Assembly of REST requests against resource endpoints.
//!
//! A [`RequestBuilder`] is an immutable value: every step consumes it and
//! returns a refined copy, so a partially built request can be cloned and
//! finished in different ways without one affecting the other. The order in
//! which facets are set does not matter; [`RequestBuilder::build`] lays out
//! the path as `<prefix>[/namespaces/<ns>]/<resource>[/<name>[/<sub>...]]`.

use crate::constants::{content_types, query};
use crate::error::{Error, ResourceRef, Result};
use crate::rest::codec::{GroupVersion, ParameterCodec};
use crate::rest::params::PatchType;
use serde::Serialize;
use std::fmt;
use url::form_urlencoded;

/// HTTP verb of a request. Patches carry the strategy the server must apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch(PatchType),
    Delete,
}

impl Verb {
    pub fn method(&self) -> http::Method {
        match self {
            Verb::Get => http::Method::GET,
            Verb::Post => http::Method::POST,
            Verb::Put => http::Method::PUT,
            Verb::Patch(_) => http::Method::PATCH,
            Verb::Delete => http::Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    group_version: Option<GroupVersion>,
    verb: Option<Verb>,
    namespace: Option<String>,
    resource: Option<String>,
    name: Option<String>,
    subresources: Vec<String>,
    body: Option<Vec<u8>>,
    params: Vec<(String, String)>,
    watch: bool,
}

impl RequestBuilder {
    pub fn new(group_version: GroupVersion) -> Self {
        Self {
            group_version: Some(group_version),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn verb(mut self, verb: Verb) -> Self {
        self.verb = Some(verb);
        self
    }

    /// Scope the request to a namespace. An empty namespace means cluster scope.
    #[must_use]
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = (!namespace.is_empty()).then(|| namespace.to_string());
        self
    }

    /// Plural resource name, e.g. `builds`
    #[must_use]
    pub fn resource(mut self, resource: &str) -> Self {
        self.resource = Some(resource.to_string());
        self
    }

    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Append path segments after the name, e.g. `status`
    #[must_use]
    pub fn subresource<S: AsRef<str>>(mut self, segments: &[S]) -> Self {
        self.subresources
            .extend(segments.iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Attach a payload serialized as JSON
    pub fn body<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(payload).map_err(Error::Serialize)?);
        Ok(self)
    }

    /// Attach bytes that are sent untouched, e.g. a patch document
    #[must_use]
    pub fn raw_body(mut self, bytes: Vec<u8>) -> Self {
        self.body = Some(bytes);
        self
    }

    /// Encode a typed options object into query parameters using `codec`
    pub fn versioned_params<O: Serialize>(
        mut self,
        options: &O,
        codec: &dyn ParameterCodec,
    ) -> Result<Self> {
        let group_version = self.group_version()?;
        let value = serde_json::to_value(options).map_err(Error::Serialize)?;
        let pairs = codec.encode_parameters(&value, group_version)?;
        self.params.extend(pairs);
        Ok(self)
    }

    /// Turn the request into a long-running watch
    #[must_use]
    pub fn watch(mut self) -> Self {
        self.watch = true;
        self
    }

    fn group_version(&self) -> Result<&GroupVersion> {
        self.group_version
            .as_ref()
            .ok_or_else(|| Error::InvalidRequest("group/version must be set".to_string()))
    }

    pub fn build(self) -> Result<RequestDescriptor> {
        let verb = self
            .verb
            .ok_or_else(|| Error::InvalidRequest("verb must be set".to_string()))?;
        let group_version = self.group_version()?.clone();
        let resource = self
            .resource
            .ok_or_else(|| Error::InvalidRequest("resource must be set".to_string()))?;

        validate_segment("resource", &resource)?;
        if let Some(namespace) = &self.namespace {
            validate_segment("namespace", namespace)?;
        }
        if let Some(name) = &self.name {
            validate_segment("resource name", name)?;
        }
        for sub in &self.subresources {
            validate_segment("subresource", sub)?;
        }

        if !self.subresources.is_empty() && self.name.is_none() {
            return Err(Error::InvalidRequest(format!(
                "subresource {} requires a resource name",
                self.subresources.join("/")
            )));
        }
        if self.watch {
            if verb != Verb::Get {
                return Err(Error::InvalidRequest(format!(
                    "watch requires GET, got {}",
                    verb
                )));
            }
            if self.name.is_some() {
                return Err(Error::InvalidRequest(
                    "watch is a collection operation and takes no name".to_string(),
                ));
            }
        }
        if verb == Verb::Get && self.body.is_some() {
            return Err(Error::InvalidRequest(
                "GET requests cannot carry a body".to_string(),
            ));
        }

        let mut path = group_version.api_prefix();
        if let Some(namespace) = &self.namespace {
            path.push_str("/namespaces/");
            path.push_str(namespace);
        }
        path.push('/');
        path.push_str(&resource);
        if let Some(name) = &self.name {
            path.push('/');
            path.push_str(name);
        }
        for sub in &self.subresources {
            path.push('/');
            path.push_str(sub);
        }

        let mut params = self.params;
        if self.watch {
            params.retain(|(k, _)| k != query::WATCH);
            params.push((query::WATCH.to_string(), "true".to_string()));
        }

        Ok(RequestDescriptor {
            verb,
            path,
            params,
            body: self.body,
            watch: self.watch,
            resource: ResourceRef {
                resource,
                namespace: self.namespace,
                name: self.name,
            },
        })
    }
}

// Mirrors the server's rules for names that end up as a path segment.
fn validate_segment(what: &str, segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::InvalidRequest(format!("{} may not be empty", what)));
    }
    if segment == "." || segment == ".." {
        return Err(Error::InvalidRequest(format!(
            "{} may not be '{}'",
            what, segment
        )));
    }
    if let Some(bad) = segment.chars().find(|c| !is_segment_char(*c)) {
        return Err(Error::InvalidRequest(format!(
            "{} '{}' may not contain '{}'",
            what, segment, bad
        )));
    }
    Ok(())
}

// DNS-subdomain characters plus the few the server allows in other names
// (e.g. `system:serviceaccount:ns:sa`). Anything else would change the URL.
fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | ':' | '@' | '~')
}

/// A fully assembled request. Built once per call and never reused.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    verb: Verb,
    path: String,
    params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    watch: bool,
    resource: ResourceRef,
}

impl RequestDescriptor {
    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn is_watch(&self) -> bool {
        self.watch
    }

    /// The resource identity this request addresses
    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    /// Content type of the body; patches advertise their strategy here
    pub fn content_type(&self) -> Option<&'static str> {
        match (&self.body, self.verb) {
            (None, _) => None,
            (Some(_), Verb::Patch(patch_type)) => Some(patch_type.content_type()),
            (Some(_), _) => Some(content_types::JSON),
        }
    }

    /// Path plus url-encoded query string
    pub fn url(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }

    pub fn to_http(&self) -> Result<http::Request<Vec<u8>>> {
        let mut builder = http::Request::builder()
            .method(self.verb.method())
            .uri(self.url())
            .header(http::header::ACCEPT, content_types::JSON);
        if let Some(content_type) = self.content_type() {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        Ok(builder.body(self.body.clone().unwrap_or_default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::{ListOptions, QueryParameterCodec};

    fn builds() -> RequestBuilder {
        RequestBuilder::new(GroupVersion::new("build.openshift.io", "v1")).resource("builds")
    }

    #[test]
    fn test_collection_path() {
        let req = builds().verb(Verb::Get).namespace("ci").build().unwrap();
        assert_eq!(req.path(), "/apis/build.openshift.io/v1/namespaces/ci/builds");
    }

    #[test]
    fn test_item_path_with_subresources() {
        let req = builds()
            .verb(Verb::Put)
            .namespace("ci")
            .name("b-1")
            .subresource(&["status"])
            .build()
            .unwrap();
        assert_eq!(
            req.path(),
            "/apis/build.openshift.io/v1/namespaces/ci/builds/b-1/status"
        );
    }

    #[test]
    fn test_cluster_scoped_path() {
        let req = RequestBuilder::new(GroupVersion::new("", "v1"))
            .verb(Verb::Get)
            .resource("namespaces")
            .name("foo")
            .namespace("")
            .build()
            .unwrap();
        assert_eq!(req.path(), "/api/v1/namespaces/foo");
        assert_eq!(req.resource().namespace, None);
    }

    #[test]
    fn test_assembly_is_order_independent() {
        let a = builds()
            .verb(Verb::Patch(PatchType::Merge))
            .subresource(&["status"])
            .name("b-1")
            .namespace("ci")
            .raw_body(b"{}".to_vec())
            .build()
            .unwrap();
        let b = RequestBuilder::new(GroupVersion::new("build.openshift.io", "v1"))
            .raw_body(b"{}".to_vec())
            .namespace("ci")
            .name("b-1")
            .resource("builds")
            .subresource(&["status"])
            .verb(Verb::Patch(PatchType::Merge))
            .build()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_builder_steps_do_not_leak_between_clones() {
        let base = builds().verb(Verb::Get).namespace("ci");
        let item = base.clone().name("b-1").build().unwrap();
        let list = base.build().unwrap();

        assert!(item.path().ends_with("/builds/b-1"));
        assert!(list.path().ends_with("/builds"));
    }

    #[test]
    fn test_watch_sets_flag_once() {
        let opts = ListOptions {
            watch: true,
            ..ListOptions::default().labels("app=web")
        };
        let req = builds()
            .verb(Verb::Get)
            .namespace("ci")
            .versioned_params(&opts, &QueryParameterCodec)
            .unwrap()
            .watch()
            .build()
            .unwrap();

        let watch_params: Vec<_> = req.params().iter().filter(|(k, _)| k == "watch").collect();
        assert_eq!(watch_params.len(), 1);
        assert_eq!(watch_params[0].1, "true");
        assert!(req.is_watch());
        assert!(req.url().contains("labelSelector=app%3Dweb"));
    }

    #[test]
    fn test_watch_rejects_name_and_non_get() {
        let named = builds().verb(Verb::Get).name("b-1").watch().build();
        assert!(matches!(named, Err(Error::InvalidRequest(_))));

        let deleting = builds().verb(Verb::Delete).watch().build();
        assert!(matches!(deleting, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_rejects_bad_segments() {
        for name in ["", ".", "..", "a/b", "a%2Fb", "b-1?x=y", "b-1#frag", "b 1", "b-1\n"] {
            let res = builds().verb(Verb::Get).name(name).build();
            assert!(
                matches!(res, Err(Error::InvalidRequest(_))),
                "name {:?} should be rejected",
                name
            );
        }
        let res = builds()
            .verb(Verb::Delete)
            .namespace("ci?watch=true")
            .name("b-1")
            .build();
        assert!(matches!(res, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_accepts_names_the_server_allows() {
        for name in ["b-1", "web.app-7", "system:serviceaccount:ci:builder", "user@example.com"] {
            let req = builds().verb(Verb::Get).name(name).build().unwrap();
            assert!(req.path().ends_with(&format!("/builds/{}", name)));
            assert!(req.params().is_empty());
        }
    }

    #[test]
    fn test_rejects_subresource_without_name() {
        let res = builds().verb(Verb::Put).subresource(&["status"]).build();
        assert!(matches!(res, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_rejects_get_with_body() {
        let res = builds().verb(Verb::Get).raw_body(b"{}".to_vec()).build();
        assert!(matches!(res, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_requires_verb_and_resource() {
        let no_verb = builds().build();
        assert!(matches!(no_verb, Err(Error::InvalidRequest(_))));

        let no_resource = RequestBuilder::new(GroupVersion::new("", "v1"))
            .verb(Verb::Get)
            .build();
        assert!(matches!(no_resource, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_content_type_follows_patch_type() {
        let patch = |pt| {
            builds()
                .verb(Verb::Patch(pt))
                .name("b-1")
                .raw_body(b"{}".to_vec())
                .build()
                .unwrap()
        };
        let merge = patch(PatchType::Merge);
        let strategic = patch(PatchType::StrategicMerge);

        assert_eq!(merge.body(), strategic.body());
        assert_ne!(merge.content_type(), strategic.content_type());
        assert_eq!(merge.content_type(), Some("application/merge-patch+json"));
    }

    #[test]
    fn test_to_http() {
        let req = builds()
            .verb(Verb::Post)
            .namespace("ci")
            .body(&serde_json::json!({"metadata": {"name": "b-1"}}))
            .unwrap()
            .build()
            .unwrap()
            .to_http()
            .unwrap();

        assert_eq!(req.method(), http::Method::POST);
        assert_eq!(
            req.uri().path(),
            "/apis/build.openshift.io/v1/namespaces/ci/builds"
        );
        assert_eq!(req.headers()[http::header::CONTENT_TYPE], "application/json");
        assert!(!req.body().is_empty());
    }

    #[test]
    fn test_no_content_type_without_body() {
        let req = builds().verb(Verb::Get).build().unwrap();
        assert_eq!(req.content_type(), None);
        assert_eq!(req.url(), req.path());
    }
}
