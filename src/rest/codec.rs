// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Encoding of typed options objects into query parameters.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use tracing::trace;

/// An API group and version, e.g. `build.openshift.io/v1`. The core group is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    pub fn new(group: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
        }
    }

    /// Path prefix every resource of this group/version lives under
    pub fn api_prefix(&self) -> String {
        if self.group.is_empty() {
            format!("/api/{}", self.version)
        } else {
            format!("/apis/{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// Turns a serialized options object into flat query pairs for one API version.
pub trait ParameterCodec: Send + Sync {
    fn encode_parameters(
        &self,
        options: &Value,
        version: &GroupVersion,
    ) -> Result<Vec<(String, String)>>;
}

/// Encodes the top-level fields of an options object as `key=value` pairs.
///
/// Scalars are written as-is, arrays become repeated keys and nulls are
/// skipped. Nested objects cannot be expressed in a query string and are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParameterCodec;

impl ParameterCodec for QueryParameterCodec {
    fn encode_parameters(
        &self,
        options: &Value,
        version: &GroupVersion,
    ) -> Result<Vec<(String, String)>> {
        let fields = match options {
            Value::Null => return Ok(Vec::new()),
            Value::Object(fields) => fields,
            other => {
                return Err(Error::InvalidRequest(format!(
                    "options must serialize to an object, got {}",
                    other
                )))
            }
        };

        let mut pairs = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            match value {
                Value::Array(items) => {
                    for item in items {
                        pairs.push((key.clone(), scalar(key, item)?));
                    }
                }
                Value::Null => {}
                other => pairs.push((key.clone(), scalar(key, other)?)),
            }
        }

        trace!("Encoded {} query parameters for {}", pairs.len(), version);
        Ok(pairs)
    }
}

fn scalar(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::InvalidRequest(format!(
            "query parameter '{}' must be a scalar",
            key
        ))),
    }
}
