// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed options for list, get, delete and patch calls.

use crate::constants::content_types;
use crate::error::{Error, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as meta;
use serde::Serialize;

pub use meta::Preconditions;

/// How `resource_version` is matched on list calls
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub enum VersionMatch {
    NotOlderThan,
    Exact,
}

/// Query options for list, watch and delete-collection calls.
///
/// Encoded into URL parameters through a [`ParameterCodec`](super::ParameterCodec).
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_selector: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub watch: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allow_watch_bookmarks: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version_match: Option<VersionMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
}

impl ListOptions {
    #[must_use]
    pub fn labels(mut self, selector: &str) -> Self {
        self.label_selector = Some(selector.to_string());
        self
    }

    #[must_use]
    pub fn fields(mut self, selector: &str) -> Self {
        self.field_selector = Some(selector.to_string());
        self
    }

    /// List or watch starting at the given resource version
    #[must_use]
    pub fn at(mut self, resource_version: &str) -> Self {
        self.resource_version = Some(resource_version.to_string());
        self
    }

    #[must_use]
    pub fn matching(mut self, version_match: VersionMatch) -> Self {
        self.resource_version_match = Some(version_match);
        self
    }

    #[must_use]
    pub fn timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn continue_token(mut self, token: &str) -> Self {
        self.continue_token = Some(token.to_string());
        self
    }

    #[must_use]
    pub fn bookmarks(mut self) -> Self {
        self.allow_watch_bookmarks = true;
        self
    }
}

/// Query options for get calls
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

impl GetOptions {
    pub fn at(resource_version: &str) -> Self {
        Self {
            resource_version: Some(resource_version.to_string()),
        }
    }
}

/// Garbage collection policy for dependents of a deleted object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropagationPolicy {
    Orphan,
    Background,
    Foreground,
}

impl PropagationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orphan => "Orphan",
            Self::Background => "Background",
            Self::Foreground => "Foreground",
        }
    }
}

/// Options for delete calls, always sent as the request body.
///
/// Wraps the API's `DeleteOptions` so the body keeps the exact wire shape.
/// Preconditions that do not match the stored object are answered with
/// `409 Conflict`.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct DeleteOptions(pub meta::DeleteOptions);

impl DeleteOptions {
    fn propagating(policy: PropagationPolicy) -> Self {
        Self(meta::DeleteOptions {
            propagation_policy: Some(policy.as_str().to_string()),
            ..Default::default()
        })
    }

    pub fn background() -> Self {
        Self::propagating(PropagationPolicy::Background)
    }

    pub fn foreground() -> Self {
        Self::propagating(PropagationPolicy::Foreground)
    }

    pub fn orphan() -> Self {
        Self::propagating(PropagationPolicy::Orphan)
    }

    #[must_use]
    pub fn grace_period(mut self, seconds: u32) -> Self {
        self.0.grace_period_seconds = Some(i64::from(seconds));
        self
    }

    #[must_use]
    pub fn preconditions(mut self, preconditions: Preconditions) -> Self {
        self.0.preconditions = Some(preconditions);
        self
    }

    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.0.dry_run = Some(vec![DRY_RUN_ALL.to_string()]);
        self
    }

    pub fn into_inner(self) -> meta::DeleteOptions {
        self.0
    }
}

impl From<meta::DeleteOptions> for DeleteOptions {
    fn from(options: meta::DeleteOptions) -> Self {
        Self(options)
    }
}

/// Query options for patch calls.
///
/// Server-side apply needs a field manager; `force` takes over fields owned
/// by other managers and is only accepted together with apply.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_manager: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
    #[serde(serialize_with = "dry_run_all", skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl PatchParams {
    /// Parameters for a server-side apply owned by `field_manager`
    pub fn apply(field_manager: &str) -> Self {
        Self {
            field_manager: Some(field_manager.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub(crate) fn validate(&self, patch_type: PatchType) -> Result<()> {
        if patch_type == PatchType::Apply {
            if self.field_manager.as_deref().map_or(true, str::is_empty) {
                return Err(Error::InvalidRequest(
                    "apply patches require a field manager".to_string(),
                ));
            }
        } else if self.force {
            return Err(Error::InvalidRequest(format!(
                "force is only valid for apply patches, not {:?}",
                patch_type
            )));
        }
        Ok(())
    }
}

const DRY_RUN_ALL: &str = "All";

// dryRun is a list of stages, and "All" is the only stage there is.
fn dry_run_all<S>(_: &bool, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;
    let mut seq = s.serialize_seq(Some(1))?;
    seq.serialize_element(DRY_RUN_ALL)?;
    seq.end()
}

/// How the server interprets a patch body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatchType {
    /// RFC 6902 JSON patch
    Json,
    /// RFC 7386 JSON merge patch
    Merge,
    StrategicMerge,
    /// Server-side apply
    Apply,
}

impl PatchType {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => content_types::JSON_PATCH,
            Self::Merge => content_types::MERGE_PATCH,
            Self::StrategicMerge => content_types::STRATEGIC_MERGE_PATCH,
            Self::Apply => content_types::APPLY_PATCH,
        }
    }
}
