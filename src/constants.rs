// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Content types sent and accepted by the client
pub mod content_types {
    pub const JSON: &str = "application/json";
    pub const JSON_PATCH: &str = "application/json-patch+json";
    pub const MERGE_PATCH: &str = "application/merge-patch+json";
    pub const STRATEGIC_MERGE_PATCH: &str = "application/strategic-merge-patch+json";
    pub const APPLY_PATCH: &str = "application/apply-patch+yaml";
}

/// Query parameter keys the client sets itself
pub mod query {
    pub const WATCH: &str = "watch";
}

/// Subresource written by `update_status`
pub const STATUS_SUBRESOURCE: &str = "status";

/// Polling defaults for eventually consistent reads
pub mod poll {
    /// Interval between two condition checks in milliseconds
    pub const INTERVAL_MILLIS: u64 = 10;
    /// Give up after this many seconds
    pub const TIMEOUT_SECS: u64 = 10;
}

/// Limits applied while decoding watch streams
pub mod watch {
    /// Longest single event line accepted before the watch is abandoned
    pub const MAX_EVENT_BYTES: usize = 16 * 1024 * 1024;
}
