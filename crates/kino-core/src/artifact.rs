//! Shared contract for the on-disk artifact collections.
//!
//! Specs, hooks, steering files and MCP servers are each read from one place
//! under the `.kino` directory. Infrastructure provides the scanners, the
//! application layer keeps the scanned lists and projects them into tree nodes.

use crate::error::Result;
use async_trait::async_trait;

/// A record that can be looked up by its display name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A source that re-reads one artifact collection from storage.
///
/// Every call returns the whole collection; there is no incremental diffing.
/// Implementations must skip (and log) entries that fail to parse instead of
/// failing the scan, and only return `Err` when the collection as a whole is
/// unreadable.
#[async_trait]
pub trait ArtifactSource<T>: Send + Sync {
    async fn scan(&self) -> Result<Vec<T>>;
}
