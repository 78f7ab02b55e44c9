// External boundary - the remote service that applies a correction

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::records::Record;

use super::types::ResolutionPayload;

/// Applies a submitted correction on the remote side.
///
/// Implementations talk to the sync/ingestion service. The workflow only
/// advances after `resolve` returns `Ok`, so a failing call leaves the session
/// where it was and the operator can retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResolutionHandler: Send + Sync {
    async fn resolve(&self, record: &Record, payload: &ResolutionPayload) -> anyhow::Result<()>;
}
