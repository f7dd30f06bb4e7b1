use std::time::Duration;

/// Synchronizer configuration.
///
/// Timeouts on the two stores are independent and entity-agnostic: they are
/// configured once per process, not per call. Every adapter call the
/// synchronizer issues is wrapped in the matching store's timeout; an
/// elapsed detail-store call degrades the operation, an elapsed core-store
/// call fails it.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Timeout applied to each document-store call.
    pub detail_timeout: Duration,

    /// Timeout applied to each relational-store call.
    pub core_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            detail_timeout: Duration::from_secs(10),
            core_timeout: Duration::from_secs(30),
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document-store timeout
    pub fn detail_timeout(mut self, timeout: Duration) -> Self {
        self.detail_timeout = timeout;
        self
    }

    /// Set the relational-store timeout
    pub fn core_timeout(mut self, timeout: Duration) -> Self {
        self.core_timeout = timeout;
        self
    }
}
