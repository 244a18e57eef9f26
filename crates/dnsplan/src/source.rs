// # Record Sources
//
// Where the daemon gets its inputs from on every tick: the records the
// provider currently holds, the records that should exist and, optionally,
// records to create unconditionally.
//
// ## Implementations
//
// - `FileRecordSource`: JSON snapshots on disk, re-read on every call

use async_trait::async_trait;
use dnsplan_core::endpoint::parse_records;
use dnsplan_core::{Endpoint, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies the record lists a plan is calculated from
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Records currently present on the provider
    async fn current_records(&self) -> Result<Vec<Endpoint>>;

    /// Records that should exist
    async fn desired_records(&self) -> Result<Vec<Endpoint>>;

    /// Records to create regardless of current state
    async fn missing_records(&self) -> Result<Vec<Endpoint>> {
        Ok(Vec::new())
    }

    /// Name used in logs
    fn source_name(&self) -> &'static str;
}

/// Record source backed by JSON files
///
/// Each file holds a JSON array of records in the `Endpoint` serde format.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    current_path: PathBuf,
    desired_path: PathBuf,
    missing_path: Option<PathBuf>,
}

impl FileRecordSource {
    pub fn new(current_path: impl Into<PathBuf>, desired_path: impl Into<PathBuf>) -> Self {
        Self {
            current_path: current_path.into(),
            desired_path: desired_path.into(),
            missing_path: None,
        }
    }

    pub fn with_missing_path(mut self, missing_path: impl Into<PathBuf>) -> Self {
        self.missing_path = Some(missing_path.into());
        self
    }

    async fn load(path: &Path) -> Result<Vec<Endpoint>> {
        let json = tokio::fs::read_to_string(path).await?;
        let records = parse_records(&json)?;
        debug!("Loaded {} record(s) from {}", records.len(), path.display());
        Ok(records)
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    async fn current_records(&self) -> Result<Vec<Endpoint>> {
        Self::load(&self.current_path).await
    }

    async fn desired_records(&self) -> Result<Vec<Endpoint>> {
        Self::load(&self.desired_path).await
    }

    async fn missing_records(&self) -> Result<Vec<Endpoint>> {
        match &self.missing_path {
            Some(path) => Self::load(path).await,
            None => Ok(Vec::new()),
        }
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}
