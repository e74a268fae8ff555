//! Flat-file result storage

use crate::error::StorageError;
use async_trait::async_trait;
use promptload_core::{RequestOutcome, ResultSink, SinkError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Stores each dataset's raw result set as one pretty-printed JSON file
///
/// Files are named `<base_path>_<dataset>.json` and overwritten on
/// repeated runs.
pub struct FileResultStore {
    base_path: PathBuf,
}

impl FileResultStore {
    /// Create a store writing next to the given base path
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Target file for a dataset name
    pub fn path_for(&self, dataset_name: &str) -> PathBuf {
        let mut name = self
            .base_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.push('_');
        name.push_str(dataset_name);
        name.push_str(".json");

        match self.base_path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    async fn write(&self, dataset_name: &str, outcomes: &[RequestOutcome]) -> Result<(), StorageError> {
        let full_path = self.path_for(dataset_name);

        if let Some(parent) = full_path.parent() {
            if parent != Path::new("") {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_vec_pretty(outcomes)?;
        tokio::fs::write(&full_path, content).await?;

        info!(
            "Results for dataset '{}' stored in {}",
            dataset_name,
            full_path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl ResultSink for FileResultStore {
    async fn store_results(
        &self,
        dataset_name: &str,
        outcomes: &[RequestOutcome],
    ) -> Result<(), SinkError> {
        self.write(dataset_name, outcomes).await.map_err(Into::into)
    }
}
