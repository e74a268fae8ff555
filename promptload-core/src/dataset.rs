//! Dataset loading and validation
//!
//! A dataset document is either an array of named datasets or a bare array
//! of cases, which is wrapped into a single default-named dataset.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// A single unit of work: one prompt
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Case {
    /// Prompt text
    pub input: String,
}

/// A named, ordered collection of cases benchmarked together
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Dataset {
    /// Dataset name, used to key results and metrics
    #[serde(default = "default_dataset_name")]
    pub name: String,

    /// Cases to dispatch
    pub data: Vec<Case>,
}

fn default_dataset_name() -> String {
    "unnamed_dataset".to_string()
}

/// Dataset loading errors, fatal at startup
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Dataset document contains no datasets")]
    Empty,
}

/// Accepted top-level document shapes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetDocument {
    Datasets(Vec<Dataset>),
    Cases(Vec<Case>),
}

/// Parse a dataset document from a JSON string
pub fn parse_datasets(content: &str) -> Result<Vec<Dataset>, DatasetError> {
    let document: DatasetDocument = serde_json::from_str(content)?;

    let datasets = match document {
        DatasetDocument::Datasets(datasets) => datasets,
        DatasetDocument::Cases(cases) => vec![Dataset {
            name: "dataset1".to_string(),
            data: cases,
        }],
    };

    if datasets.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(datasets)
}

/// Load datasets from a JSON file
pub fn load_datasets(path: impl AsRef<Path>) -> Result<Vec<Dataset>, DatasetError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_datasets(&content)
}
