use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a migration run
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read {}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A company insert failed; nothing from the batch was kept
    #[error("company migration aborted at record {record}; all companies rolled back")]
    CompanyBatchAborted {
        record: usize,
        #[source]
        source: rusqlite::Error,
    },

    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}
