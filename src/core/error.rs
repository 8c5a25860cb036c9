//! Error types shared by the scanner and the pairer

use std::path::PathBuf;

/// Errors raised while scanning folders or pairing their contents
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A suffix filter given through a dynamic source was not a string or array of strings
    #[error("\"suffix\" must be a string or an array of strings, but got {0}")]
    InvalidSuffix(String),

    #[error("the len of folders should be 2 with [input_folder, gt_folder], but got {0}")]
    FolderCount(usize),

    #[error("the len of keys should be 2 with [input_key, gt_key], but got {0}")]
    KeyCount(usize),

    #[error("input and ground-truth keys must differ, both are {0:?}")]
    DuplicateKey(String),

    #[error("{input_key} and {gt_key} datasets have different number of files: {input_len}, {gt_len}")]
    DatasetSizeMismatch {
        input_key: String,
        gt_key: String,
        input_len: usize,
        gt_len: usize,
    },

    #[error("{} is not in {key}_paths", name.display())]
    MissingInput { name: PathBuf, key: String },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Whether this error was raised by argument validation, before touching the filesystem
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidSuffix(_)
                | ScanError::FolderCount(_)
                | ScanError::KeyCount(_)
                | ScanError::DuplicateKey(_)
        )
    }
}

/// Result type for scanning and pairing operations
pub type Result<T> = std::result::Result<T, ScanError>;
