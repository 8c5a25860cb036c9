//! Dataset Pair Scanner Library
//!
//! Lazy directory scanning and basename pairing for image-pair datasets.

pub mod core;
pub mod scanner;
pub mod reporting;

pub use crate::core::{config, error};
pub use crate::scanner::{file_scanner, pairing};
pub use crate::reporting::report_writer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::config::PairConfig;
    pub use crate::core::error::ScanError;
    pub use crate::scanner::file_scanner::{collect_files, scandir, ScanDir, ScanOptions, SuffixFilter};
    pub use crate::scanner::pairing::{
        paired_paths_from_folder, MatchMode, PairOptions, PairingPolicy, PathPair,
    };
    pub use crate::reporting::report_writer::{write_pairs_json, write_pairs_report, write_paths};
}
