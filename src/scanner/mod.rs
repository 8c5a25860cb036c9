//! Directory scanning and folder pairing

pub mod file_scanner;
pub mod pairing;

pub use file_scanner::{collect_files, scandir, ScanDir, ScanOptions, SuffixFilter};
pub use pairing::{paired_paths_from_folder, MatchMode, PairOptions, PairingPolicy, PathPair};
