//! Error types and configuration

pub mod config;
pub mod error;

pub use config::PairConfig;
pub use error::{Result, ScanError};
