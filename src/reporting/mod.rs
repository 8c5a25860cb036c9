//! Output writers

pub mod report_writer;
