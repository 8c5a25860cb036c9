//! Lazy directory scanning with hidden-entry skipping and suffix filtering

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, FilterEntry, WalkDir};

use crate::core::error::{Result, ScanError};

/// One or more path suffixes a scanned file must end with
///
/// Matching is a plain string-suffix test on the rendered path, so `png`
/// accepts `foo.png` just as `.png` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixFilter {
    suffixes: Vec<String>,
}

impl SuffixFilter {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(suffix: impl Into<String>) -> Self {
        Self {
            suffixes: vec![suffix.into()],
        }
    }

    /// Build a filter from an untyped value such as a config file entry
    ///
    /// Accepts a string or an array of strings; everything else is rejected
    /// with [`ScanError::InvalidSuffix`].
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(suffix) => Ok(Self::single(suffix.as_str())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_owned).ok_or_else(|| {
                        ScanError::InvalidSuffix(format!(
                            "an array containing {}",
                            describe(item)
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::new),
            other => Err(ScanError::InvalidSuffix(describe(other).to_string())),
        }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Check whether `path` ends with any accepted suffix
    ///
    /// An empty filter matches nothing.
    pub fn matches(&self, path: &Path) -> bool {
        let rendered = path.to_string_lossy();
        self.suffixes
            .iter()
            .any(|suffix| rendered.ends_with(suffix.as_str()))
    }
}

impl From<&str> for SuffixFilter {
    fn from(suffix: &str) -> Self {
        Self::single(suffix)
    }
}

impl From<String> for SuffixFilter {
    fn from(suffix: String) -> Self {
        Self::single(suffix)
    }
}

impl<S: Into<String>> FromIterator<S> for SuffixFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Options controlling a single [`scandir`] call
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Only yield paths ending with one of these suffixes
    pub suffix: Option<SuffixFilter>,
    /// Descend into non-hidden subdirectories
    pub recursive: bool,
    /// Yield root-joined paths instead of paths relative to the root
    pub full_path: bool,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suffix(mut self, suffix: impl Into<SuffixFilter>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn full_path(mut self, full_path: bool) -> Self {
        self.full_path = full_path;
        self
    }
}

type VisibleEntries = FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>;

/// Lazy sequence of files found under a scan root
///
/// Directories are read only as the iterator is advanced, so filesystem
/// errors surface as `Err` items at the point of traversal. The first error
/// ends the sequence.
///
/// A flat scan treats a link it cannot resolve like any other non-file entry
/// and skips it; a recursive scan reports it, since it would have to descend.
pub struct ScanDir {
    root: PathBuf,
    entries: VisibleEntries,
    suffix: Option<SuffixFilter>,
    recursive: bool,
    full_path: bool,
    finished: bool,
}

impl ScanDir {
    /// The directory this scan was started from
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn output_path(&self, entry: DirEntry) -> PathBuf {
        if self.full_path {
            return entry.into_path();
        }
        match entry.path().strip_prefix(&self.root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => entry.into_path(),
        }
    }

    /// Whether a walk error is a top-level link a flat scan may skip
    fn is_unresolved_link(&self, err: &walkdir::Error) -> io::Result<bool> {
        if self.recursive || err.depth() != 1 {
            return Ok(false);
        }
        match err.path() {
            Some(path) if path != self.root => {
                Ok(fs::symlink_metadata(path)?.file_type().is_symlink())
            }
            Some(_) => Ok(false),
            None => Ok(false),
        }
    }
}

impl Iterator for ScanDir {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => match self.is_unresolved_link(&err) {
                    Ok(true) => {
                        log::debug!("skipping unresolved link: {}", err);
                        continue;
                    }
                    Ok(false) => {
                        self.finished = true;
                        return Some(Err(err.into()));
                    }
                    Err(io_err) => {
                        self.finished = true;
                        return Some(Err(ScanError::Io(io_err)));
                    }
                },
            };

            // Directories are expanded by the walker itself; special files are skipped
            if !entry.file_type().is_file() {
                continue;
            }

            let candidate = self.output_path(entry);
            let accepted = self
                .suffix
                .as_ref()
                .map_or(true, |filter| filter.matches(&candidate));
            if accepted {
                return Some(Ok(candidate));
            }
        }
    }
}

impl std::iter::FusedIterator for ScanDir {}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().starts_with(b".")
}

// The root is never rejected, even when its own name starts with a dot
fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !is_hidden(entry)
}

/// Scan a directory for files of interest
///
/// # Arguments
/// * `dir` - Directory to scan
/// * `options` - Suffix filter, recursion and path style
///
/// # Returns
/// A lazy iterator of file paths. Nothing is read until it is advanced.
pub fn scandir(dir: impl AsRef<Path>, options: &ScanOptions) -> ScanDir {
    let root = dir.as_ref().to_path_buf();
    log::debug!(
        "scanning {} (recursive: {}, full_path: {})",
        root.display(),
        options.recursive,
        options.full_path
    );

    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let entries = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_entry(is_visible as fn(&DirEntry) -> bool);

    ScanDir {
        root,
        entries,
        suffix: options.suffix.clone(),
        recursive: options.recursive,
        full_path: options.full_path,
        finished: false,
    }
}

/// Collect every file [`scandir`] yields, stopping at the first error
pub fn collect_files(dir: impl AsRef<Path>, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    scandir(dir, options).collect()
}
