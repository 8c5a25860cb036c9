//! Pairing files from an input folder with files from a ground-truth folder

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::file_scanner::{collect_files, ScanOptions, SuffixFilter};
use crate::core::error::{Result, ScanError};

/// How a ground-truth file finds its input counterpart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Look the ground-truth basename up among the input listing's relative
    /// paths. Only files at the top of the input folder can match.
    #[default]
    RelativePath,
    /// Compare basenames of both listings, so nested input files match too.
    /// The first input file in scan order wins when basenames repeat.
    Basename,
}

/// What happens when the two folders do not line up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PairingPolicy {
    /// Drop unmatched ground-truth files
    #[default]
    Tolerant,
    /// Fail on unequal listing sizes or on any unmatched ground-truth file
    Strict,
}

/// Options for [`paired_paths_from_folder`]
#[derive(Debug, Clone, Default)]
pub struct PairOptions {
    pub match_mode: MatchMode,
    pub policy: PairingPolicy,
    /// Applied to both listings before matching
    pub suffix: Option<SuffixFilter>,
}

/// An input path and a ground-truth path keyed by `"{key}_path"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    entries: [(String, PathBuf); 2],
}

impl PathPair {
    pub fn new(
        input_key: &str,
        input_path: PathBuf,
        gt_key: &str,
        gt_path: PathBuf,
    ) -> Self {
        Self {
            entries: [
                (format!("{input_key}_path"), input_path),
                (format!("{gt_key}_path"), gt_path),
            ],
        }
    }

    /// Look a path up by its full key, e.g. `"lq_path"`
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, path)| path.as_path())
    }

    pub fn input_path(&self) -> &Path {
        &self.entries[0].1
    }

    pub fn gt_path(&self) -> &Path {
        &self.entries[1].1
    }

    /// Entries in order: input first, ground truth second
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

impl Serialize for PathPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, path) in &self.entries {
            map.serialize_entry(name, &path.to_string_lossy())?;
        }
        map.end()
    }
}

/// Generate paired paths from an input folder and a ground-truth folder
///
/// # Arguments
/// * `folders` - `[input_folder, gt_folder]`
/// * `keys` - `[input_key, gt_key]`, e.g. `["lq", "gt"]`
/// * `options` - Matching mode, strictness and optional suffix filter
///
/// # Returns
/// One [`PathPair`] per matched ground-truth file, in ground-truth scan order
pub fn paired_paths_from_folder<P, K>(
    folders: &[P],
    keys: &[K],
    options: &PairOptions,
) -> Result<Vec<PathPair>>
where
    P: AsRef<Path>,
    K: AsRef<str>,
{
    let [input_folder, gt_folder] = folders else {
        return Err(ScanError::FolderCount(folders.len()));
    };
    let [input_key, gt_key] = keys else {
        return Err(ScanError::KeyCount(keys.len()));
    };
    let (input_folder, gt_folder) = (input_folder.as_ref(), gt_folder.as_ref());
    let (input_key, gt_key) = (input_key.as_ref(), gt_key.as_ref());
    if input_key == gt_key {
        return Err(ScanError::DuplicateKey(input_key.to_string()));
    }

    let scan_options = ScanOptions {
        suffix: options.suffix.clone(),
        recursive: true,
        full_path: false,
    };
    let input_paths = collect_files(input_folder, &scan_options)?;
    let gt_paths = collect_files(gt_folder, &scan_options)?;

    if options.policy == PairingPolicy::Strict && input_paths.len() != gt_paths.len() {
        return Err(ScanError::DatasetSizeMismatch {
            input_key: input_key.to_string(),
            gt_key: gt_key.to_string(),
            input_len: input_paths.len(),
            gt_len: gt_paths.len(),
        });
    }

    let lookup = InputLookup::new(&input_paths, options.match_mode);
    let mut paths = Vec::with_capacity(gt_paths.len());

    for gt_path in &gt_paths {
        let Some(input_name) = gt_path.file_name() else {
            continue;
        };

        match lookup.find(input_name) {
            Some(input_relative) => paths.push(PathPair::new(
                input_key,
                input_folder.join(input_relative),
                gt_key,
                gt_folder.join(gt_path),
            )),
            None if options.policy == PairingPolicy::Strict => {
                return Err(ScanError::MissingInput {
                    name: PathBuf::from(input_name),
                    key: input_key.to_string(),
                });
            }
            None => {
                log::debug!(
                    "no {} file for {}, skipping",
                    input_key,
                    gt_folder.join(gt_path).display()
                );
            }
        }
    }

    log::debug!(
        "paired {} of {} {} files with {} {} files",
        paths.len(),
        gt_paths.len(),
        gt_key,
        input_paths.len(),
        input_key
    );

    Ok(paths)
}

/// Index over the input listing for the configured [`MatchMode`]
enum InputLookup<'a> {
    Relative(HashSet<&'a Path>),
    Basename(HashMap<&'a OsStr, &'a Path>),
}

impl<'a> InputLookup<'a> {
    fn new(input_paths: &'a [PathBuf], mode: MatchMode) -> Self {
        match mode {
            MatchMode::RelativePath => {
                InputLookup::Relative(input_paths.iter().map(PathBuf::as_path).collect())
            }
            MatchMode::Basename => {
                let mut by_name = HashMap::with_capacity(input_paths.len());
                for path in input_paths {
                    if let Some(name) = path.file_name() {
                        by_name.entry(name).or_insert(path.as_path());
                    }
                }
                InputLookup::Basename(by_name)
            }
        }
    }

    /// The relative input path to join onto the input folder, if any
    fn find(&self, name: &'a OsStr) -> Option<&'a Path> {
        match self {
            InputLookup::Relative(paths) => {
                let name = Path::new(name);
                paths.contains(name).then_some(name)
            }
            InputLookup::Basename(by_name) => by_name.get(name).copied(),
        }
    }
}
