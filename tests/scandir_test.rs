//! Integration tests for directory scanning
//!
//! Builds small trees in temporary directories and checks which files the
//! scanner yields and how their paths are spelled.

use pairscan::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Tree used by most tests:
///
/// ```text
/// root/
///   a.png
///   b.jpg
///   notes.txt
///   .DS_Store
///   sub/
///     c.png
///     deeper/
///       d.png
///   .git/
///     e.png
/// ```
fn sample_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("sub").join("deeper")).unwrap();
    fs::create_dir(root.join(".git")).unwrap();
    for file in [
        "a.png",
        "b.jpg",
        "notes.txt",
        ".DS_Store",
        "sub/c.png",
        "sub/deeper/d.png",
        ".git/e.png",
    ] {
        File::create(root.join(file)).unwrap();
    }
    temp_dir
}

fn scan_sorted(root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    let mut paths = collect_files(root, options).unwrap();
    paths.sort();
    paths
}

fn rel(parts: &[&str]) -> PathBuf {
    parts.iter().collect()
}

#[test]
fn test_non_recursive_never_yields_subdirectory_files() {
    let temp_dir = sample_tree();

    let paths = scan_sorted(temp_dir.path(), &ScanOptions::new());
    assert_eq!(
        paths,
        vec![rel(&["a.png"]), rel(&["b.jpg"]), rel(&["notes.txt"])]
    );
    assert!(paths.iter().all(|p| p.components().count() == 1));
}

#[test]
fn test_recursive_relative_paths_use_original_root() {
    let temp_dir = sample_tree();

    let paths = scan_sorted(temp_dir.path(), &ScanOptions::new().recursive(true));
    assert_eq!(
        paths,
        vec![
            rel(&["a.png"]),
            rel(&["b.jpg"]),
            rel(&["notes.txt"]),
            rel(&["sub", "c.png"]),
            rel(&["sub", "deeper", "d.png"]),
        ]
    );
    assert!(paths.iter().all(|p| p.is_relative()));
}

#[test]
fn test_full_paths_point_at_real_files() {
    let temp_dir = sample_tree();

    let options = ScanOptions::new().recursive(true).full_path(true);
    let paths = scan_sorted(temp_dir.path(), &options);
    assert_eq!(paths.len(), 5);
    for path in &paths {
        assert!(path.starts_with(temp_dir.path()), "{} outside root", path.display());
        assert!(path.is_absolute());
        assert!(path.is_file());
    }
}

#[test]
fn test_hidden_entries_are_never_yielded_or_descended() {
    let temp_dir = sample_tree();

    let paths = scan_sorted(temp_dir.path(), &ScanOptions::new().recursive(true));
    for path in &paths {
        for component in path.components() {
            let name = component.as_os_str().to_string_lossy();
            assert!(!name.starts_with('.'), "hidden entry {} yielded", path.display());
        }
    }
    assert!(!paths.contains(&rel(&[".git", "e.png"])));
}

#[test]
fn test_suffix_filter_single_and_many() {
    let temp_dir = sample_tree();

    let png_only = ScanOptions::new().recursive(true).suffix(".png");
    assert_eq!(
        scan_sorted(temp_dir.path(), &png_only),
        vec![
            rel(&["a.png"]),
            rel(&["sub", "c.png"]),
            rel(&["sub", "deeper", "d.png"]),
        ]
    );

    let images = ScanOptions::new().suffix(SuffixFilter::new(["png", "jpg"]));
    assert_eq!(
        scan_sorted(temp_dir.path(), &images),
        vec![rel(&["a.png"]), rel(&["b.jpg"])]
    );
}

#[test]
fn test_suffix_filter_applies_to_full_paths() {
    let temp_dir = sample_tree();

    let options = ScanOptions::new().full_path(true).suffix(".txt");
    let paths = scan_sorted(temp_dir.path(), &options);
    assert_eq!(paths, vec![temp_dir.path().join("notes.txt")]);
}

#[test]
fn test_each_scan_is_an_independent_traversal() {
    let temp_dir = sample_tree();
    let options = ScanOptions::new().recursive(true);

    let first: Vec<_> = scandir(temp_dir.path(), &options)
        .collect::<Result<_, _>>()
        .unwrap();
    let second: Vec<PathBuf> = scandir(temp_dir.path(), &options)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_scan_is_lazy() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("later");

    // Creating the scan touches nothing, so the root may appear afterwards
    let scan = scandir(&root, &ScanOptions::new());
    fs::create_dir(&root).unwrap();
    File::create(root.join("a.png")).unwrap();

    let paths: Vec<PathBuf> = scan.collect::<Result<_, _>>().unwrap();
    assert_eq!(paths, vec![rel(&["a.png"])]);
}

#[test]
fn test_missing_directory_errors_on_consumption() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    let err = collect_files(&missing, &ScanOptions::new()).unwrap_err();
    assert!(matches!(err, ScanError::Walk(_)));
    assert!(!err.is_validation());
}

#[test]
fn test_empty_directory_yields_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let paths = collect_files(temp_dir.path(), &ScanOptions::new().recursive(true)).unwrap();
    assert!(paths.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinked_directories_are_followed() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    let root = temp_dir.path().join("root");
    fs::create_dir(&data).unwrap();
    fs::create_dir(&root).unwrap();
    File::create(data.join("x.png")).unwrap();
    std::os::unix::fs::symlink(&data, root.join("linked")).unwrap();

    let recursive = scan_sorted(&root, &ScanOptions::new().recursive(true));
    assert_eq!(recursive, vec![rel(&["linked", "x.png"])]);

    let flat = scan_sorted(&root, &ScanOptions::new());
    assert!(flat.is_empty());
}

#[cfg(unix)]
#[test]
fn test_flat_scan_skips_dangling_symlink() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    File::create(root.join("a.png")).unwrap();
    File::create(root.join("b.png")).unwrap();
    std::os::unix::fs::symlink(root.join("nowhere"), root.join("dangling")).unwrap();

    let paths = scan_sorted(root, &ScanOptions::new());
    assert_eq!(paths, vec![rel(&["a.png"]), rel(&["b.png"])]);
}

#[cfg(unix)]
#[test]
fn test_recursive_scan_reports_dangling_symlink() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    File::create(root.join("a.png")).unwrap();
    std::os::unix::fs::symlink(root.join("nowhere"), root.join("dangling")).unwrap();

    let err = collect_files(root, &ScanOptions::new().recursive(true)).unwrap_err();
    assert!(matches!(err, ScanError::Walk(_)));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_ends_the_scan() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let locked = root.join("locked");
    fs::create_dir(&locked).unwrap();
    File::create(locked.join("inner.png")).unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        File::create(root.join(name)).unwrap();
    }
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the directory
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let mut scan = scandir(root, &ScanOptions::new().recursive(true));
    let mut yielded = Vec::new();
    let err = loop {
        match scan.next() {
            Some(Ok(path)) => yielded.push(path),
            Some(Err(err)) => break err,
            None => panic!("scan finished without reporting the locked directory"),
        }
    };
    assert!(scan.next().is_none());
    assert!(scan.next().is_none());

    // Whatever came before the failure is a visible top-level file
    let expected = [rel(&["a.png"]), rel(&["b.png"]), rel(&["c.png"])];
    assert!(yielded.iter().all(|p| expected.contains(p)));
    match err {
        ScanError::Walk(walk_err) => {
            assert_eq!(walk_err.path(), Some(locked.as_path()));
        }
        other => panic!("unexpected error: {other}"),
    }

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}
