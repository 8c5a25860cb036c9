//! Report writing for scan listings and pair records

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scanner::pairing::PathPair;

/// Write scanned paths, one per line
pub fn write_paths<W: Write>(mut out: W, paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        writeln!(out, "{}", path.display())?;
    }
    out.flush()?;
    Ok(())
}

/// Write pair records as a pretty-printed JSON array
pub fn write_pairs_json<W: Write>(mut out: W, pairs: &[PathPair]) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, pairs)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write pair records as a human-readable report
///
/// # Arguments
/// * `out` - Destination writer
/// * `folders` - `[input_folder, gt_folder]` as given to the pairer
/// * `pairs` - Pair records to list
pub fn write_pairs_report<W: Write>(
    mut out: W,
    folders: &[&Path; 2],
    pairs: &[PathPair],
) -> Result<()> {
    writeln!(out, "Paired Paths Report")?;
    writeln!(out, "===================")?;
    writeln!(out, "  Input folder: {}", folders[0].display())?;
    writeln!(out, "  Ground-truth folder: {}", folders[1].display())?;
    writeln!(out, "  Total pairs: {}", pairs.len())?;
    writeln!(out)?;

    if let Some(first) = pairs.first() {
        let keys: Vec<&str> = first.iter().map(|(key, _)| key).collect();
        writeln!(out, "Pairs ({}):", keys.join(" -> "))?;
        writeln!(out, "------")?;
        for pair in pairs {
            writeln!(
                out,
                "  {} -> {}",
                pair.input_path().display(),
                pair.gt_path().display()
            )?;
        }
    }

    out.flush()?;
    Ok(())
}
