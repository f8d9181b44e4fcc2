//! Sequence directory enumeration

use glob::Pattern;
use meshseq_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// List the regular files directly inside `dir` whose file name matches any
/// of `patterns` (shell globs such as `*.obj`), sorted by file name.
pub fn get_files_in_path(dir: impl AsRef<Path>, patterns: &[&str]) -> Result<Vec<PathBuf>> {
    let patterns = patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|e| Error::InvalidData(format!("invalid file pattern '{}': {}", p, e))))
        .collect::<Result<Vec<_>>>()?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            log::warn!("skipping non UTF-8 file name {:?}", entry.path());
            continue;
        };
        if patterns.iter().any(|p| p.matches(name)) {
            files.push(entry.path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
