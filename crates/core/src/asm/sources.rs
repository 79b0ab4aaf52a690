//! Source File Discovery.
//!
//! A spec names its programs by prefix: `asm_basename: progs/conv` selects
//! `progs/conv*.asm` next to the spec. Matches are returned in sorted path order,
//! which is also the order their stimulus is scheduled in.

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Lists source files matching `<base_dir>/<basename>*.<extension>`, sorted.
///
/// # Arguments
///
/// * `base_dir` - Directory the basename is relative to (the spec's directory).
/// * `basename` - File prefix, optionally with leading directory components.
/// * `extension` - Source extension without the dot.
///
/// # Returns
///
/// The matching files, possibly none, or an I/O error if the directory can't be read.
pub fn find_sources(base_dir: &Path, basename: &str, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = base_dir.join(basename);
    // A basename ending in a separator selects every source in that directory.
    let (dir, prefix) = if basename.ends_with('/') || basename.is_empty() {
        (pattern.clone(), String::new())
    } else {
        let prefix = pattern
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = pattern
            .parent()
            .map_or_else(|| base_dir.to_path_buf(), Path::to_path_buf);
        (dir, prefix)
    };

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io("can't list sources in", &dir, e)),
    };

    let suffix = format!(".{extension}");
    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io("can't list sources in", &dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(prefix.as_str())
            && name.len() >= prefix.len() + suffix.len()
            && name.ends_with(suffix.as_str())
        {
            sources.push(dir.join(&*name));
        }
    }
    sources.sort();
    Ok(sources)
}
