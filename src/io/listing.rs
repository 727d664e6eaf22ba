use crate::types::{ExtractError, ExtractResult, RasterFile};
use std::path::Path;

/// List the files in `dir` whose names end with `extension`, sorted
/// lexicographically by filename.
///
/// The lexicographic order is the pre-date-parse ordering of the batch;
/// the final time series is sorted by date with this order breaking ties.
/// A missing or unreadable directory is a fatal [`ExtractError::Directory`].
pub fn list_raster_files<P: AsRef<Path>>(
    dir: P,
    extension: &str,
) -> ExtractResult<Vec<RasterFile>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| ExtractError::Directory {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ExtractError::Directory {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let filename = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        if filename.ends_with(extension) {
            files.push(RasterFile { path, filename });
        }
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    log::debug!(
        "{}: {} file(s) match '{}'",
        dir.display(),
        files.len(),
        extension
    );

    Ok(files)
}
