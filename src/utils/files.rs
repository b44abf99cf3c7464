//! Collecting a DICOM series from a picked folder.

use ignore::Walk;
use log::warn;
use std::path::{Path, PathBuf};

/// DICOMDIR is the series index, not a slice; the rest is OS clutter.
const SKIPPED_FILES: [&str; 4] = ["DICOMDIR", ".DS_Store", "Thumbs.db", "desktop.ini"];

const SERIES_EXTENSIONS: [&str; 3] = ["dcm", "dicom", "ima"];

/// Collects the slice files of a series from a directory, in path order.
///
/// Only folder pickups are filtered; explicitly picked files always go into
/// the request as chosen.
pub fn collect_series(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in Walk::new(dir) {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && is_series_file(path) {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => warn!("skipping unreadable entry: {}", e),
        }
    }
    files.sort();
    files
}

fn is_series_file(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if SKIPPED_FILES.contains(&name) || name.starts_with('.') {
            return false;
        }
    }

    match path.extension().and_then(|e| e.to_str()) {
        // Slices are often exported without an extension.
        None => true,
        Some(ext) => SERIES_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").expect("write test file");
    }

    #[test]
    fn folder_pickup_keeps_slices_and_drops_clutter() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), "slice_002.dcm");
        touch(dir.path(), "slice_001.dcm");
        touch(dir.path(), "IM0001.IMA");
        touch(dir.path(), "IM0002");
        touch(dir.path(), "DICOMDIR");
        touch(dir.path(), "notes.txt");

        let names: Vec<String> = collect_series(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["IM0001.IMA", "IM0002", "slice_001.dcm", "slice_002.dcm"]);
    }

    #[test]
    fn nested_series_folders_are_walked() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("series_1");
        fs::create_dir(&nested).expect("create nested dir");
        touch(&nested, "slice_001.dcm");

        let files = collect_series(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("series_1/slice_001.dcm"));
    }
}
