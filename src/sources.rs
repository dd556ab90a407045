//! Expands the configured input paths into the list of files to compile.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

/// Files are kept as given, directories are walked for files carrying
/// `extension`. The result is sorted and free of duplicates.
///
/// Paths that do not exist are kept; the parser treats them as empty.
pub fn collect(inputs: &[PathBuf], extension: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = walk(input, extension);
            debug!(dir = %input.display(), count = found.len(), "expanded source directory");
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    files.sort();
    files.dedup();
    files
}

fn walk(root: &Path, extension: &str) -> Vec<PathBuf> {
    WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension)
        })
        .collect()
}
