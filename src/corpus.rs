use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::errors::BenchError;

/// Count every `.java` file under `root`, build output included. This is
/// the context metric shown in reports, not the reference tool's input.
pub fn count_source_files(root: &Path) -> usize {
    let mut count = 0;
    walk(root, &mut |_| count += 1, false);
    count
}

/// Collect the `.java` files the reference tool should lint, lexically
/// sorted. Paths under any `build` directory are generated output and are
/// excluded.
pub fn source_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk(root, &mut |p| files.push(p), true);
    files.sort();
    files
}

/// Write the newline-separated file list consumed via the `@file` argument
/// convention. Very large corpora exceed command-line length limits, so the
/// reference tool gets one argument referencing this file instead of
/// thousands of paths. Returns the number of files listed.
pub fn write_file_list(root: &Path, dest: &Path) -> Result<usize> {
    let files = source_files(root);
    let mut text = String::new();
    for file in &files {
        text.push_str(&file.to_string_lossy());
        text.push('\n');
    }

    std::fs::write(dest, text).map_err(|source| BenchError::FileList {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(files.len())
}

/// Depth-first walk over `root`, invoking `visit` for each `.java` file.
/// Unreadable entries are skipped rather than failing the run.
fn walk(dir: &Path, visit: &mut impl FnMut(PathBuf), skip_build_dirs: bool) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(_) => continue,
        };

        if file_type.is_symlink() {
            continue;
        }

        if file_type.is_dir() {
            if skip_build_dirs && path.file_name().and_then(|n| n.to_str()) == Some("build") {
                continue;
            }
            walk(&path, visit, skip_build_dirs);
            continue;
        }

        if path.extension().and_then(|e| e.to_str()) == Some("java") {
            visit(path);
        }
    }
}
