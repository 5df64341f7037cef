//! # Path Walker Module
//!
//! This module expands the paths given on the command line into the candidate
//! files offered to the processor.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Error type for a root path or directory entry that yields no candidate.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
  /// The root path is neither a regular file nor a directory.
  #[error("Not a valid path: {}", .0.display())]
  InvalidPath(PathBuf),

  /// A directory entry below a root could not be read.
  #[error("Failed to read {}: {source}", path.display())]
  Traverse { path: PathBuf, source: walkdir::Error },
}

/// Expands `roots` into a lazy sequence of candidate files.
///
/// - A regular file yields itself.
/// - A directory yields the regular files directly inside it, or with
///   `recursive` set, every regular file in its subtree (in traversal order).
/// - Anything else yields a [`WalkError::InvalidPath`] and the walk moves on
///   to the next root.
pub fn walk_paths(roots: &[PathBuf], recursive: bool) -> impl Iterator<Item = Result<PathBuf, WalkError>> + '_ {
  roots.iter().flat_map(move |root| walk_root(root, recursive))
}

fn walk_root(root: &Path, recursive: bool) -> Box<dyn Iterator<Item = Result<PathBuf, WalkError>>> {
  if root.is_file() {
    return Box::new(std::iter::once(Ok(root.to_path_buf())));
  }

  if !root.is_dir() {
    return Box::new(std::iter::once(Err(WalkError::InvalidPath(root.to_path_buf()))));
  }

  debug!("Scanning directory: {} (recursive: {})", root.display(), recursive);

  let walker = WalkDir::new(root).min_depth(1);
  let walker = if recursive { walker } else { walker.max_depth(1) };

  Box::new(walker.into_iter().filter_map(|entry| match entry {
    Ok(entry) if is_regular_file(&entry) => Some(Ok(entry.into_path())),
    Ok(_) => None,
    Err(source) => {
      let path = source.path().map(Path::to_path_buf).unwrap_or_default();
      Some(Err(WalkError::Traverse { path, source }))
    }
  }))
}

/// Regular files, including symlinks that resolve to one.
fn is_regular_file(entry: &DirEntry) -> bool {
  entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
