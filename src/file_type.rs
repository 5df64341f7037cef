//! # File Type Module
//!
//! Determines the type identifier of a file: from its shebang when the first
//! line names a known interpreter, otherwise from its extension.

use std::io::{self, BufRead, Seek, SeekFrom};
use std::path::Path;

use tracing::trace;

use crate::shebang::ShebangDetector;

/// Result of resolving a file's type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
  /// The first line, when it is a shebang that must be kept in place.
  pub shebang: Option<String>,
  /// The type identifier, if one could be determined.
  pub file_type: Option<String>,
}

/// Error type for type resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
  /// The first line is not valid UTF-8.
  #[error("file is not valid UTF-8 text")]
  NotText,

  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Resolves type identifiers via [`ShebangDetector`] with an extension
/// fallback.
#[derive(Debug, Clone)]
pub struct FileTypeResolver {
  detector: ShebangDetector,
}

impl FileTypeResolver {
  pub const fn new(detector: ShebangDetector) -> Self {
    Self { detector }
  }

  /// Reads the first line of `reader` and resolves the type of `path`.
  ///
  /// The reader is rewound to the start of the file before returning
  /// successfully, so the whole file can be streamed again afterwards.
  pub fn resolve<R: BufRead + Seek>(&self, path: &Path, reader: &mut R) -> Result<Resolution, ResolveError> {
    let mut first_line = String::new();
    match reader.read_line(&mut first_line) {
      Ok(_) => {}
      Err(e) if e.kind() == io::ErrorKind::InvalidData => return Err(ResolveError::NotText),
      Err(e) => return Err(e.into()),
    }

    let shebang = self.detector.detect(&first_line);
    reader.seek(SeekFrom::Start(0))?;

    let (shebang, detected) = match shebang {
      Some(shebang) => (Some(shebang.line), shebang.file_type),
      None => (None, None),
    };

    let file_type = detected.or_else(|| extension_of(path));
    trace!("Resolved {} as {:?} (shebang: {})", path.display(), file_type, shebang.is_some());

    Ok(Resolution { shebang, file_type })
  }
}

/// The suffix after the last `.` of the file name, as written.
///
/// Dotfiles such as `.bashrc` have no extension.
pub fn extension_of(path: &Path) -> Option<String> {
  path
    .extension()
    .map(|ext| ext.to_string_lossy().into_owned())
    .filter(|ext| !ext.is_empty())
}
