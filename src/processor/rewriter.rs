//! # File Rewriter Module
//!
//! This module produces the rewritten file: preserved shebang, rendered
//! header, blank separator, then the original body. The body is streamed line
//! by line through the existing-header guard, and the result only replaces the
//! original once it has been fully written to a temporary file next to it.

use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::header_guard::HeaderDetector;

/// How streaming the original body ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
  /// Every original line was copied.
  Complete,
  /// An existing header was detected; the output must be discarded.
  HeaderFound,
  /// The body is not valid UTF-8; the output must be discarded.
  NotText,
}

/// Result of an in-place rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
  /// The original path now holds the new content.
  Rewritten,
  /// An existing header was detected; the original is untouched.
  HeaderFound,
  /// The body is not valid UTF-8; the original is untouched.
  NotText,
  /// The new content could not be put in place; the original is untouched.
  WriteFailed(String),
}

/// File rewriting operations for the processor.
pub struct FileRewriter;

impl FileRewriter {
  /// Writes the new file content to `out`.
  ///
  /// `reader` must be positioned at the start of the original file. When
  /// `shebang` is given, the first original line is taken to be that shebang
  /// and is not copied a second time.
  ///
  /// # Returns
  ///
  /// The [`StreamStatus`]. On anything but [`StreamStatus::Complete`], `out`
  /// holds a partial result that must be thrown away.
  pub fn stream_with_header<R, W>(
    reader: &mut R,
    out: &mut W,
    shebang: Option<&str>,
    header: &str,
    detector: &dyn HeaderDetector,
  ) -> io::Result<StreamStatus>
  where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
  {
    if let Some(shebang) = shebang {
      out.write_all(shebang.as_bytes())?;
      if !shebang.ends_with('\n') {
        out.write_all(b"\n")?;
      }
    }

    out.write_all(header.as_bytes())?;
    if !header.ends_with('\n') {
      out.write_all(b"\n")?;
    }
    out.write_all(b"\n")?;

    let mut line = String::new();
    let mut index = 0;
    loop {
      line.clear();
      match reader.read_line(&mut line) {
        Ok(0) => break,
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::InvalidData => return Ok(StreamStatus::NotText),
        Err(e) => return Err(e),
      }

      let is_shebang_line = index == 0 && shebang.is_some();
      if !is_shebang_line {
        if detector.detects(index, &line) {
          trace!("Existing header marker found on line {}", index + 1);
          return Ok(StreamStatus::HeaderFound);
        }
        out.write_all(line.as_bytes())?;
      }
      index += 1;
    }

    Ok(StreamStatus::Complete)
  }

  /// Rewrites `path` in place with the header inserted.
  ///
  /// The content is staged in a temporary file in the same directory, which
  /// then atomically replaces `path` with the original permission bits. The
  /// temporary file is removed on every path that does not commit it.
  ///
  /// # Errors
  ///
  /// Returns an error if reading the original fails or the staged content
  /// cannot be written. Failures to put the staged file in place are reported
  /// as [`RewriteOutcome::WriteFailed`] instead.
  pub fn rewrite_in_place<R: BufRead>(
    path: &Path,
    mut reader: R,
    shebang: Option<&str>,
    header: &str,
    detector: &dyn HeaderDetector,
  ) -> io::Result<RewriteOutcome> {
    // Write through symlinks: the link stays and its target gets the header.
    let target = fs::canonicalize(path)?;
    let metadata = fs::metadata(&target)?;
    let permissions = metadata.permissions();
    let dir = target
      .parent()
      .filter(|parent| !parent.as_os_str().is_empty())
      .unwrap_or_else(|| Path::new("."));

    let mut staged = match NamedTempFile::new_in(dir) {
      Ok(file) => file,
      Err(e) => {
        return Ok(RewriteOutcome::WriteFailed(format!(
          "cannot create temporary file in {}: {e}",
          dir.display()
        )));
      }
    };

    let status = {
      let mut writer = BufWriter::new(staged.as_file_mut());
      let status = Self::stream_with_header(&mut reader, &mut writer, shebang, header, detector)?;
      writer.flush()?;
      status
    };
    drop(reader);

    match status {
      StreamStatus::Complete => {}
      StreamStatus::HeaderFound => return Ok(RewriteOutcome::HeaderFound),
      StreamStatus::NotText => return Ok(RewriteOutcome::NotText),
    }

    if permissions.readonly() {
      return Ok(RewriteOutcome::WriteFailed("file is read-only".to_string()));
    }

    copy_ownership(staged.as_file(), &metadata);

    if let Err(e) = staged.as_file().set_permissions(permissions) {
      return Ok(RewriteOutcome::WriteFailed(format!("cannot copy permissions: {e}")));
    }

    if let Err(e) = staged.as_file().sync_all() {
      return Ok(RewriteOutcome::WriteFailed(format!("cannot flush changes: {e}")));
    }

    match staged.persist(&target) {
      Ok(_) => {
        debug!("Replaced {}", target.display());
        Ok(RewriteOutcome::Rewritten)
      }
      Err(e) => Ok(RewriteOutcome::WriteFailed(e.error.to_string())),
    }
  }
}

/// Gives the staged file the original's owner and group where permitted.
#[cfg(unix)]
fn copy_ownership(staged: &fs::File, original: &fs::Metadata) {
  use std::os::unix::fs::{MetadataExt, fchown};

  let Ok(current) = staged.metadata() else {
    return;
  };
  if current.uid() == original.uid() && current.gid() == original.gid() {
    return;
  }
  if let Err(e) = fchown(staged, Some(original.uid()), Some(original.gid())) {
    debug!("Keeping new owner {}:{}: {}", current.uid(), current.gid(), e);
  }
}

#[cfg(not(unix))]
fn copy_ownership(_staged: &fs::File, _original: &fs::Metadata) {}

#[cfg(test)]
mod tests {
  use std::io::{BufReader, Cursor};

  use tempfile::tempdir;

  use super::*;
  use crate::header_guard::MarkerGuard;

  const HEADER: &str = "# Copyright (c) 2025 Test\n";

  fn stream(input: &str, shebang: Option<&str>) -> (StreamStatus, String) {
    let mut out = Vec::new();
    let status = FileRewriter::stream_with_header(
      &mut Cursor::new(input),
      &mut out,
      shebang,
      HEADER,
      &MarkerGuard::default(),
    )
    .unwrap();
    (status, String::from_utf8(out).unwrap())
  }

  #[test]
  fn test_stream_plain_file() {
    let (status, out) = stream("print('hi')\n", None);
    assert_eq!(status, StreamStatus::Complete);
    assert_eq!(out, "# Copyright (c) 2025 Test\n\nprint('hi')\n");
  }

  #[test]
  fn test_stream_keeps_shebang_first() {
    let (status, out) = stream("#!/usr/bin/env python\nprint('hi')\n", Some("#!/usr/bin/env python\n"));
    assert_eq!(status, StreamStatus::Complete);
    assert_eq!(
      out,
      "#!/usr/bin/env python\n# Copyright (c) 2025 Test\n\nprint('hi')\n"
    );
  }

  #[test]
  fn test_stream_shebang_without_newline() {
    let (_, out) = stream("#!/bin/sh", Some("#!/bin/sh"));
    assert_eq!(out, "#!/bin/sh\n# Copyright (c) 2025 Test\n\n");
  }

  #[test]
  fn test_stream_block_header_gets_separator() {
    let mut out = Vec::new();
    FileRewriter::stream_with_header(
      &mut Cursor::new("int x;\n"),
      &mut out,
      None,
      "/*\n * Copyright\n */",
      &MarkerGuard::default(),
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "/*\n * Copyright\n */\n\nint x;\n");
  }

  #[test]
  fn test_stream_preserves_crlf_and_missing_final_newline() {
    let (_, out) = stream("a\r\nb", None);
    assert_eq!(out, "# Copyright (c) 2025 Test\n\na\r\nb");
  }

  #[test]
  fn test_stream_detects_existing_header() {
    let (status, _) = stream("#!/bin/sh\n# Copyright 2019 Someone\necho\n", Some("#!/bin/sh\n"));
    assert_eq!(status, StreamStatus::HeaderFound);
  }

  #[test]
  fn test_stream_late_marker_is_copied() {
    let mut input = String::new();
    for i in 0..25 {
      input.push_str(&format!("line {i}\n"));
    }
    input.push_str("# Copyright later\n");
    let (status, out) = stream(&input, None);
    assert_eq!(status, StreamStatus::Complete);
    assert!(out.ends_with("# Copyright later\n"));
  }

  #[test]
  fn test_stream_invalid_utf8() {
    let mut out = Vec::new();
    let input: &[u8] = b"ok\n\xff\xfe\n";
    let status = FileRewriter::stream_with_header(
      &mut Cursor::new(input),
      &mut out,
      None,
      HEADER,
      &MarkerGuard::default(),
    )
    .unwrap();
    assert_eq!(status, StreamStatus::NotText);
  }

  #[test]
  fn test_rewrite_in_place() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("a.py");
    fs::write(&path, "x = 1\n").unwrap();

    let reader = BufReader::new(fs::File::open(&path).unwrap());
    let outcome = FileRewriter::rewrite_in_place(&path, reader, None, HEADER, &MarkerGuard::default()).unwrap();
    assert_eq!(outcome, RewriteOutcome::Rewritten);
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Copyright (c) 2025 Test\n\nx = 1\n");

    // Only the rewritten file remains in the directory.
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
  }

  #[test]
  fn test_rewrite_header_found_leaves_file_and_no_temp() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("a.py");
    fs::write(&path, "# Copyright 2000\nx = 1\n").unwrap();

    let reader = BufReader::new(fs::File::open(&path).unwrap());
    let outcome = FileRewriter::rewrite_in_place(&path, reader, None, HEADER, &MarkerGuard::default()).unwrap();
    assert_eq!(outcome, RewriteOutcome::HeaderFound);
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Copyright 2000\nx = 1\n");
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
  }

  #[test]
  fn test_rewrite_read_only_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("locked.py");
    fs::write(&path, "x = 1\n").unwrap();
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&path, permissions).unwrap();

    let reader = BufReader::new(fs::File::open(&path).unwrap());
    let outcome = FileRewriter::rewrite_in_place(&path, reader, None, HEADER, &MarkerGuard::default()).unwrap();
    assert!(matches!(outcome, RewriteOutcome::WriteFailed(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), "x = 1\n");
    assert!(fs::metadata(&path).unwrap().permissions().readonly());
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
  }

  #[cfg(unix)]
  #[test]
  fn test_rewrite_keeps_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("run.sh");
    fs::write(&path, "#!/bin/sh\necho\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    let reader = BufReader::new(fs::File::open(&path).unwrap());
    let outcome =
      FileRewriter::rewrite_in_place(&path, reader, Some("#!/bin/sh\n"), HEADER, &MarkerGuard::default()).unwrap();
    assert_eq!(outcome, RewriteOutcome::Rewritten);
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o755);
  }

  #[cfg(unix)]
  #[test]
  fn test_rewrite_through_symlink() {
    let temp_dir = tempdir().unwrap();
    let real = temp_dir.path().join("real.py");
    let link = temp_dir.path().join("link.py");
    fs::write(&real, "x = 1\n").unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let reader = BufReader::new(fs::File::open(&link).unwrap());
    let outcome = FileRewriter::rewrite_in_place(&link, reader, None, HEADER, &MarkerGuard::default()).unwrap();
    assert_eq!(outcome, RewriteOutcome::Rewritten);

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&link).unwrap(), real);
    assert_eq!(fs::read_to_string(&real).unwrap(), "# Copyright (c) 2025 Test\n\nx = 1\n");
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
  }
}
