#![allow(dead_code)]

use std::fs;
use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use tempfile::TempDir;

pub const GITCONFIG: &str = "[user]\n\tname = Test User\n\temail = test@example.com\n\torganization = Test Org\n";

/// A scratch home directory holding a `.gitconfig` with a complete identity,
/// plus a separate work directory for the files under test.
pub struct TestEnv {
  pub home: TempDir,
  pub work: TempDir,
}

impl TestEnv {
  pub fn new() -> Result<Self> {
    Self::with_gitconfig(GITCONFIG)
  }

  pub fn with_gitconfig(gitconfig: &str) -> Result<Self> {
    let home = tempfile::tempdir()?;
    fs::write(home.path().join(".gitconfig"), gitconfig)?;
    Ok(Self {
      home,
      work: tempfile::tempdir()?,
    })
  }

  /// Without any `.gitconfig` in the home directory.
  pub fn without_gitconfig() -> Result<Self> {
    Ok(Self {
      home: tempfile::tempdir()?,
      work: tempfile::tempdir()?,
    })
  }

  pub fn path(&self) -> &Path {
    self.work.path()
  }

  pub fn write(&self, relative: &str, content: &str) -> Result<()> {
    let path = self.work.path().join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
  }

  pub fn read(&self, relative: &str) -> Result<String> {
    Ok(fs::read_to_string(self.work.path().join(relative))?)
  }

  /// The binary, run from the work directory with a clean environment.
  pub fn command(&self) -> Command {
    let mut cmd = Command::cargo_bin("copyrightify").expect("binary should be built");
    cmd
      .current_dir(self.work.path())
      .env("HOME", self.home.path())
      .env_remove("COPYRIGHTIFY_CONFIG")
      .env_remove("RUST_LOG")
      .arg("--colors=never")
      .arg("--year=2025");
    cmd
  }
}
