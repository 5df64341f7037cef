//! # Identity Module
//!
//! This module reads the author identity (name, email and organization) that
//! headers are stamped with, from the user's global git configuration.

use std::path::{Path, PathBuf};

use git2::Config as GitConfig;
use tracing::debug;

/// Author identity substituted into header templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
  pub name: String,
  pub email: String,
  pub organization: String,
}

/// Values given on the command line that take precedence over git config.
#[derive(Debug, Clone, Default)]
pub struct IdentityOverrides {
  pub name: Option<String>,
  pub email: Option<String>,
  pub organization: Option<String>,
}

impl IdentityOverrides {
  const fn is_complete(&self) -> bool {
    self.name.is_some() && self.email.is_some() && self.organization.is_some()
  }
}

/// Error type for identity lookup.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
  /// A required `user.*` entry is not set.
  #[error("Please run `git config --global user.{key} '<{key}>'`")]
  MissingField { key: &'static str },

  /// The git configuration file exists but could not be parsed.
  #[error("Failed to read git configuration '{path}': {source}")]
  ReadError { path: PathBuf, source: git2::Error },
}

/// Returns `$HOME/.gitconfig`, if `HOME` is set.
pub fn default_git_config_path() -> Option<PathBuf> {
  std::env::var_os("HOME")
    .filter(|home| !home.is_empty())
    .map(|home| PathBuf::from(home).join(".gitconfig"))
}

/// Resolve the identity for this run.
///
/// Each field comes from `overrides` when present, and otherwise from the
/// `[user]` section of the git configuration at `git_config_path`. The
/// organization is read from `user.organization`, falling back to
/// `user.company`.
///
/// # Errors
///
/// Returns [`IdentityError::MissingField`] naming the first field that is
/// neither overridden nor set (a missing configuration file counts as every
/// field unset).
pub fn load_identity(
  git_config_path: Option<&Path>,
  overrides: IdentityOverrides,
) -> Result<Identity, IdentityError> {
  let git_config = if overrides.is_complete() {
    None
  } else {
    open_git_config(git_config_path)?
  };

  let lookup = |keys: &[&str]| -> Option<String> {
    let config = git_config.as_ref()?;
    keys
      .iter()
      .filter_map(|key| config.get_string(key).ok())
      .find(|value| !value.trim().is_empty())
  };

  let name = overrides
    .name
    .or_else(|| lookup(&["user.name"]))
    .ok_or(IdentityError::MissingField { key: "name" })?;
  let email = overrides
    .email
    .or_else(|| lookup(&["user.email"]))
    .ok_or(IdentityError::MissingField { key: "email" })?;
  let organization = overrides
    .organization
    .or_else(|| lookup(&["user.organization", "user.company"]))
    .ok_or(IdentityError::MissingField { key: "organization" })?;

  debug!("Using identity {} <{}> ({})", name, email, organization);

  Ok(Identity {
    name,
    email,
    organization,
  })
}

fn open_git_config(path: Option<&Path>) -> Result<Option<GitConfig>, IdentityError> {
  let Some(path) = path else {
    debug!("No git configuration path available");
    return Ok(None);
  };

  if !path.is_file() {
    debug!("Git configuration not found at {}", path.display());
    return Ok(None);
  }

  GitConfig::open(path)
    .map(Some)
    .map_err(|source| IdentityError::ReadError {
      path: path.to_path_buf(),
      source,
    })
}
