//! Environment variable management for testing
//!
//! Settings are read from the process environment, so tests that touch it
//! must restore whatever was there before. Tests using these guards should
//! not run concurrently with other tests reading the same variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Overrides a single environment variable and restores it on drop
pub struct EnvVarGuard {
  key: String,
  original: Option<String>,
}

impl EnvVarGuard {
  /// Capture the current value of `key` without changing it
  pub fn new(key: &str) -> Self {
    Self {
      key: key.to_string(),
      original: env::var(key).ok(),
    }
  }

  /// Set the variable for the lifetime of the guard
  pub fn set(&self, value: &str) {
    unsafe {
      env::set_var(&self.key, value);
    }
  }

  /// Remove the variable for the lifetime of the guard
  pub fn remove(&self) {
    unsafe {
      env::remove_var(&self.key);
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(val) => unsafe {
        env::set_var(&self.key, val);
      },
      None => unsafe {
        env::remove_var(&self.key);
      },
    }
  }
}

/// A `.env` file written into a per-test temporary directory
pub struct DotenvGuard {
  /// The temporary directory holding the file
  pub temp_dir: TempDir,
  path: PathBuf,
}

impl DotenvGuard {
  /// Write `content` to a fresh `.env` file
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join(".env");
    fs::write(&path, content).expect("Failed to write .env file");
    Self { temp_dir, path }
  }

  /// Path of the written file
  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_env_var_guard_restores_value() {
    let key = "GRAM_TEST_UTILS_RESTORE";
    unsafe {
      env::set_var(key, "before");
    }

    {
      let guard = EnvVarGuard::new(key);
      guard.set("during");
      assert_eq!(env::var(key).as_deref(), Ok("during"));
      guard.remove();
      assert!(env::var(key).is_err());
    }

    assert_eq!(env::var(key).as_deref(), Ok("before"));
    unsafe {
      env::remove_var(key);
    }
  }

  #[test]
  fn test_dotenv_guard_writes_file() {
    let guard = DotenvGuard::new("JIRA_URL=https://example.atlassian.net\n");
    let content = fs::read_to_string(guard.path()).unwrap();
    assert!(content.contains("JIRA_URL"));
  }
}
