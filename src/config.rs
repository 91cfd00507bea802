//! Per-project settings read from `gobuild-menu.toml`.
//!
//! The file lives next to the Go module being built. Every field is
//! optional; a missing file means all defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::profile::default_release_flags;

/// Config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "gobuild-menu.toml";

/// Environment variable overriding the toolchain program.
pub const TOOLCHAIN_ENV_VAR: &str = "GOBUILD_MENU_TOOLCHAIN";

/// Program invoked when nothing else is configured.
pub const DEFAULT_TOOLCHAIN: &str = "go";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MenuConfig {
    /// Toolchain program to run (default `go`).
    pub toolchain: Option<String>,
    /// Arguments added to release builds (default `-ldflags "-w -s"`).
    pub release_flags: Option<Vec<String>>,
    /// Directory for built binaries, relative to the project directory.
    pub output_dir: Option<PathBuf>,
}

impl MenuConfig {
    pub fn config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE_NAME)
    }

    /// Load the project config. Returns defaults if the file does not exist.
    ///
    /// Parse errors and I/O errors other than not-found are hard failures.
    pub fn load(project_dir: &Path) -> Result<Self> {
        Self::load_from(&Self::config_path(project_dir))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse config file at {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read config file at {}", path.display()))
            }
        }
    }

    /// Resolve the toolchain program.
    ///
    /// Precedence (highest wins): `--toolchain` flag, `GOBUILD_MENU_TOOLCHAIN`,
    /// config file, `go`.
    pub fn resolve_toolchain(&self, cli_override: Option<&str>) -> String {
        self.resolve_toolchain_with_env(cli_override, std::env::var(TOOLCHAIN_ENV_VAR).ok())
    }

    fn resolve_toolchain_with_env(
        &self,
        cli_override: Option<&str>,
        env_value: Option<String>,
    ) -> String {
        non_empty_trimmed(cli_override.map(|s| s.to_string()))
            .or_else(|| non_empty_trimmed(env_value))
            .or_else(|| non_empty_trimmed(self.toolchain.clone()))
            .unwrap_or_else(|| DEFAULT_TOOLCHAIN.to_string())
    }

    /// Release flags, falling back to the default strip flags.
    ///
    /// An explicit empty list is honoured and makes release builds flagless.
    pub fn release_flags(&self) -> Vec<String> {
        self.release_flags
            .clone()
            .unwrap_or_else(default_release_flags)
    }
}

fn non_empty_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
