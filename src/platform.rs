//! Bundled browser lookup per OS/architecture.
//!
//! Deployments ship a `chrome-headless-shell` build under `runtimes-cache/`
//! next to the application binary. This module maps the running platform to
//! the expected relative path and verifies the file is actually there.
//!
//! | OS | Architecture | Relative path |
//! |----|--------------|---------------|
//! | Windows | x86_64 | `runtimes-cache/win-x64/native/chrome-headless-shell.exe` |
//! | Linux | x86_64 | `runtimes-cache/linux-x64/native/chrome-headless-shell` |
//! | macOS | aarch64 | `runtimes-cache/osx-arm64/native/chrome-headless-shell` |

use std::path::{Path, PathBuf};

use crate::error::{RendererError, Result};

/// `(os, arch, relative path)` for every platform with a bundled browser.
const BUNDLED_EXECUTABLES: &[(&str, &str, &str)] = &[
    (
        "windows",
        "x86_64",
        "runtimes-cache/win-x64/native/chrome-headless-shell.exe",
    ),
    (
        "linux",
        "x86_64",
        "runtimes-cache/linux-x64/native/chrome-headless-shell",
    ),
    (
        "macos",
        "aarch64",
        "runtimes-cache/osx-arm64/native/chrome-headless-shell",
    ),
];

/// An OS/architecture pair, as reported by [`std::env::consts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    os: String,
    arch: String,
}

impl Platform {
    /// Describe an arbitrary platform (useful for tests and cross-checks).
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this process is running on.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Operating system name.
    pub fn os(&self) -> &str {
        &self.os
    }

    /// CPU architecture name.
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Relative path of the bundled executable for this platform.
    ///
    /// # Errors
    ///
    /// Returns [`RendererError::UnsupportedPlatform`] when no browser is
    /// bundled for this OS/architecture.
    pub fn bundled_executable(&self) -> Result<&'static str> {
        BUNDLED_EXECUTABLES
            .iter()
            .find(|(os, arch, _)| *os == self.os && *arch == self.arch)
            .map(|(_, _, path)| *path)
            .ok_or_else(|| RendererError::UnsupportedPlatform {
                os: self.os.clone(),
                arch: self.arch.clone(),
            })
    }
}

/// Directory containing the running executable.
///
/// Bundled browsers are resolved relative to this directory.
pub fn bundle_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| {
        RendererError::Configuration(format!("Cannot locate current executable: {}", e))
    })?;

    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        RendererError::Configuration(format!(
            "Current executable has no parent directory: {}",
            exe.display()
        ))
    })
}

/// Resolve and verify the bundled executable under `base` for `platform`.
///
/// # Errors
///
/// - [`RendererError::UnsupportedPlatform`] if the platform has no entry.
/// - [`RendererError::Configuration`] if the file does not exist.
pub fn bundled_executable_in(base: &Path, platform: &Platform) -> Result<PathBuf> {
    let path = base.join(platform.bundled_executable()?);
    log::trace!(" Bundled browser for {}/{}: {}", platform.os, platform.arch, path.display());
    check_executable_exists(&path)?;
    Ok(path)
}

/// Fail with [`RendererError::Configuration`] unless `path` is an existing file.
pub fn check_executable_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        log::error!("❌ Missing chromium executable: {}", path.display());
        Err(RendererError::Configuration(format!(
            "Missing chromium executable: {}",
            path.display()
        )))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
