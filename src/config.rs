//! Launch configuration for the headless browser.
//!
//! This module provides [`LaunchConfig`] and [`LaunchConfigBuilder`] for
//! describing how the browser process is started: which executable, whether
//! it runs headless, and which command-line arguments it receives.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use html2pdf_renderer::LaunchConfigBuilder;
//!
//! let config = LaunchConfigBuilder::new()
//!     .executable_path("/usr/bin/chromium")
//!     .arg("--disable-dev-shm-usage")
//!     .idle_timeout(Duration::from_secs(600))
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert!(config.headless);
//! assert_eq!(config.args.len(), 3);
//! ```
//!
//! # Bundled Browser
//!
//! A config without an executable path is replaced at construction time by
//! [`LaunchConfig::bundled()`], which points at the `chrome-headless-shell`
//! shipped next to the application (see [`crate::platform`]).
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, [`env::from_env`] reads the
//! configuration from environment variables and an optional `app.env` file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::platform::{self, Platform};

/// Arguments used for the bundled browser and by [`LaunchConfigBuilder`].
pub const DEFAULT_ARGS: &[&str] = &["--disable-gpu", "--no-sandbox"];

/// Default idle timeout of the DevTools connection (1 hour).
///
/// The handle is long-lived and may sit unused between renders, so this is
/// far above `headless_chrome`'s own 30 second default.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

/// How to start the external browser process.
///
/// Immutable once a renderer has been constructed with it.
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `executable_path` | `None` (bundled) | Browser binary |
/// | `headless` | `true` | Run without a window |
/// | `args` | `--disable-gpu`, `--no-sandbox` | Extra command-line arguments |
/// | `idle_timeout` | 1 hour | DevTools connection idle timeout |
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchConfig {
    /// Browser binary. `None` selects the bundled executable.
    pub executable_path: Option<PathBuf>,

    /// Run the browser headless.
    pub headless: bool,

    /// Extra command-line arguments passed to the browser.
    pub args: Vec<String>,

    /// How long the DevTools connection may stay idle before the
    /// collaborator gives up on it.
    pub idle_timeout: Duration,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            executable_path: None,
            headless: true,
            args: DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl LaunchConfig {
    /// Default configuration for the bundled browser of the current platform.
    ///
    /// # Errors
    ///
    /// - [`RendererError::UnsupportedPlatform`](crate::RendererError::UnsupportedPlatform)
    ///   if nothing is bundled for this OS/architecture.
    /// - [`RendererError::Configuration`](crate::RendererError::Configuration)
    ///   if the bundled file is missing.
    pub fn bundled() -> Result<Self> {
        Self::resolve_in(None, None, &Platform::current())
    }

    /// Default configuration pointing at `path`.
    pub fn for_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            executable_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// The executable path, if one is set and non-empty.
    pub fn usable_executable_path(&self) -> Option<&Path> {
        self.executable_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Turn an optional caller configuration into the one the renderer uses.
    ///
    /// - A config with a usable path is kept as-is once the file is verified.
    /// - Anything else is replaced by [`LaunchConfig::bundled()`].
    ///
    /// # Errors
    ///
    /// [`RendererError::Configuration`](crate::RendererError::Configuration)
    /// for missing executables,
    /// [`RendererError::UnsupportedPlatform`](crate::RendererError::UnsupportedPlatform)
    /// when no bundled browser exists.
    pub fn resolve(config: Option<LaunchConfig>) -> Result<LaunchConfig> {
        Self::resolve_in(config, None, &Platform::current())
    }

    /// Like [`resolve()`](Self::resolve), but looks for the bundled browser
    /// of `platform` under `bundle_root` instead of the running binary's
    /// directory and platform.
    ///
    /// `bundle_root` of `None` means [`platform::bundle_root()`].
    pub fn resolve_in(
        config: Option<LaunchConfig>,
        bundle_root: Option<&Path>,
        platform: &Platform,
    ) -> Result<LaunchConfig> {
        if let Some(config) = config {
            if let Some(path) = config.usable_executable_path() {
                log::debug!(" Using configured browser executable: {}", path.display());
                platform::check_executable_exists(path)?;
                return Ok(config);
            }
            log::debug!(" No executable path configured, using bundled browser");
        } else {
            log::debug!(" No launch configuration supplied, using bundled browser");
        }

        let base = match bundle_root {
            Some(base) => base.to_path_buf(),
            None => platform::bundle_root()?,
        };
        let executable = platform::bundled_executable_in(&base, platform)?;
        Ok(Self::for_executable(executable))
    }
}

/// Builder for [`LaunchConfig`] with validation.
///
/// # Validation
///
/// The [`build()`](Self::build) method validates:
/// - arguments are non-empty strings
/// - `idle_timeout` is greater than zero
pub struct LaunchConfigBuilder {
    config: LaunchConfig,
}

impl LaunchConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: LaunchConfig::default(),
        }
    }

    /// Set the browser executable.
    pub fn executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.executable_path = Some(path.into());
        self
    }

    /// Run headless (default) or with a window.
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.config.args.push(arg.into());
        self
    }

    /// Replace all arguments, including the defaults.
    ///
    /// ```rust
    /// use html2pdf_renderer::LaunchConfigBuilder;
    ///
    /// let config = LaunchConfigBuilder::new()
    ///     .args(["--headless=new"])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.args, vec!["--headless=new".to_string()]);
    /// ```
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the DevTools connection idle timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - Returns error if any argument is empty
    /// - Returns error if `idle_timeout` is zero
    pub fn build(self) -> std::result::Result<LaunchConfig, String> {
        if self.config.args.iter().any(|a| a.trim().is_empty()) {
            return Err("launch arguments must not be empty".to_string());
        }

        if self.config.idle_timeout.is_zero() {
            return Err("idle_timeout must be greater than 0".to_string());
        }

        Ok(self.config)
    }
}

impl Default for LaunchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// This module is only available when the `env-config` feature is enabled.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `CHROME_PATH` | String | bundled | Browser executable |
/// | `CHROME_HEADLESS` | bool | true | Headless mode |
/// | `CHROME_ARGS` | comma list | `--disable-gpu,--no-sandbox` | Launch arguments |
/// | `CHROME_IDLE_TIMEOUT_SECONDS` | u64 | 3600 | DevTools idle timeout |
/// | `PDF_PAPER_FORMAT` | String | A4 | Default paper format |
///
/// # Example `app.env` File
///
/// ```text
/// # CHROME_PATH=/usr/bin/chromium
/// CHROME_HEADLESS=true
/// CHROME_ARGS=--disable-gpu,--no-sandbox,--disable-dev-shm-usage
/// CHROME_IDLE_TIMEOUT_SECONDS=3600
/// PDF_PAPER_FORMAT=Letter
/// ```
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;
    use crate::error::RendererError;
    use crate::options::PaperFormat;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load environment variables from `app.env` file.
    pub fn load_env_file() -> std::result::Result<PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    /// Load the launch configuration from environment variables.
    ///
    /// Also loads `app.env` if present. When `CHROME_PATH` is unset the
    /// returned config has no executable path, which selects the bundled
    /// browser at construction time.
    ///
    /// # Errors
    ///
    /// Returns [`RendererError::Configuration`] if values fail validation.
    pub fn from_env() -> Result<LaunchConfig> {
        match load_env_file() {
            Ok(path) => {
                log::info!(" Loaded configuration from: {:?}", path);
            }
            Err(e) => {
                log::debug!(
                    " No {} file found or failed to load: {} (using environment variables and defaults)",
                    ENV_FILE_NAME,
                    e
                );
            }
        }

        let chrome_path = chrome_path_from_env();

        let headless = std::env::var("CHROME_HEADLESS")
            .ok()
            .and_then(|s| parse_bool(&s))
            .unwrap_or(true);

        let args = std::env::var("CHROME_ARGS").ok().map(|s| parse_args(&s));

        let idle_timeout_seconds = std::env::var("CHROME_IDLE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_IDLE_TIMEOUT.as_secs());

        log::info!(" Loading launch configuration from environment:");
        log::info!(
            "   - Chrome path: {}",
            chrome_path.as_deref().unwrap_or("bundled")
        );
        log::info!("   - Headless: {}", headless);
        log::info!("   - Idle timeout: {}s", idle_timeout_seconds);

        let mut builder = LaunchConfigBuilder::new()
            .headless(headless)
            .idle_timeout(Duration::from_secs(idle_timeout_seconds));

        if let Some(path) = chrome_path {
            builder = builder.executable_path(path);
        }
        if let Some(args) = args {
            log::info!("   - Args: {:?}", args);
            builder = builder.args(args);
        }

        builder.build().map_err(RendererError::Configuration)
    }

    /// Get the browser path from `CHROME_PATH`.
    pub fn chrome_path_from_env() -> Option<String> {
        std::env::var("CHROME_PATH").ok().filter(|s| !s.trim().is_empty())
    }

    /// Get the default paper format from `PDF_PAPER_FORMAT`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn paper_format_from_env() -> Option<PaperFormat> {
        let raw = std::env::var("PDF_PAPER_FORMAT").ok()?;
        match raw.parse() {
            Ok(format) => Some(format),
            Err(e) => {
                log::warn!("⚠️ Ignoring PDF_PAPER_FORMAT: {}", e);
                None
            }
        }
    }

    pub(crate) fn parse_bool(s: &str) -> Option<bool> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    pub(crate) fn parse_args(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_bool() {
            assert_eq!(parse_bool("TRUE"), Some(true));
            assert_eq!(parse_bool(" 0 "), Some(false));
            assert_eq!(parse_bool("off"), Some(false));
            assert_eq!(parse_bool("maybe"), None);
        }

        #[test]
        fn test_parse_args() {
            assert_eq!(
                parse_args("--disable-gpu, --no-sandbox,,"),
                vec!["--disable-gpu".to_string(), "--no-sandbox".to_string()]
            );
            assert!(parse_args("").is_empty());
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
