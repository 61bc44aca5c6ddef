//! Error types for the renderer.
//!
//! This module provides [`RendererError`], a unified error type for all
//! renderer operations, and a convenient [`Result`] type alias.
//!
//! # Example
//!
//! ```rust
//! use html2pdf_renderer::{RendererError, Result};
//!
//! fn process_pdf() -> Result<Vec<u8>> {
//!     // Your logic here...
//!     Err(RendererError::Configuration("example error".to_string()))
//! }
//!
//! match process_pdf() {
//!     Ok(pdf) => println!("Generated {} bytes", pdf.len()),
//!     Err(RendererError::AlreadyDisposed) => println!("Renderer was disposed"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

/// Errors that can occur while configuring, initializing, using or
/// disposing an [`HtmlRenderer`](crate::HtmlRenderer).
///
/// # Example
///
/// ```rust
/// use html2pdf_renderer::RendererError;
///
/// fn handle_error(error: RendererError) {
///     match error {
///         RendererError::Configuration(msg) => eprintln!("Bad setup: {}", msg),
///         RendererError::UnsupportedPlatform { os, arch } => {
///             eprintln!("No bundled browser for {}/{}", os, arch)
///         }
///         RendererError::AlreadyDisposed => eprintln!("Renderer disposed"),
///         RendererError::Render(msg) => eprintln!("Page failed: {}", msg),
///         RendererError::ResourceCreation(msg) => eprintln!("Launch failed: {}", msg),
///         RendererError::ResourceRelease(msg) => eprintln!("Close failed: {}", msg),
///         RendererError::Io(e) => eprintln!("Output failed: {}", e),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// The browser executable is missing or the launch configuration is invalid.
    ///
    /// Raised at construction time; no renderer is produced.
    ///
    /// # Common Causes
    ///
    /// - Bundled `chrome-headless-shell` not deployed next to the executable
    /// - Explicit `executable_path` pointing at a file that does not exist
    /// - Empty launch arguments or a zero idle timeout
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No bundled browser exists for this OS/architecture and no explicit
    /// executable path was supplied.
    #[error("Unsupported platform: {os}/{arch} has no bundled browser executable")]
    UnsupportedPlatform {
        /// Operating system name as reported by `std::env::consts::OS`.
        os: String,
        /// CPU architecture as reported by `std::env::consts::ARCH`.
        arch: String,
    },

    /// Initialization or rendering was attempted after disposal.
    ///
    /// Never retried internally. Create a new renderer instead.
    #[error("Renderer has already been disposed")]
    AlreadyDisposed,

    /// A page-level failure while setting content or printing the PDF.
    ///
    /// The shared browser stays valid for subsequent calls.
    #[error("Failed to render PDF: {0}")]
    Render(String),

    /// The browser process could not be launched.
    ///
    /// The slot remains empty, so a later call will try again.
    #[error("Failed to launch browser: {0}")]
    ResourceCreation(String),

    /// The browser process could not be closed cleanly.
    ///
    /// Reported once, to the disposal call that performed the release.
    #[error("Failed to close browser: {0}")]
    ResourceRelease(String),

    /// Writing PDF output to a caller-supplied writer failed.
    #[error("Failed to write PDF output: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience conversion from [`String`] to [`RendererError::Configuration`].
///
/// Allows using the `?` operator on builder validation results.
///
/// ```rust
/// use html2pdf_renderer::RendererError;
///
/// let error: RendererError = "invalid configuration".to_string().into();
/// assert!(matches!(error, RendererError::Configuration(_)));
/// ```
impl From<String> for RendererError {
    fn from(msg: String) -> Self {
        RendererError::Configuration(msg)
    }
}

/// Convenience conversion from `&str` to [`RendererError::Configuration`].
impl From<&str> for RendererError {
    fn from(msg: &str) -> Self {
        RendererError::Configuration(msg.to_string())
    }
}

/// Result type alias using [`RendererError`].
pub type Result<T> = std::result::Result<T, RendererError>;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies error type conversions from String and &str.
    #[test]
    fn test_error_conversion() {
        let error: RendererError = "test error".into();
        match error {
            RendererError::Configuration(msg) => {
                assert_eq!(msg, "test error", "Error message should be preserved");
            }
            _ => panic!("Expected Configuration error variant"),
        }

        let error: RendererError = "another error".to_string().into();
        match error {
            RendererError::Configuration(msg) => {
                assert_eq!(msg, "another error", "Error message should be preserved");
            }
            _ => panic!("Expected Configuration error variant"),
        }
    }

    /// Verifies that error Display formatting works correctly.
    #[test]
    fn test_error_display() {
        let error = RendererError::ResourceCreation("chrome not found".to_string());
        assert_eq!(error.to_string(), "Failed to launch browser: chrome not found");

        let error = RendererError::Render("bad page".to_string());
        assert_eq!(error.to_string(), "Failed to render PDF: bad page");

        let error = RendererError::AlreadyDisposed;
        assert_eq!(error.to_string(), "Renderer has already been disposed");

        let error = RendererError::UnsupportedPlatform {
            os: "freebsd".to_string(),
            arch: "riscv64".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported platform: freebsd/riscv64 has no bundled browser executable"
        );

        let error = RendererError::Configuration("bad config".to_string());
        assert_eq!(error.to_string(), "Configuration error: bad config");
    }

    /// Verifies io::Error converts via `?`.
    #[test]
    fn test_io_error_conversion() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))?;
            Ok(())
        }

        assert!(matches!(fails(), Err(RendererError::Io(_))));
    }

    /// Verifies that RendererError is Send + Sync for thread safety.
    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
        assert_send_sync::<RendererError>();
    }
}
