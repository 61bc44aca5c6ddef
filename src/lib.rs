//! # html2pdf-renderer
//!
//! Lazily launched headless Chrome for converting HTML strings to PDF.
//!
//! This crate wraps one headless Chrome/Chromium process behind a handle that
//! launches it on first demand, shares it between all concurrent callers, and
//! closes it exactly once, whether disposal happens synchronously,
//! asynchronously, or on drop.
//!
//! ## Features
//!
//! - **Lazy Launch**: No browser process until the first render (or an explicit `initialize`)
//! - **Race-Free Initialization**: Concurrent first callers all get the same browser;
//!   redundant launches are closed immediately
//! - **Exactly-Once Disposal**: Sync, async and `Drop` paths may overlap freely;
//!   the browser is closed at most once and never resurrected
//! - **Bundled Browser**: Resolves a platform-specific `chrome-headless-shell`
//!   shipped next to your executable
//! - **Streaming Output**: Write PDFs straight into any `AsyncWrite`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Your Application               │
//! └─────────────────┬───────────────────────────┘
//!                   │ render_pdf / render_pdf_to
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │               HtmlRenderer                  │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │   Slot: Option<Arc<dyn RenderBrowser>>  │ │
//! │ │   (compare-and-set on first launch)     │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │   Disposed flag (monotonic)             │ │
//! │ └─────────────────────────────────────────┘ │
//! └─────────────────┬───────────────────────────┘
//!                   │ BrowserFactory
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │       Headless Chrome (one process)         │
//! │     (managed by headless_chrome crate)      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use html2pdf_renderer::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let renderer = HtmlRenderer::new(Some(
//!         LaunchConfigBuilder::new()
//!             .executable_path("/usr/bin/chromium")
//!             .build()?,
//!     ))?;
//!
//!     let pdf = renderer
//!         .render_pdf(
//!             "<html><body><h1>Hello, PDF!</h1></body></html>",
//!             Some(PdfOptions::default().format(PaperFormat::Letter)),
//!         )
//!         .await?;
//!     assert!(pdf.starts_with(b"%PDF-"));
//!
//!     // Stream into a file instead
//!     let mut file = tokio::fs::File::create("hello.pdf").await?;
//!     renderer.render_pdf_to("<h1>Hello</h1>", &mut file, None).await?;
//!
//!     renderer.dispose_async().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Configuration
//!
//! When the `env-config` feature is enabled (default), a renderer can be built
//! from environment variables (loaded from an `app.env` file or the system
//! environment):
//!
//! ```rust,no_run
//! use html2pdf_renderer::init_renderer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let renderer = init_renderer().await?;
//!     // renderer is Arc<HtmlRenderer>, browser already launched
//!     renderer.dispose_async().await?;
//!     Ok(())
//! }
//! ```
//!
//! ### Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `CHROME_PATH` | String | bundled | Browser executable |
//! | `CHROME_HEADLESS` | bool | true | Run without a window |
//! | `CHROME_ARGS` | comma list | `--disable-gpu,--no-sandbox` | Extra launch arguments |
//! | `CHROME_IDLE_TIMEOUT_SECONDS` | u64 | 3600 | Idle time before the DevTools connection drops |
//! | `PDF_PAPER_FORMAT` | String | A4 | Default paper format |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `env-config` | Enable environment-based configuration (default) |
//! | `test-utils` | Enable mock factory for testing |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, RendererError>`](Result):
//!
//! ```rust,ignore
//! use html2pdf_renderer::RendererError;
//!
//! match renderer.render_pdf(html, None).await {
//!     Ok(pdf) => { /* use pdf */ }
//!     Err(RendererError::AlreadyDisposed) => {
//!         // Renderer was torn down, handle gracefully
//!     }
//!     Err(RendererError::ResourceCreation(msg)) => {
//!         // Chrome failed to launch; the next call retries
//!         eprintln!("Browser launch failed: {}", msg);
//!     }
//!     Err(e) => eprintln!("Render error: {}", e),
//! }
//! ```
//!
//! ## Testing
//!
//! For testing without Chrome, enable the `test-utils` feature and use
//! [`MockBrowserFactory`](factory::mock::MockBrowserFactory):
//!
//! ```rust,ignore
//! use html2pdf_renderer::factory::mock::MockBrowserFactory;
//!
//! let factory = MockBrowserFactory::always_fails("Test error");
//! let renderer = HtmlRenderer::builder()
//!     .launch_config(LaunchConfig::for_executable(std::env::current_exe()?))
//!     .factory(Box::new(factory))
//!     .build()?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod error;
pub mod factory;
pub mod options;
pub mod page;
pub mod platform;
pub mod prelude;
pub mod renderer;
pub mod stats;
pub mod traits;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

// Core types
pub use config::{LaunchConfig, LaunchConfigBuilder};
pub use error::{RendererError, Result};
pub use factory::{BrowserFactory, ChromeBrowserFactory, create_chrome_options};
pub use options::{Margins, PaperFormat, PdfOptions};
pub use page::PageHandle;
pub use platform::Platform;
pub use renderer::{HtmlRenderer, HtmlRendererBuilder, SharedBrowser};
pub use stats::{RendererState, RendererStats};
pub use traits::{RenderBrowser, RenderPage};

// Feature-gated re-exports
#[cfg(feature = "env-config")]
pub use config::env::{chrome_path_from_env, from_env};

#[cfg(feature = "env-config")]
pub use renderer::init_renderer;

// ============================================================================
// Convenience type aliases
// ============================================================================

/// Shared renderer type for long-lived services.
///
/// Every method takes `&self`, so no extra lock is needed.
///
/// # Example
///
/// ```rust,ignore
/// use html2pdf_renderer::SharedRenderer;
///
/// let renderer: SharedRenderer = html_renderer.into_shared();
/// ```
pub type SharedRenderer = std::sync::Arc<HtmlRenderer>;
