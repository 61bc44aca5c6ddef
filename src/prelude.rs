//! Convenient imports for common usage patterns.
//!
//! This module re-exports the most commonly used types from `html2pdf-renderer`,
//! allowing you to quickly get started with a single import.
//!
//! # Usage
//!
//! ```rust,ignore
//! use html2pdf_renderer::prelude::*;
//! ```
//!
//! This imports:
//!
//! - [`HtmlRenderer`] - Main renderer type
//! - [`HtmlRendererBuilder`] - Renderer builder
//! - [`LaunchConfig`] - Launch configuration
//! - [`LaunchConfigBuilder`] - Configuration builder
//! - [`PdfOptions`], [`PaperFormat`], [`Margins`] - Print options
//! - [`RendererError`] - Error type
//! - [`Result`] - Result type alias
//! - [`RendererState`], [`RendererStats`] - Lifecycle introspection
//! - [`BrowserFactory`] - Factory trait
//! - [`ChromeBrowserFactory`] - Chrome factory
//! - [`SharedRenderer`] - Type alias for a shared renderer
//!
//! # Example
//!
//! ```rust,no_run
//! use html2pdf_renderer::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let renderer: SharedRenderer = HtmlRenderer::new(None)?.into_shared();
//!
//!     let pdf = renderer
//!         .render_pdf("<h1>Invoice</h1>", Some(PdfOptions::default().landscape(true)))
//!         .await?;
//!     std::fs::write("invoice.pdf", pdf)?;
//!
//!     renderer.dispose_async().await?;
//!     Ok(())
//! }
//! ```

// Core types
pub use crate::SharedRenderer;
pub use crate::config::{LaunchConfig, LaunchConfigBuilder};
pub use crate::error::{RendererError, Result};
pub use crate::factory::{BrowserFactory, ChromeBrowserFactory};
pub use crate::options::{Margins, PaperFormat, PdfOptions};
pub use crate::renderer::{HtmlRenderer, HtmlRendererBuilder};
pub use crate::stats::{RendererState, RendererStats};

// Feature-gated exports
#[cfg(feature = "env-config")]
pub use crate::config::env::{chrome_path_from_env, from_env};

#[cfg(feature = "env-config")]
pub use crate::renderer::init_renderer;

// Re-export Arc for convenience (commonly needed with SharedRenderer)
pub use std::sync::Arc;
