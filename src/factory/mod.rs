//! Browser factory implementations.
//!
//! This module provides the [`BrowserFactory`] trait and implementations
//! for launching browser processes.
//!
//! # Overview
//!
//! The factory pattern abstracts browser launch, allowing:
//! - The real headless Chrome binding
//! - Custom automation backends
//! - Mock factories for testing
//!
//! # Available Factories
//!
//! | Factory | Description |
//! |---------|-------------|
//! | [`ChromeBrowserFactory`] | Launches Chrome/Chromium via `headless_chrome` |
//! | [`mock::MockBrowserFactory`] | In-memory browsers for tests (feature-gated) |
//!
//! # Custom Factory
//!
//! ```rust,ignore
//! use html2pdf_renderer::{BrowserFactory, LaunchConfig, RenderBrowser, Result};
//!
//! struct MyFactory;
//!
//! impl BrowserFactory for MyFactory {
//!     fn create(&self, config: &LaunchConfig) -> Result<Box<dyn RenderBrowser>> {
//!         // Launch your browser from `config`
//!         todo!()
//!     }
//! }
//! ```

mod chrome;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use chrome::{ChromeBrowser, ChromeBrowserFactory, build_print_options, create_chrome_options};

use crate::config::LaunchConfig;
use crate::error::Result;
use crate::traits::RenderBrowser;

/// Trait for launching browser processes.
///
/// # Thread Safety
///
/// Requires `Send + Sync`: the renderer calls [`create()`](Self::create)
/// from blocking tasks on arbitrary threads, possibly several at once while
/// callers race to initialize.
pub trait BrowserFactory: Send + Sync {
    /// Launch a new browser process described by `config`.
    ///
    /// Blocks until the browser is ready to open pages.
    ///
    /// # Errors
    ///
    /// Returns [`RendererError::ResourceCreation`](crate::RendererError::ResourceCreation)
    /// if the process cannot be started.
    fn create(&self, config: &LaunchConfig) -> Result<Box<dyn RenderBrowser>>;
}
