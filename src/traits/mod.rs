//! Traits for the external browser collaborator.
//!
//! The renderer never talks to Chrome directly. It owns a
//! [`RenderBrowser`] created by a [`BrowserFactory`](crate::BrowserFactory)
//! and asks it for short-lived [`RenderPage`]s. This keeps the lifecycle
//! logic testable without a browser installed and lets callers plug in a
//! different automation backend.
//!
//! # Implementing a Backend
//!
//! ```rust,ignore
//! use html2pdf_renderer::{PdfOptions, RenderBrowser, RenderPage, Result};
//!
//! struct MyBrowser { /* process handle */ }
//!
//! impl RenderBrowser for MyBrowser {
//!     fn new_page(&self) -> Result<Box<dyn RenderPage>> {
//!         // Open a tab/context
//!         todo!()
//!     }
//!
//!     fn close(&self) -> Result<()> {
//!         // Terminate the process
//!         Ok(())
//!     }
//! }
//! ```

mod browser;

pub use browser::{RenderBrowser, RenderPage};
