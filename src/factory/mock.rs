//! Mock browser factory for testing.
//!
//! This module provides an in-memory implementation of [`BrowserFactory`]
//! whose browsers and pages never touch a real process. Every launch, close
//! and page is counted so tests can verify the renderer's lifecycle
//! guarantees without Chrome installed.
//!
//! # Feature Flag
//!
//! This module is only available when:
//! - The `test-utils` feature is enabled, OR
//! - During testing (`#[cfg(test)]`)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use html2pdf_renderer::factory::mock::MockBrowserFactory;
//!
//! // Slow launches make initialization races likely
//! let factory = MockBrowserFactory::new().with_launch_delay(Duration::from_millis(50));
//!
//! // Factory that always fails
//! let factory = MockBrowserFactory::always_fails("Chrome not installed");
//!
//! // Factory that fails after N successful launches
//! let factory = MockBrowserFactory::fail_after_n(3, "Resource exhausted");
//!
//! // Factory whose first launch fails, then recovers
//! let factory = MockBrowserFactory::fail_first_n(1, "Transient failure");
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::BrowserFactory;
use crate::config::LaunchConfig;
use crate::error::{RendererError, Result};
use crate::options::PdfOptions;
use crate::traits::{RenderBrowser, RenderPage};

/// HTML containing this marker makes [`RenderPage::set_content`] fail.
pub const FAIL_RENDER_MARKER: &str = "<!-- mock:fail-render -->";

/// Counters shared by a factory, its browsers and their pages.
#[derive(Debug, Default)]
struct MockState {
    launch_attempts: AtomicUsize,
    launched: AtomicUsize,
    close_calls: AtomicUsize,
    closed: AtomicUsize,
    pages_opened: AtomicUsize,
    pages_closed: AtomicUsize,
}

/// Mock browser factory for testing without Chrome.
///
/// This factory can be configured to:
/// - Always succeed, optionally after a launch delay
/// - Always fail with a specific error
/// - Fail after N successful launches
/// - Fail the first N launches, then succeed
/// - Fail when closing browsers
///
/// # Thread Safety
///
/// This factory is `Send + Sync` and tracks state using atomic operations.
/// Clones share the same counters, so a clone kept by the test still sees
/// launches made through the copy moved into a renderer.
#[derive(Clone)]
pub struct MockBrowserFactory {
    /// Whether to fail on launch.
    should_fail: bool,

    /// Custom error message when failing.
    error_message: String,

    /// Optional: fail after this many successful launches.
    fail_after: Option<usize>,

    /// Optional: fail this many launches before succeeding.
    fail_first: Option<usize>,

    /// Blocking delay before each launch completes.
    launch_delay: Duration,

    /// Whether closing a browser reports an error.
    fail_close: bool,

    state: Arc<MockState>,
}

impl MockBrowserFactory {
    /// Create a mock factory whose launches always succeed.
    pub fn new() -> Self {
        Self {
            should_fail: false,
            error_message: String::new(),
            fail_after: None,
            fail_first: None,
            launch_delay: Duration::ZERO,
            fail_close: false,
            state: Arc::new(MockState::default()),
        }
    }

    /// Create a mock factory that always fails with the given message.
    pub fn always_fails<S: Into<String>>(message: S) -> Self {
        Self {
            should_fail: true,
            error_message: message.into(),
            ..Self::new()
        }
    }

    /// Create a mock factory that fails after N successful launches.
    pub fn fail_after_n<S: Into<String>>(n: usize, message: S) -> Self {
        Self {
            error_message: message.into(),
            fail_after: Some(n),
            ..Self::new()
        }
    }

    /// Create a mock factory whose first N launches fail.
    pub fn fail_first_n<S: Into<String>>(n: usize, message: S) -> Self {
        Self {
            error_message: message.into(),
            fail_first: Some(n),
            ..Self::new()
        }
    }

    /// Sleep for `delay` inside every launch.
    pub fn with_launch_delay(mut self, delay: Duration) -> Self {
        self.launch_delay = delay;
        self
    }

    /// Make [`RenderBrowser::close`] report an error (the browser is still
    /// counted as closed).
    pub fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Number of launch attempts, successful or not.
    pub fn creation_count(&self) -> usize {
        self.state.launch_attempts.load(Ordering::SeqCst)
    }

    /// Number of browsers successfully launched.
    pub fn launched(&self) -> usize {
        self.state.launched.load(Ordering::SeqCst)
    }

    /// Number of distinct browsers closed.
    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Number of `close()` calls, including repeated ones on the same browser.
    pub fn close_calls(&self) -> usize {
        self.state.close_calls.load(Ordering::SeqCst)
    }

    /// Browsers launched and not yet closed.
    pub fn live(&self) -> usize {
        self.launched() - self.closed()
    }

    /// Number of pages opened.
    pub fn pages_opened(&self) -> usize {
        self.state.pages_opened.load(Ordering::SeqCst)
    }

    /// Number of pages closed.
    pub fn pages_closed(&self) -> usize {
        self.state.pages_closed.load(Ordering::SeqCst)
    }

    /// Pages opened and not yet closed.
    pub fn open_pages(&self) -> usize {
        self.pages_opened() - self.pages_closed()
    }
}

impl Default for MockBrowserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserFactory for MockBrowserFactory {
    /// Launch a mock browser or return a mock error.
    ///
    /// # Errors
    ///
    /// Returns [`RendererError::ResourceCreation`] when configured to fail.
    fn create(&self, _config: &LaunchConfig) -> Result<Box<dyn RenderBrowser>> {
        let count = self.state.launch_attempts.fetch_add(1, Ordering::SeqCst);

        if !self.launch_delay.is_zero() {
            std::thread::sleep(self.launch_delay);
        }

        if self.should_fail {
            log::debug!("MockBrowserFactory: Returning configured failure");
            return Err(RendererError::ResourceCreation(self.error_message.clone()));
        }

        if let Some(fail_after) = self.fail_after {
            if count >= fail_after {
                log::debug!("MockBrowserFactory: Failing after {} launches", fail_after);
                return Err(RendererError::ResourceCreation(self.error_message.clone()));
            }
        }

        if let Some(fail_first) = self.fail_first {
            if count < fail_first {
                log::debug!("MockBrowserFactory: Failing launch attempt #{}", count + 1);
                return Err(RendererError::ResourceCreation(self.error_message.clone()));
            }
        }

        let id = self.state.launched.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("MockBrowserFactory: Launched mock browser #{}", id);

        Ok(Box::new(MockBrowser {
            id,
            closed: AtomicBool::new(false),
            fail_close: self.fail_close,
            state: Arc::clone(&self.state),
        }))
    }
}

impl std::fmt::Debug for MockBrowserFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBrowserFactory")
            .field("should_fail", &self.should_fail)
            .field("error_message", &self.error_message)
            .field("fail_after", &self.fail_after)
            .field("fail_first", &self.fail_first)
            .field("launch_delay", &self.launch_delay)
            .field("creation_count", &self.creation_count())
            .field("live", &self.live())
            .finish()
    }
}

/// An in-memory browser.
struct MockBrowser {
    id: usize,
    closed: AtomicBool,
    fail_close: bool,
    state: Arc<MockState>,
}

impl RenderBrowser for MockBrowser {
    fn new_page(&self) -> Result<Box<dyn RenderPage>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(RendererError::Render(format!(
                "mock browser #{} has been closed",
                self.id
            )));
        }

        self.state.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockPage {
            content: None,
            closed: false,
            state: Arc::clone(&self.state),
        }))
    }

    fn close(&self) -> Result<()> {
        self.state.close_calls.fetch_add(1, Ordering::SeqCst);

        if !self.closed.swap(true, Ordering::SeqCst) {
            self.state.closed.fetch_add(1, Ordering::SeqCst);
            log::debug!("MockBrowserFactory: Closed mock browser #{}", self.id);
        }

        if self.fail_close {
            return Err(RendererError::ResourceRelease(format!(
                "mock browser #{} failed to close",
                self.id
            )));
        }
        Ok(())
    }
}

/// An in-memory page producing a minimal PDF-like byte stream.
struct MockPage {
    content: Option<String>,
    closed: bool,
    state: Arc<MockState>,
}

impl RenderPage for MockPage {
    fn set_content(&mut self, html: &str) -> Result<()> {
        if html.contains(FAIL_RENDER_MARKER) {
            return Err(RendererError::Render("mock page crashed".to_string()));
        }
        self.content = Some(html.to_string());
        Ok(())
    }

    fn print_to_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>> {
        let content = self
            .content
            .as_deref()
            .ok_or_else(|| RendererError::Render("no content set".to_string()))?;

        let (width, height) = options.paper_size();
        let mut pdf = b"%PDF-1.7\n".to_vec();
        pdf.extend_from_slice(format!("% mock {}x{}in\n", width, height).as_bytes());
        pdf.extend_from_slice(content.as_bytes());
        pdf.extend_from_slice(b"\n%%EOF\n");
        Ok(pdf)
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.state.pages_closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
