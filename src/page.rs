//! RAII handle for pages.
//!
//! This module provides [`PageHandle`], which wraps a [`RenderPage`] and
//! closes it when dropped, so a page never outlives the render call that
//! opened it, even if:
//! - content loading fails
//! - PDF printing fails
//! - a panic unwinds through the blocking task
//!
//! # Usage Pattern
//!
//! ```rust,ignore
//! let mut page = PageHandle::open(&*browser)?;
//! page.set_content("<h1>Hello</h1>")?;
//! let pdf = page.print_to_pdf(&PdfOptions::default())?;
//! // page closed here
//! ```

use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::traits::{RenderBrowser, RenderPage};

/// RAII handle for a page.
///
/// Closes the page when dropped. Close failures are logged and swallowed:
/// by then the PDF has either been captured or the render already failed
/// with a more useful error.
///
/// # Thread Safety
///
/// `PageHandle` is `Send` but not `Sync`, matching the exclusive ownership
/// of a page by one render call.
pub struct PageHandle {
    /// `Option` so it can be taken in `Drop`.
    page: Option<Box<dyn RenderPage>>,
}

impl PageHandle {
    /// Open a new page on `browser`.
    pub fn open(browser: &dyn RenderBrowser) -> Result<Self> {
        log::trace!("Creating new page");
        let page = browser.new_page().map_err(|e| {
            log::error!("❌ Failed to create page: {}", e);
            e
        })?;
        Ok(Self::new(page))
    }

    /// Take ownership of an already opened page.
    pub fn new(page: Box<dyn RenderPage>) -> Self {
        Self { page: Some(page) }
    }

    /// Close the page now and report the outcome.
    ///
    /// Dropping the handle afterwards is a no-op.
    pub fn close(mut self) -> Result<()> {
        match self.page.take() {
            Some(mut page) => page.close(),
            None => Ok(()),
        }
    }
}

impl Deref for PageHandle {
    type Target = dyn RenderPage;

    fn deref(&self) -> &Self::Target {
        // `page` is only `None` inside `close`/`drop`, which consume the handle.
        match &self.page {
            Some(page) => page.as_ref(),
            None => unreachable!("PageHandle used after close"),
        }
    }
}

impl DerefMut for PageHandle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.page {
            Some(page) => page.as_mut(),
            None => unreachable!("PageHandle used after close"),
        }
    }
}

impl Drop for PageHandle {
    fn drop(&mut self) {
        if let Some(mut page) = self.page.take() {
            log::trace!("Closing page");

            if let Err(e) = page.close() {
                log::warn!(
                    "Failed to close page (continuing anyway, browser will reclaim it): {}",
                    e
                );
            }
        }
    }
}

impl std::fmt::Debug for PageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHandle")
            .field("open", &self.page.is_some())
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::mock::MockBrowserFactory;
    use crate::{BrowserFactory, LaunchConfig, PdfOptions};

    #[test]
    fn test_page_closed_on_drop() {
        let factory = MockBrowserFactory::new();
        let browser = factory.create(&LaunchConfig::default()).unwrap();

        {
            let mut page = PageHandle::open(browser.as_ref()).unwrap();
            page.set_content("<p>hi</p>").unwrap();
            assert_eq!(factory.open_pages(), 1);
        }

        assert_eq!(factory.open_pages(), 0);
        assert_eq!(factory.pages_closed(), 1);
    }

    #[test]
    fn test_page_closed_on_error_path() {
        let factory = MockBrowserFactory::new();
        let browser = factory.create(&LaunchConfig::default()).unwrap();

        let result = (|| -> Result<Vec<u8>> {
            let mut page = PageHandle::open(browser.as_ref())?;
            page.set_content(crate::factory::mock::FAIL_RENDER_MARKER)?;
            page.print_to_pdf(&PdfOptions::default())
        })();

        assert!(result.is_err());
        assert_eq!(factory.open_pages(), 0);
    }

    #[test]
    fn test_explicit_close_is_not_repeated() {
        let factory = MockBrowserFactory::new();
        let browser = factory.create(&LaunchConfig::default()).unwrap();

        let page = PageHandle::open(browser.as_ref()).unwrap();
        assert!(format!("{:?}", page).contains("open: true"));
        page.close().unwrap();

        assert_eq!(factory.pages_closed(), 1);
    }
}
