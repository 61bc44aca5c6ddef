//! Browser and page capabilities consumed by the renderer.

use crate::error::Result;
use crate::options::PdfOptions;

/// A live external browser process.
///
/// One instance is shared by every caller of an
/// [`HtmlRenderer`](crate::HtmlRenderer) once initialized, so implementations
/// must be `Send + Sync`. All methods may block on process or socket I/O;
/// the renderer only calls them from blocking tasks.
pub trait RenderBrowser: Send + Sync {
    /// Open a new page (tab) for one rendering.
    ///
    /// # Errors
    ///
    /// Returns [`RendererError::Render`](crate::RendererError::Render) if the
    /// page cannot be created, including after [`close()`](Self::close).
    fn new_page(&self) -> Result<Box<dyn RenderPage>>;

    /// Terminate the browser process.
    ///
    /// The renderer calls this at most once per browser it created.
    /// Implementations should still treat repeated calls as no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`RendererError::ResourceRelease`](crate::RendererError::ResourceRelease)
    /// if the process could not be shut down cleanly.
    fn close(&self) -> Result<()>;
}

/// One document-rendering context, exclusively owned by a single render call.
///
/// Wrapped in a [`PageHandle`](crate::PageHandle), which calls
/// [`close()`](Self::close) when the render call finishes or fails.
pub trait RenderPage: Send {
    /// Replace the page document with `html` and wait for it to load.
    fn set_content(&mut self, html: &str) -> Result<()>;

    /// Print the current document to PDF bytes.
    fn print_to_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>>;

    /// Release the page.
    fn close(&mut self) -> Result<()>;
}
