//! Chrome/Chromium binding via `headless_chrome`.
//!
//! This module provides [`ChromeBrowserFactory`], which turns a
//! [`LaunchConfig`] into `headless_chrome` launch options, and
//! [`ChromeBrowser`], the [`RenderBrowser`] wrapping the launched process.
//!
//! # Page Rendering
//!
//! Each page is a fresh tab. HTML is loaded through a percent-encoded
//! `data:text/html` URL and printed with `Page.printToPDF`.

use std::ffi::OsStr;
use std::sync::{Arc, PoisonError, RwLock};

use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};

use super::BrowserFactory;
use crate::config::LaunchConfig;
use crate::error::{RendererError, Result};
use crate::options::PdfOptions;
use crate::traits::{RenderBrowser, RenderPage};

/// Factory for launching Chrome/Chromium browser processes.
///
/// # Thread Safety
///
/// Stateless; `Send + Sync` and safe to share across threads.
///
/// # Example
///
/// ```rust,ignore
/// use html2pdf_renderer::{BrowserFactory, ChromeBrowserFactory, LaunchConfig};
///
/// let browser = ChromeBrowserFactory.create(&LaunchConfig::bundled()?)?;
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeBrowserFactory;

impl BrowserFactory for ChromeBrowserFactory {
    /// Launch Chrome with options derived from `config`.
    ///
    /// # Errors
    ///
    /// * Returns [`RendererError::Configuration`] if launch options cannot be built.
    /// * Returns [`RendererError::ResourceCreation`] if Chrome fails to launch.
    fn create(&self, config: &LaunchConfig) -> Result<Box<dyn RenderBrowser>> {
        log::trace!(" ChromeBrowserFactory::create() called");

        let options = create_chrome_options(config)?;

        log::debug!(" Launching Chrome browser...");
        let browser = Browser::new(options).map_err(|e| {
            log::error!("❌ Chrome launch failed: {}", e);
            RendererError::ResourceCreation(e.to_string())
        })?;

        log::info!("✅ Chrome browser launched");
        Ok(Box::new(ChromeBrowser::new(browser)))
    }
}

/// Create `headless_chrome` launch options from a [`LaunchConfig`].
///
/// The options borrow the argument strings from `config`.
///
/// Sandbox handling is left to the arguments: the bundled default carries
/// `--no-sandbox` explicitly, so `headless_chrome` is told not to add its own.
///
/// # Errors
///
/// Returns [`RendererError::Configuration`] if the options builder rejects
/// the configuration.
pub fn create_chrome_options(config: &LaunchConfig) -> Result<LaunchOptions<'_>> {
    match config.usable_executable_path() {
        Some(path) => log::debug!(" Creating Chrome options with path: {}", path.display()),
        None => log::debug!(" Creating Chrome options (auto-detect browser)"),
    }

    let mut builder = LaunchOptions::default_builder();

    if let Some(path) = config.usable_executable_path() {
        builder.path(Some(path.to_path_buf()));
    }

    builder
        .headless(config.headless)
        .sandbox(true)
        .idle_browser_timeout(config.idle_timeout)
        .args(config.args.iter().map(OsStr::new).collect())
        .build()
        .map_err(|e| {
            log::error!("❌ Failed to build Chrome launch options: {}", e);
            RendererError::Configuration(e.to_string())
        })
}

/// Translate [`PdfOptions`] into `headless_chrome` print options.
pub fn build_print_options(options: &PdfOptions) -> PrintToPdfOptions {
    let (paper_width, paper_height) = options.format.dimensions();
    let margins = options.margins;

    PrintToPdfOptions {
        landscape: Some(options.landscape),
        display_header_footer: Some(false),
        print_background: Some(options.print_background),
        scale: options.effective_scale(),
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        margin_top: margins.map(|m| m.top),
        margin_bottom: margins.map(|m| m.bottom),
        margin_left: margins.map(|m| m.left),
        margin_right: margins.map(|m| m.right),
        page_ranges: options.page_ranges.clone(),
        prefer_css_page_size: Some(options.prefer_css_page_size),
        ..Default::default()
    }
}

/// A launched Chrome process.
///
/// Closing drops the `headless_chrome::Browser`, which terminates the
/// process. Pages opened afterwards fail with [`RendererError::Render`].
pub struct ChromeBrowser {
    /// `None` once closed. Read-locked while opening tabs so pages can be
    /// created concurrently.
    browser: RwLock<Option<Browser>>,
}

impl ChromeBrowser {
    /// Wrap an already launched browser.
    pub fn new(browser: Browser) -> Self {
        Self {
            browser: RwLock::new(Some(browser)),
        }
    }
}

impl RenderBrowser for ChromeBrowser {
    fn new_page(&self) -> Result<Box<dyn RenderPage>> {
        let guard = self.browser.read().unwrap_or_else(PoisonError::into_inner);
        let browser = guard
            .as_ref()
            .ok_or_else(|| RendererError::Render("browser has been closed".to_string()))?;

        let tab = browser.new_tab().map_err(|e| {
            log::error!("❌ Failed to create tab: {}", e);
            RendererError::Render(e.to_string())
        })?;

        Ok(Box::new(ChromePage { tab }))
    }

    fn close(&self) -> Result<()> {
        let taken = self
            .browser
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(browser) = taken {
            log::debug!(" Closing Chrome browser process");
            drop(browser);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChromeBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open = self
            .browser
            .read()
            .map(|b| b.is_some())
            .unwrap_or(false);
        f.debug_struct("ChromeBrowser").field("open", &open).finish()
    }
}

/// A Chrome tab used for one rendering.
struct ChromePage {
    tab: Arc<Tab>,
}

impl RenderPage for ChromePage {
    fn set_content(&mut self, html: &str) -> Result<()> {
        let data_url = format!("data:text/html;charset=utf-8,{}", urlencoding::encode(html));
        log::trace!("Data URL length: {} bytes", data_url.len());

        self.tab
            .navigate_to(&data_url)
            .map_err(|e| {
                log::error!("❌ Failed to load content: {}", e);
                RendererError::Render(e.to_string())
            })?
            .wait_until_navigated()
            .map_err(|e| {
                log::error!("❌ Content load timeout: {}", e);
                RendererError::Render(e.to_string())
            })?;

        Ok(())
    }

    fn print_to_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>> {
        self.tab
            .print_to_pdf(Some(build_print_options(options)))
            .map_err(|e| {
                log::error!("❌ Failed to generate PDF: {}", e);
                RendererError::Render(e.to_string())
            })
    }

    fn close(&mut self) -> Result<()> {
        self.tab
            .close(true)
            .map(|_| ())
            .map_err(|e| RendererError::Render(e.to_string()))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LaunchConfigBuilder;
    use crate::options::{Margins, PaperFormat};

    /// Verifies that Chrome launch options can be built.
    ///
    /// This checks the configuration is accepted, but doesn't launch Chrome.
    #[test]
    fn test_create_chrome_options() {
        let defaults = LaunchConfig::default();
        let result = create_chrome_options(&defaults);
        assert!(
            result.is_ok(),
            "Auto-detect Chrome options should build successfully: {:?}",
            result.err()
        );

        let config = LaunchConfigBuilder::new()
            .executable_path("/custom/chrome/path")
            .headless(false)
            .build()
            .unwrap();
        let options = create_chrome_options(&config).unwrap();
        assert_eq!(
            options.path.as_deref(),
            Some(std::path::Path::new("/custom/chrome/path"))
        );
        assert!(!options.headless);
        assert_eq!(options.args.len(), 2);
    }

    #[test]
    fn test_build_print_options_defaults() {
        let print = build_print_options(&PdfOptions::default());

        assert_eq!(print.landscape, Some(false));
        assert_eq!(print.print_background, Some(true));
        assert_eq!(print.display_header_footer, Some(false));
        assert_eq!(print.paper_width, Some(8.27));
        assert_eq!(print.paper_height, Some(11.7));
        assert_eq!(print.margin_top, None);
        assert_eq!(print.scale, None);
    }

    /// Paper dimensions are passed in portrait order; Chrome applies
    /// `landscape` itself.
    #[test]
    fn test_build_print_options_landscape_letter() {
        let options = PdfOptions {
            format: PaperFormat::Letter,
            landscape: true,
            margins: Some(Margins::uniform(0.5)),
            page_ranges: Some("1-3".to_string()),
            ..Default::default()
        };
        let print = build_print_options(&options);

        assert_eq!(print.landscape, Some(true));
        assert_eq!(print.paper_width, Some(8.5));
        assert_eq!(print.paper_height, Some(11.0));
        assert_eq!(print.margin_left, Some(0.5));
        assert_eq!(print.margin_bottom, Some(0.5));
        assert_eq!(print.page_ranges.as_deref(), Some("1-3"));
    }

    #[test]
    fn test_build_print_options_clamps_scale() {
        let options = PdfOptions {
            scale: Some(3.5),
            ..Default::default()
        };
        assert_eq!(build_print_options(&options).scale, Some(2.0));
    }
}
