//! PDF print options.
//!
//! [`PdfOptions`] is the renderer's own description of how a page is
//! printed. The Chrome binding translates it into
//! `headless_chrome::types::PrintToPdfOptions`; other collaborators (such as
//! the mock factory) are free to ignore it.
//!
//! # Example
//!
//! ```rust
//! use html2pdf_renderer::{PaperFormat, PdfOptions};
//!
//! let options = PdfOptions::default()
//!     .format(PaperFormat::Letter)
//!     .landscape(true)
//!     .margins(0.5);
//!
//! assert_eq!(options.paper_size(), (11.0, 8.5));
//! ```

use std::fmt;
use std::str::FromStr;

/// Smallest rendering scale Chrome accepts.
pub const MIN_SCALE: f64 = 0.1;

/// Largest rendering scale Chrome accepts.
pub const MAX_SCALE: f64 = 2.0;

/// Paper sizes, with dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PaperFormat {
    /// 8.5in x 11in
    Letter,
    /// 8.5in x 14in
    Legal,
    /// 11in x 17in
    Tabloid,
    /// 17in x 11in
    Ledger,
    /// 33.1in x 46.8in
    A0,
    /// 23.4in x 33.1in
    A1,
    /// 16.54in x 23.4in
    A2,
    /// 11.7in x 16.54in
    A3,
    /// 8.27in x 11.7in
    #[default]
    A4,
    /// 5.83in x 8.27in
    A5,
    /// 4.13in x 5.83in
    A6,
    /// Arbitrary size in inches.
    Custom {
        /// Width in inches.
        width: f64,
        /// Height in inches.
        height: f64,
    },
}

impl PaperFormat {
    /// `(width, height)` in inches, portrait orientation.
    pub fn dimensions(&self) -> (f64, f64) {
        match *self {
            PaperFormat::Letter => (8.5, 11.0),
            PaperFormat::Legal => (8.5, 14.0),
            PaperFormat::Tabloid => (11.0, 17.0),
            PaperFormat::Ledger => (17.0, 11.0),
            PaperFormat::A0 => (33.1, 46.8),
            PaperFormat::A1 => (23.4, 33.1),
            PaperFormat::A2 => (16.54, 23.4),
            PaperFormat::A3 => (11.7, 16.54),
            PaperFormat::A4 => (8.27, 11.7),
            PaperFormat::A5 => (5.83, 8.27),
            PaperFormat::A6 => (4.13, 5.83),
            PaperFormat::Custom { width, height } => (width, height),
        }
    }
}

impl fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperFormat::Custom { width, height } => write!(f, "{}x{}in", width, height),
            other => write!(f, "{:?}", other),
        }
    }
}

impl FromStr for PaperFormat {
    type Err = String;

    /// Parse a named format, case-insensitively (`"a4"`, `"Letter"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().to_ascii_lowercase().as_str() {
            "letter" => PaperFormat::Letter,
            "legal" => PaperFormat::Legal,
            "tabloid" => PaperFormat::Tabloid,
            "ledger" => PaperFormat::Ledger,
            "a0" => PaperFormat::A0,
            "a1" => PaperFormat::A1,
            "a2" => PaperFormat::A2,
            "a3" => PaperFormat::A3,
            "a4" => PaperFormat::A4,
            "a5" => PaperFormat::A5,
            "a6" => PaperFormat::A6,
            other => return Err(format!("unknown paper format: {}", other)),
        };
        Ok(format)
    }
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
    /// Right margin.
    pub right: f64,
}

impl Margins {
    /// The same margin on every side.
    pub fn uniform(inches: f64) -> Self {
        Self {
            top: inches,
            bottom: inches,
            left: inches,
            right: inches,
        }
    }
}

/// How a page is printed to PDF.
///
/// # Defaults
///
/// | Field | Default |
/// |-------|---------|
/// | `format` | [`PaperFormat::A4`] |
/// | `landscape` | `false` |
/// | `print_background` | `true` |
/// | `scale` | `None` (browser default, 1.0) |
/// | `margins` | `None` (browser default) |
/// | `page_ranges` | `None` (all pages) |
/// | `prefer_css_page_size` | `false` |
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    /// Paper size.
    pub format: PaperFormat,
    /// Rotate the paper to landscape.
    pub landscape: bool,
    /// Print background graphics and colors.
    pub print_background: bool,
    /// Rendering scale. Clamped to [`MIN_SCALE`]`..=`[`MAX_SCALE`] when
    /// printed; non-finite values fall back to the browser default.
    pub scale: Option<f64>,
    /// Page margins.
    pub margins: Option<Margins>,
    /// Page ranges such as `"1-5, 8"`.
    pub page_ranges: Option<String>,
    /// Let CSS `@page` size win over `format`.
    pub prefer_css_page_size: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            format: PaperFormat::A4,
            landscape: false,
            print_background: true,
            scale: None,
            margins: None,
            page_ranges: None,
            prefer_css_page_size: false,
        }
    }
}

impl PdfOptions {
    /// Set the paper format.
    pub fn format(mut self, format: PaperFormat) -> Self {
        self.format = format;
        self
    }

    /// Set landscape orientation.
    pub fn landscape(mut self, landscape: bool) -> Self {
        self.landscape = landscape;
        self
    }

    /// Include background graphics.
    pub fn print_background(mut self, print_background: bool) -> Self {
        self.print_background = print_background;
        self
    }

    /// Set the rendering scale, clamped to [`MIN_SCALE`]`..=`[`MAX_SCALE`].
    ///
    /// A non-finite `scale` clears it.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = clamp_scale(scale);
        self
    }

    /// The scale actually sent to the browser.
    ///
    /// `scale` is a public field, so out-of-range values set directly are
    /// clamped here as well.
    pub fn effective_scale(&self) -> Option<f64> {
        self.scale.and_then(clamp_scale)
    }

    /// Use the same margin (in inches) on every side.
    pub fn margins(mut self, inches: f64) -> Self {
        self.margins = Some(Margins::uniform(inches));
        self
    }

    /// Restrict output to the given page ranges.
    pub fn page_ranges(mut self, ranges: impl Into<String>) -> Self {
        self.page_ranges = Some(ranges.into());
        self
    }

    /// Paper `(width, height)` in inches after applying orientation.
    pub fn paper_size(&self) -> (f64, f64) {
        let (width, height) = self.format.dimensions();
        if self.landscape {
            (height, width)
        } else {
            (width, height)
        }
    }
}

fn clamp_scale(scale: f64) -> Option<f64> {
    if scale.is_finite() {
        Some(scale.clamp(MIN_SCALE, MAX_SCALE))
    } else {
        log::warn!("⚠️ Ignoring non-finite PDF scale: {}", scale);
        None
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
