//! Lazily launched browser with exactly-once teardown.
//!
//! This module provides [`HtmlRenderer`], the main entry point: it launches a
//! headless browser on first demand, shares it between all concurrent
//! callers, and releases it exactly once however disposal is reached.
//!
//! # Architecture
//!
//! ```text
//! HtmlRenderer
//!   └─ RendererInner (shared with blocking tasks)
//!       ├─ slot: Mutex<Option<Arc<dyn RenderBrowser>>>   (the one live browser)
//!       ├─ disposed: AtomicBool                         (monotonic)
//!       ├─ factory: Box<dyn BrowserFactory>
//!       └─ counters (launching / launches / discarded / released)
//! ```
//!
//! # Critical Invariants
//!
//! 1. **The slot mutex stands in for compare-and-set**: it is per renderer,
//!    and is held only for the load, the compare-and-set and the
//!    swap-to-empty themselves, never across I/O. Launching and closing
//!    happen outside it, on blocking tasks.
//! 2. **Install and dispose are mutually exclusive**: the winner's
//!    compare-and-set checks `disposed` in the same critical section in
//!    which disposal sets it and empties the slot. A browser can therefore
//!    never be installed after disposal.
//! 3. **Every launched browser is closed exactly once**: by the disposal
//!    call that swapped it out, or by the initializer that lost the race
//!    (to another initializer or to disposal).
//!
//! # Initialization Race
//!
//! ```text
//! caller A ──→ slot empty ──→ launch ──→ CAS(empty → A) ✓ ──→ returns A
//! caller B ──→ slot empty ──→ launch ──→ CAS fails       ──→ close B, returns A
//! caller C ──→ slot = A   ─────────────────────────────────→ returns A
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use html2pdf_renderer::HtmlRenderer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Uses the bundled chrome-headless-shell next to the executable
//!     let renderer = HtmlRenderer::new(None)?;
//!
//!     let pdf = renderer
//!         .render_pdf("<html><body><h1>Hello, PDF!</h1></body></html>", None)
//!         .await?;
//!     std::fs::write("hello.pdf", pdf)?;
//!
//!     renderer.dispose_async().await?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::LaunchConfig;
use crate::error::{RendererError, Result};
use crate::factory::{BrowserFactory, ChromeBrowserFactory};
use crate::options::PdfOptions;
use crate::page::PageHandle;
use crate::platform::Platform;
use crate::stats::{RendererState, RendererStats};
use crate::traits::RenderBrowser;

/// A browser shared by every caller of one renderer.
pub type SharedBrowser = Arc<dyn RenderBrowser>;

// ============================================================================
// RendererInner
// ============================================================================

/// Outcome of trying to install a freshly launched browser.
enum Install {
    /// The slot was empty; ours is now the shared browser.
    Won(SharedBrowser),
    /// Another initializer got there first; ours is redundant.
    Lost {
        current: SharedBrowser,
        redundant: SharedBrowser,
    },
    /// Disposal got there first; ours must not survive.
    Disposed(SharedBrowser),
}

/// Internal shared state.
///
/// Wrapped in `Arc` so blocking tasks can finish a launch (and clean up
/// after it) even if the caller that started it has gone away.
pub(crate) struct RendererInner {
    /// Launch configuration (immutable after construction).
    config: LaunchConfig,

    /// Options used when a render call passes `None`.
    default_pdf_options: PdfOptions,

    /// Launches browser processes.
    factory: Box<dyn BrowserFactory>,

    /// The single shared browser, or `None`. Locked only for an atomic
    /// load, compare-and-set or swap.
    slot: Mutex<Option<SharedBrowser>>,

    /// Set once, under the slot lock, by the first disposal.
    disposed: AtomicBool,

    /// Launches currently in flight.
    launching: AtomicUsize,

    launches: AtomicUsize,
    discarded: AtomicUsize,
    released: AtomicUsize,
}

/// Keeps `launching` accurate even if a launch panics.
struct LaunchGuard<'a>(&'a AtomicUsize);

impl<'a> LaunchGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LaunchGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RendererInner {
    fn new(
        config: LaunchConfig,
        factory: Box<dyn BrowserFactory>,
        default_pdf_options: PdfOptions,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            default_pdf_options,
            factory,
            slot: Mutex::new(None),
            disposed: AtomicBool::new(false),
            launching: AtomicUsize::new(0),
            launches: AtomicUsize::new(0),
            discarded: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        })
    }

    /// The slot holds either nothing or a complete `Arc`, so a poisoned
    /// lock cannot expose partial state.
    fn lock_slot(&self) -> MutexGuard<'_, Option<SharedBrowser>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current(&self) -> Option<SharedBrowser> {
        self.lock_slot().clone()
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Return the shared browser, launching it if necessary.
    async fn ensure_initialized(self: &Arc<Self>) -> Result<SharedBrowser> {
        if let Some(browser) = self.current() {
            return Ok(browser);
        }

        if self.is_disposed() {
            return Err(RendererError::AlreadyDisposed);
        }

        let inner = Arc::clone(self);
        tokio::task::spawn_blocking(move || inner.launch_and_install())
            .await
            .map_err(|e| {
                log::error!("❌ Browser launch task failed: {}", e);
                RendererError::ResourceCreation(format!("launch task failed: {}", e))
            })?
    }

    /// Launch a browser and race to install it. Runs on a blocking task.
    ///
    /// The whole race, including closing a redundant browser, happens here
    /// rather than in the awaiting future, so dropping that future cannot
    /// leak a process.
    fn launch_and_install(&self) -> Result<SharedBrowser> {
        let _launching = LaunchGuard::new(&self.launching);
        let start = Instant::now();

        log::debug!(" Launching browser...");
        let created: SharedBrowser = Arc::from(self.factory.create(&self.config).map_err(|e| {
            log::error!("❌ Browser launch failed: {}", e);
            e
        })?);
        self.launches.fetch_add(1, Ordering::SeqCst);

        match self.install(created) {
            Install::Won(browser) => {
                log::info!("✅ Browser initialized in {:?}", start.elapsed());
                Ok(browser)
            }
            Install::Lost { current, redundant } => {
                log::debug!("Lost initialization race, closing redundant browser");
                self.discard(redundant);
                Ok(current)
            }
            Install::Disposed(redundant) => {
                log::debug!("Renderer disposed during launch, closing new browser");
                self.discard(redundant);
                Err(RendererError::AlreadyDisposed)
            }
        }
    }

    /// Compare-and-set the slot from empty to `created`.
    fn install(&self, created: SharedBrowser) -> Install {
        let mut slot = self.lock_slot();

        if self.is_disposed() {
            return Install::Disposed(created);
        }

        match slot.as_ref() {
            Some(current) => Install::Lost {
                current: Arc::clone(current),
                redundant: created,
            },
            None => {
                *slot = Some(Arc::clone(&created));
                Install::Won(created)
            }
        }
    }

    /// Close a browser that never became (or stopped being) the shared one.
    ///
    /// Failures are logged: the caller already has its answer.
    fn discard(&self, redundant: SharedBrowser) {
        self.discarded.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = redundant.close() {
            log::warn!("⚠️ Failed to close redundant browser: {}", e);
        }
    }

    /// Mark disposed and empty the slot in one critical section.
    fn take_for_disposal(&self) -> Option<SharedBrowser> {
        let mut slot = self.lock_slot();
        self.disposed.store(true, Ordering::Release);
        slot.take()
    }

    fn release(&self, browser: SharedBrowser) -> Result<()> {
        self.released.fetch_add(1, Ordering::SeqCst);
        browser.close().map_err(|e| {
            log::error!("❌ Failed to close browser: {}", e);
            e
        })
    }

    fn dispose_sync(&self) -> Result<()> {
        match self.take_for_disposal() {
            Some(browser) => {
                log::info!("Disposing renderer, closing browser (sync)...");
                self.release(browser)
            }
            None => {
                log::debug!("Renderer already disposed or never initialized, nothing to close");
                Ok(())
            }
        }
    }

    async fn dispose_async(self: &Arc<Self>) -> Result<()> {
        let Some(browser) = self.take_for_disposal() else {
            log::debug!("Renderer already disposed or never initialized, nothing to close");
            return Ok(());
        };

        log::info!("Disposing renderer, closing browser (async)...");
        let inner = Arc::clone(self);
        tokio::task::spawn_blocking(move || inner.release(browser))
            .await
            .map_err(|e| {
                log::error!("❌ Browser close task failed: {}", e);
                RendererError::ResourceRelease(format!("close task failed: {}", e))
            })?
    }

    fn state(&self) -> RendererState {
        let slot = self.lock_slot();
        if self.is_disposed() {
            RendererState::Disposed
        } else if slot.is_some() {
            RendererState::Initialized
        } else if self.launching.load(Ordering::SeqCst) > 0 {
            RendererState::Initializing
        } else {
            RendererState::Uninitialized
        }
    }

    fn stats(&self) -> RendererStats {
        RendererStats {
            state: self.state(),
            launches: self.launches.load(Ordering::SeqCst),
            discarded: self.discarded.load(Ordering::SeqCst),
            released: self.released.load(Ordering::SeqCst),
        }
    }
}

/// Open a page, load `html` and print it. Runs on a blocking task.
///
/// The page is closed when this returns, whichever way it returns.
fn render_page(browser: &dyn RenderBrowser, html: &str, options: &PdfOptions) -> Result<Vec<u8>> {
    let start = Instant::now();

    let mut page = PageHandle::open(browser)?;
    page.set_content(html)?;

    log::trace!("Generating PDF ({})", options.format);
    let pdf = page.print_to_pdf(options)?;

    log::debug!(
        "PDF generated in {:?} ({} bytes input → {} bytes output)",
        start.elapsed(),
        html.len(),
        pdf.len()
    );
    Ok(pdf)
}

// ============================================================================
// HtmlRenderer
// ============================================================================

/// HTML to PDF renderer backed by one lazily launched browser.
///
/// # Thread Safety
///
/// `HtmlRenderer` is `Send + Sync`. Share it with `Arc` (see
/// [`into_shared()`](Self::into_shared)); every method takes `&self`.
///
/// # Disposal
///
/// Call [`dispose()`](Self::dispose) or [`dispose_async()`](Self::dispose_async)
/// when done. Both are idempotent and may be called from any thread, in any
/// combination; the browser is closed at most once. Dropping the renderer
/// runs the synchronous path as a fallback and never panics.
pub struct HtmlRenderer {
    inner: Arc<RendererInner>,
}

impl HtmlRenderer {
    /// Create a renderer that launches Chrome.
    ///
    /// - `Some(config)` with an executable path: the file must exist and the
    ///   config is used as-is.
    /// - `None`, or a config without a path: the bundled browser for this
    ///   platform is used with headless defaults.
    ///
    /// No browser is launched until the first render or
    /// [`initialize()`](Self::initialize).
    ///
    /// # Errors
    ///
    /// - [`RendererError::Configuration`] if the executable is missing.
    /// - [`RendererError::UnsupportedPlatform`] if no browser is bundled for
    ///   this OS/architecture and none was configured.
    pub fn new(config: Option<LaunchConfig>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(config) = config {
            builder = builder.launch_config(config);
        }
        builder.build()
    }

    /// Create a builder for custom factories and default PDF options.
    pub fn builder() -> HtmlRendererBuilder {
        HtmlRendererBuilder::new()
    }

    /// Convert into an `Arc` for sharing between tasks.
    pub fn into_shared(self) -> Arc<HtmlRenderer> {
        Arc::new(self)
    }

    /// Launch the browser now instead of on the first render.
    ///
    /// Idempotent: returns immediately once a browser is installed.
    ///
    /// # Errors
    ///
    /// - [`RendererError::ResourceCreation`] if the browser fails to launch
    ///   (a later call will try again).
    /// - [`RendererError::AlreadyDisposed`] after disposal.
    pub async fn initialize(&self) -> Result<()> {
        self.inner.ensure_initialized().await.map(|_| ())
    }

    /// Return the shared browser, launching it on first demand.
    ///
    /// Concurrent first calls may each launch a browser; exactly one is kept
    /// and returned to all of them, the rest are closed.
    pub async fn ensure_initialized(&self) -> Result<SharedBrowser> {
        self.inner.ensure_initialized().await
    }

    /// Render `html` to PDF bytes.
    ///
    /// `options` defaults to the renderer's default PDF options (A4 unless
    /// configured otherwise).
    ///
    /// # Errors
    ///
    /// - [`RendererError::Render`] if the page fails; the shared browser stays usable.
    /// - Any error from [`initialize()`](Self::initialize).
    pub async fn render_pdf(&self, html: &str, options: Option<PdfOptions>) -> Result<Vec<u8>> {
        let browser = self.inner.ensure_initialized().await?;
        let html = html.to_owned();
        let options = options.unwrap_or_else(|| self.inner.default_pdf_options.clone());

        tokio::task::spawn_blocking(move || render_page(browser.as_ref(), &html, &options))
            .await
            .map_err(|e| {
                log::error!("❌ Render task failed: {}", e);
                RendererError::Render(format!("render task failed: {}", e))
            })?
    }

    /// Render `html` to PDF and write it to `writer`.
    ///
    /// Produces the same bytes as [`render_pdf()`](Self::render_pdf).
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// As [`render_pdf()`](Self::render_pdf), plus [`RendererError::Io`] if
    /// writing fails.
    pub async fn render_pdf_to<W>(
        &self,
        html: &str,
        writer: &mut W,
        options: Option<PdfOptions>,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let pdf = self.render_pdf(html, options).await?;
        writer.write_all(&pdf).await?;
        writer.flush().await?;
        Ok(pdf.len() as u64)
    }

    /// Dispose synchronously, closing the browser if one is installed.
    ///
    /// # Errors
    ///
    /// [`RendererError::ResourceRelease`] if closing fails. Only the call
    /// that performed the close sees it; later calls return `Ok(())`.
    pub fn dispose(&self) -> Result<()> {
        self.inner.dispose_sync()
    }

    /// Dispose, closing the browser on a blocking task.
    ///
    /// Same guarantees as [`dispose()`](Self::dispose).
    pub async fn dispose_async(&self) -> Result<()> {
        self.inner.dispose_async().await
    }

    /// Whether disposal has started.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RendererState {
        self.inner.state()
    }

    /// Snapshot of lifecycle state and counters.
    pub fn stats(&self) -> RendererStats {
        self.inner.stats()
    }

    /// The launch configuration in use.
    pub fn launch_config(&self) -> &LaunchConfig {
        &self.inner.config
    }

    /// Options applied when a render call passes `None`.
    pub fn default_pdf_options(&self) -> &PdfOptions {
        &self.inner.default_pdf_options
    }
}

impl Drop for HtmlRenderer {
    /// Fallback disposal if none of the explicit paths ran.
    fn drop(&mut self) {
        if self.inner.is_disposed() {
            log::debug!(" Renderer already disposed, Drop is no-op");
            return;
        }

        log::warn!("HtmlRenderer dropped without explicit dispose - cleaning up");
        if let Err(e) = self.inner.dispose_sync() {
            log::warn!("⚠️ Cleanup on drop failed: {}", e);
        }
    }
}

impl std::fmt::Debug for HtmlRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlRenderer")
            .field("state", &self.state())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// HtmlRendererBuilder
// ============================================================================

/// Builder for [`HtmlRenderer`].
///
/// # Example
///
/// ```rust,ignore
/// use html2pdf_renderer::{HtmlRenderer, LaunchConfigBuilder, PaperFormat, PdfOptions};
///
/// let renderer = HtmlRenderer::builder()
///     .launch_config(
///         LaunchConfigBuilder::new()
///             .executable_path("/usr/bin/chromium")
///             .build()?
///     )
///     .default_pdf_options(PdfOptions::default().format(PaperFormat::Letter))
///     .build()?;
/// ```
pub struct HtmlRendererBuilder {
    /// `None` selects the bundled browser.
    config: Option<LaunchConfig>,

    /// Defaults to [`ChromeBrowserFactory`].
    factory: Option<Box<dyn BrowserFactory>>,

    pdf_options: Option<PdfOptions>,

    /// Bundled browser lookup; defaults to the running platform.
    platform: Option<Platform>,

    /// Directory holding `runtimes-cache/`; defaults to the executable's directory.
    bundle_root: Option<PathBuf>,
}

impl HtmlRendererBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            config: None,
            factory: None,
            pdf_options: None,
            platform: None,
            bundle_root: None,
        }
    }

    /// Set the launch configuration.
    pub fn launch_config(mut self, config: LaunchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the browser factory.
    pub fn factory(mut self, factory: Box<dyn BrowserFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Set the PDF options used when a render call passes `None`.
    pub fn default_pdf_options(mut self, options: PdfOptions) -> Self {
        self.pdf_options = Some(options);
        self
    }

    /// Resolve the bundled browser for `platform` instead of the running one.
    ///
    /// Only consulted when the launch config has no executable path.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Look for `runtimes-cache/` under `root` instead of next to the executable.
    ///
    /// Only consulted when the launch config has no executable path.
    pub fn bundle_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.bundle_root = Some(root.into());
        self
    }

    /// Resolve and validate the configuration and build the renderer.
    ///
    /// # Errors
    ///
    /// See [`HtmlRenderer::new`].
    pub fn build(self) -> Result<HtmlRenderer> {
        let platform = self.platform.unwrap_or_else(Platform::current);
        let config = LaunchConfig::resolve_in(self.config, self.bundle_root.as_deref(), &platform)?;
        let factory = self.factory.unwrap_or_else(|| Box::new(ChromeBrowserFactory));
        let pdf_options = self.pdf_options.unwrap_or_default();

        log::debug!(" Building renderer with config: {:?}", config);

        Ok(HtmlRenderer {
            inner: RendererInner::new(config, factory, pdf_options),
        })
    }
}

impl Default for HtmlRendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Initialization (feature-gated)
// ============================================================================

/// Build a renderer from environment variables and launch its browser.
///
/// See [`config::env`](crate::config::env) for the variables read.
///
/// # Errors
///
/// - Configuration errors from the environment or executable resolution.
/// - [`RendererError::ResourceCreation`] if the browser fails to launch.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     env_logger::init();
///
///     let renderer = init_renderer().await?;
///     let pdf = renderer.render_pdf("<h1>Hi</h1>", None).await?;
///
///     renderer.dispose_async().await?;
///     Ok(())
/// }
/// ```
#[cfg(feature = "env-config")]
pub async fn init_renderer() -> Result<Arc<HtmlRenderer>> {
    use crate::config::env::{from_env, paper_format_from_env};

    log::info!("Initializing renderer from environment...");

    let config = from_env()?;

    let mut pdf_options = PdfOptions::default();
    if let Some(format) = paper_format_from_env() {
        log::info!("   - Paper format: {}", format);
        pdf_options.format = format;
    }

    let renderer = HtmlRenderer::builder()
        .launch_config(config)
        .default_pdf_options(pdf_options)
        .build()
        .map_err(|e| {
            log::error!("❌ Failed to create renderer: {}", e);
            e
        })?;

    renderer.initialize().await.map_err(|e| {
        log::error!("❌ Failed to launch browser: {}", e);
        e
    })?;

    log::info!("✅ Renderer ready");
    Ok(renderer.into_shared())
}

// ============================================================================
// Unit Tests
// ============================================================================
