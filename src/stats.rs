//! Renderer statistics for monitoring and tests.
//!
//! This module provides [`RendererStats`], a snapshot of the renderer's
//! lifecycle state and launch/release counters.
//!
//! # Example
//!
//! ```rust,ignore
//! let stats = renderer.stats();
//! println!("{} ({} launches, {} discarded)", stats.state, stats.launches, stats.discarded);
//! ```

use std::fmt;

/// Lifecycle state of an [`HtmlRenderer`](crate::HtmlRenderer).
///
/// ```text
/// Uninitialized ──→ Initializing ──→ Initialized ──→ Disposed
///       │                │                              ▲
///       └────────────────┴──────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    /// No browser yet and no launch in flight.
    Uninitialized,
    /// At least one launch is in flight and the slot is still empty.
    Initializing,
    /// A browser is installed in the slot.
    Initialized,
    /// Disposed; no browser will ever be installed again.
    Disposed,
}

impl fmt::Display for RendererState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RendererState::Uninitialized => "uninitialized",
            RendererState::Initializing => "initializing",
            RendererState::Initialized => "initialized",
            RendererState::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// Snapshot of renderer statistics at a point in time.
///
/// Counters only grow. Values can change immediately after reading if
/// another task is initializing or disposing concurrently.
///
/// | Field | Description |
/// |-------|-------------|
/// | `state` | Current [`RendererState`] |
/// | `launches` | Browsers successfully launched |
/// | `discarded` | Launched browsers released because another caller won, or disposal won |
/// | `released` | Installed browsers released by disposal |
///
/// # Example
///
/// ```rust
/// use html2pdf_renderer::{RendererState, RendererStats};
///
/// let stats = RendererStats {
///     state: RendererState::Initialized,
///     launches: 3,
///     discarded: 2,
///     released: 0,
/// };
///
/// assert_eq!(stats.live(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererStats {
    /// Current lifecycle state.
    pub state: RendererState,

    /// Browsers successfully launched by the factory.
    pub launches: usize,

    /// Redundant browsers released by losing initializers.
    pub discarded: usize,

    /// Browsers released by `dispose`, `dispose_async` or `Drop`.
    pub released: usize,
}

impl RendererStats {
    /// Browsers launched and not (yet) released.
    ///
    /// Includes launches still racing to install; at quiescence this is 0 or 1.
    #[inline]
    pub fn live(&self) -> usize {
        self.launches
            .saturating_sub(self.discarded)
            .saturating_sub(self.released)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
