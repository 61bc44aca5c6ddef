//! Shared helpers for integration tests.

#![allow(dead_code)]

use html2pdf_renderer::factory::mock::MockBrowserFactory;
use html2pdf_renderer::prelude::*;

/// Initialize logging once; safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A launch config pointing at a file that is guaranteed to exist.
///
/// The mock factory never executes it; it only has to pass the
/// existence check at construction.
pub fn existing_executable_config() -> LaunchConfig {
    let exe = std::env::current_exe().expect("test binary path");
    LaunchConfig::for_executable(exe)
}

/// Build a renderer backed by `factory`, sharing its counters with the caller.
pub fn renderer_with(factory: &MockBrowserFactory) -> HtmlRenderer {
    init_logging();
    HtmlRenderer::builder()
        .launch_config(existing_executable_config())
        .factory(Box::new(factory.clone()))
        .build()
        .expect("renderer should build")
}
