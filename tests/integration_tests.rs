//! Integration tests for the HTML renderer.

mod common;

use common::{existing_executable_config, init_logging, renderer_with};
use html2pdf_renderer::factory::mock::{FAIL_RENDER_MARKER, MockBrowserFactory};
use html2pdf_renderer::platform::{Platform, bundled_executable_in};
use html2pdf_renderer::prelude::*;

const HELLO: &str = "<html><body><h1>Hello, PDF!</h1></body></html>";

/// Test that rendering produces PDF bytes and launches exactly one browser.
#[tokio::test]
async fn test_render_round_trip() {
    let factory = MockBrowserFactory::new();
    let renderer = renderer_with(&factory);

    let pdf = renderer.render_pdf(HELLO, None).await.unwrap();

    assert!(pdf.starts_with(b"%PDF-"), "Output should be a PDF");
    assert_eq!(factory.launched(), 1);
    assert_eq!(factory.open_pages(), 0, "Page should be closed after rendering");
    assert_eq!(renderer.state(), RendererState::Initialized);
}

/// Test that the stream variant writes the same bytes as the buffer variant.
#[tokio::test]
async fn test_stream_matches_buffer() {
    let factory = MockBrowserFactory::new();
    let renderer = renderer_with(&factory);
    let options = PdfOptions::default().format(PaperFormat::Letter);

    let buffered = renderer.render_pdf(HELLO, Some(options.clone())).await.unwrap();

    let mut sink: Vec<u8> = Vec::new();
    let written = renderer
        .render_pdf_to(HELLO, &mut sink, Some(options))
        .await
        .unwrap();

    assert_eq!(written, buffered.len() as u64);
    assert_eq!(sink, buffered);
    assert_eq!(factory.launched(), 1, "Both calls should share one browser");
}

/// Test that an explicit executable path must exist.
#[test]
fn test_missing_executable_rejected() {
    init_logging();
    let config = LaunchConfig::for_executable("/definitely/not/here/chrome-headless-shell");

    match HtmlRenderer::new(Some(config)) {
        Err(RendererError::Configuration(msg)) => {
            assert!(msg.contains("Missing chromium executable"), "{}", msg);
        }
        other => panic!("Expected Configuration error, got {:?}", other),
    }
}

/// Test that unknown OS/architecture pairs have no bundled browser.
#[test]
fn test_unsupported_platform() {
    let platform = Platform::new("freebsd", "riscv64");

    match bundled_executable_in(std::path::Path::new("."), &platform) {
        Err(RendererError::UnsupportedPlatform { os, arch }) => {
            assert_eq!(os, "freebsd");
            assert_eq!(arch, "riscv64");
        }
        other => panic!("Expected UnsupportedPlatform, got {:?}", other),
    }
}

/// Test that building without an executable on an unknown platform fails.
#[test]
fn test_construction_unsupported_platform() {
    init_logging();
    let result = HtmlRenderer::builder()
        .platform(Platform::new("freebsd", "riscv64"))
        .bundle_root(".")
        .factory(Box::new(MockBrowserFactory::new()))
        .build();

    match result {
        Err(RendererError::UnsupportedPlatform { os, arch }) => {
            assert_eq!(os, "freebsd");
            assert_eq!(arch, "riscv64");
        }
        other => panic!("Expected UnsupportedPlatform, got {:?}", other),
    }

    // A config without a path behaves like no config at all
    let result = HtmlRenderer::builder()
        .launch_config(LaunchConfig::default())
        .platform(Platform::new("freebsd", "riscv64"))
        .build();
    assert!(matches!(
        result,
        Err(RendererError::UnsupportedPlatform { .. })
    ));
}

/// Test that a supported platform with no bundle deployed fails to build.
#[test]
fn test_construction_missing_bundle() {
    init_logging();
    let root = std::env::temp_dir().join("html2pdf-renderer-no-bundle");
    let result = HtmlRenderer::builder()
        .platform(Platform::new("linux", "x86_64"))
        .bundle_root(&root)
        .build();

    match result {
        Err(RendererError::Configuration(msg)) => {
            assert!(msg.contains("Missing chromium executable"), "{}", msg);
            assert!(msg.contains("chrome-headless-shell"), "{}", msg);
        }
        other => panic!("Expected Configuration error, got {:?}", other),
    }
}

/// Test that a deployed bundle is picked up and used for rendering.
#[tokio::test]
async fn test_construction_uses_bundle() {
    init_logging();
    let root = std::env::temp_dir().join(format!("html2pdf-renderer-bundle-{}", std::process::id()));
    let platform = Platform::new("macos", "aarch64");
    let exe = root.join(platform.bundled_executable().unwrap());
    std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
    std::fs::write(&exe, b"").unwrap();

    let factory = MockBrowserFactory::new();
    let renderer = HtmlRenderer::builder()
        .platform(platform)
        .bundle_root(&root)
        .factory(Box::new(factory.clone()))
        .build()
        .unwrap();
    std::fs::remove_dir_all(&root).unwrap();

    assert_eq!(renderer.launch_config().executable_path, Some(exe));
    assert_eq!(renderer.launch_config().args, vec!["--disable-gpu", "--no-sandbox"]);
    assert!(renderer.render_pdf(HELLO, None).await.is_ok());
}

/// Test that construction never launches a browser.
#[tokio::test]
async fn test_construction_is_lazy() {
    let factory = MockBrowserFactory::new();
    let renderer = renderer_with(&factory);

    assert_eq!(factory.creation_count(), 0);
    assert_eq!(renderer.stats().launches, 0);
    assert_eq!(renderer.state(), RendererState::Uninitialized);

    renderer.dispose().unwrap();
    assert_eq!(factory.creation_count(), 0, "Disposing before use launches nothing");
}

/// Test that every operation fails after disposal.
#[tokio::test]
async fn test_operations_after_dispose() {
    let factory = MockBrowserFactory::new();
    let renderer = renderer_with(&factory);

    renderer.initialize().await.unwrap();
    renderer.dispose_async().await.unwrap();

    assert!(renderer.is_disposed());
    assert!(matches!(
        renderer.initialize().await,
        Err(RendererError::AlreadyDisposed)
    ));
    assert!(matches!(
        renderer.render_pdf(HELLO, None).await,
        Err(RendererError::AlreadyDisposed)
    ));

    let mut sink = Vec::new();
    assert!(matches!(
        renderer.render_pdf_to(HELLO, &mut sink, None).await,
        Err(RendererError::AlreadyDisposed)
    ));
    assert!(sink.is_empty());
    assert_eq!(factory.launched(), 1, "No browser is launched after disposal");
}

/// Test that sync, async and drop disposal together close the browser once.
#[tokio::test]
async fn test_dispose_idempotent() {
    let factory = MockBrowserFactory::new();
    let renderer = renderer_with(&factory);

    renderer.initialize().await.unwrap();

    renderer.dispose().unwrap();
    renderer.dispose_async().await.unwrap();
    renderer.dispose().unwrap();
    drop(renderer);

    assert_eq!(factory.close_calls(), 1, "Browser should be closed exactly once");
    assert_eq!(factory.live(), 0);
}

/// Test that dropping an initialized renderer closes its browser.
#[tokio::test]
async fn test_drop_disposes() {
    let factory = MockBrowserFactory::new();

    {
        let renderer = renderer_with(&factory);
        renderer.render_pdf(HELLO, None).await.unwrap();
    }

    assert_eq!(factory.close_calls(), 1);
    assert_eq!(factory.live(), 0);
}

/// Test that a failed launch is not cached.
#[tokio::test]
async fn test_launch_failure_not_cached() {
    let failing = MockBrowserFactory::always_fails("Chrome not installed");
    let renderer = renderer_with(&failing);

    match renderer.render_pdf(HELLO, None).await {
        Err(RendererError::ResourceCreation(msg)) => assert_eq!(msg, "Chrome not installed"),
        other => panic!("Expected ResourceCreation, got {:?}", other.map(|b| b.len())),
    }
    assert_eq!(renderer.state(), RendererState::Uninitialized);

    assert!(renderer.initialize().await.is_err());
    assert_eq!(failing.creation_count(), 2, "Each call should retry the launch");
    assert_eq!(failing.launched(), 0);
}

/// Test that a later call succeeds once launches recover.
#[tokio::test]
async fn test_launch_failure_then_retry() {
    let factory = MockBrowserFactory::fail_first_n(1, "Transient failure");
    let renderer = renderer_with(&factory);

    assert!(matches!(
        renderer.initialize().await,
        Err(RendererError::ResourceCreation(_))
    ));
    assert_eq!(renderer.state(), RendererState::Uninitialized);

    let pdf = renderer.render_pdf(HELLO, None).await.unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(factory.creation_count(), 2);
    assert_eq!(factory.launched(), 1);
    assert_eq!(renderer.state(), RendererState::Initialized);
}

/// Test that a page failure leaves the shared browser usable.
#[tokio::test]
async fn test_render_failure_keeps_browser() {
    let factory = MockBrowserFactory::new();
    let renderer = renderer_with(&factory);

    let html = format!("<html><body>{}</body></html>", FAIL_RENDER_MARKER);
    assert!(matches!(
        renderer.render_pdf(&html, None).await,
        Err(RendererError::Render(_))
    ));
    assert_eq!(factory.open_pages(), 0, "Failed page should still be closed");

    let pdf = renderer.render_pdf(HELLO, None).await.unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(factory.launched(), 1);
    assert_eq!(renderer.state(), RendererState::Initialized);
}

/// Test that a close failure is reported once, by the disposing call.
#[tokio::test]
async fn test_dispose_close_failure_reported_once() {
    let factory = MockBrowserFactory::new().with_failing_close();
    let renderer = renderer_with(&factory);

    renderer.initialize().await.unwrap();

    assert!(matches!(
        renderer.dispose(),
        Err(RendererError::ResourceRelease(_))
    ));
    assert!(renderer.dispose().is_ok());
    assert!(renderer.dispose_async().await.is_ok());

    assert_eq!(factory.close_calls(), 1);
    assert_eq!(renderer.state(), RendererState::Disposed);
}

/// Test that the default PDF options configured on the builder are used.
#[tokio::test]
async fn test_builder_default_pdf_options() {
    init_logging();
    let factory = MockBrowserFactory::new();
    let renderer = HtmlRenderer::builder()
        .launch_config(existing_executable_config())
        .factory(Box::new(factory.clone()))
        .default_pdf_options(PdfOptions::default().format(PaperFormat::Letter).landscape(true))
        .build()
        .unwrap();

    let pdf = renderer.render_pdf(HELLO, None).await.unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("11x8.5in"), "Landscape Letter expected: {}", text);

    let pdf = renderer
        .render_pdf(HELLO, Some(PdfOptions::default()))
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("8.27x11.7in"), "Explicit A4 expected: {}", text);
}

/// Test stats after a full lifecycle.
#[tokio::test]
async fn test_stats_lifecycle() {
    let factory = MockBrowserFactory::new();
    let renderer = renderer_with(&factory);

    renderer.render_pdf(HELLO, None).await.unwrap();
    renderer.dispose_async().await.unwrap();

    let stats = renderer.stats();
    assert_eq!(stats.state, RendererState::Disposed);
    assert_eq!(stats.launches, 1);
    assert_eq!(stats.discarded, 0);
    assert_eq!(stats.released, 1);
    assert_eq!(stats.live(), 0);
}

/// Test driving the renderer from synchronous code.
#[test]
fn test_blocking_usage() {
    let factory = MockBrowserFactory::new();
    let renderer = renderer_with(&factory);

    let pdf = tokio_test::block_on(renderer.render_pdf(HELLO, None)).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));

    renderer.dispose().unwrap();
    assert_eq!(factory.live(), 0);
}

/// Test against a real browser.
///
/// Requires Chrome at `CHROME_PATH`; run with `cargo test -- --ignored`.
#[tokio::test]
#[ignore]
async fn test_real_chrome_render() {
    init_logging();
    let path = std::env::var("CHROME_PATH").expect("CHROME_PATH must be set");
    let renderer = HtmlRenderer::new(Some(LaunchConfig::for_executable(path))).unwrap();

    let pdf = renderer.render_pdf(HELLO, None).await.unwrap();
    assert!(pdf.starts_with(b"%PDF-"));

    let mut sink = Vec::new();
    let written = renderer.render_pdf_to(HELLO, &mut sink, None).await.unwrap();
    assert_eq!(written as usize, sink.len());
    assert!(sink.starts_with(b"%PDF-"));

    renderer.dispose_async().await.unwrap();
}
