//! Integration tests against a real libmpv.
//!
//! They need libmpv installed (or `MPV_LIBRARY_PATH` pointing at it) and are
//! ignored by default:
//!
//! ```text
//! cargo test -- --ignored
//! ```

use gpui_mpv_player::mpv::{Event, Handle, Library, RenderContext, UpdateFlags};
use gpui_mpv_player::{Error, ErrorCode, Url, Video};
use std::sync::Arc;
use std::time::Duration;

static LOG_ONCE: std::sync::Once = std::sync::Once::new();

fn setup() -> Arc<Library> {
    LOG_ONCE.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
    Library::global().expect("libmpv must be installed to run these tests")
}

fn initialized(library: Arc<Library>) -> Handle {
    let handle = Handle::create(library).unwrap();
    handle.set_option("vo", "libmpv").unwrap();
    handle.set_option("ao", "null").unwrap();
    handle.set_option("idle", "yes").unwrap();
    handle.initialize().unwrap();
    handle
}

#[test]
#[ignore = "requires libmpv"]
fn reports_client_api_version() {
    let library = setup();
    let (major, _minor) = library.client_api_version();
    assert!(major >= 1);
    assert!(!library.error_string(-8).is_empty());
}

#[test]
#[ignore = "requires libmpv"]
fn properties_round_trip() {
    let handle = initialized(setup());

    let version: String = handle.get_property("mpv-version").unwrap();
    assert!(version.starts_with("mpv"), "unexpected version {version}");

    handle.set_property("volume", 42.0f64).unwrap();
    let volume: f64 = handle.get_property("volume").unwrap();
    assert!((volume - 42.0).abs() < 1e-9);

    handle.set_property("pause", true).unwrap();
    assert!(handle.get_property::<bool>("pause").unwrap());

    handle.set_property("loop-file", "inf".to_string()).unwrap();
    let looping: String = handle.get_property("loop-file").unwrap();
    assert_eq!(looping, "inf");
}

#[test]
#[ignore = "requires libmpv"]
fn unknown_property_is_an_error() {
    let handle = initialized(setup());
    let err = handle
        .get_property::<i64>("no-such-property")
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PropertyNotFound));
}

#[test]
#[ignore = "requires libmpv"]
fn bad_command_is_an_error() {
    let handle = initialized(setup());
    let err = handle.command(&["definitely-not-a-command"]).unwrap_err();
    assert!(matches!(err, Error::Mpv { .. }), "unexpected: {err}");
    assert!(handle.command_string("set pause yes").is_ok());
}

#[test]
#[ignore = "requires libmpv"]
fn idle_core_has_no_frame() {
    let handle = initialized(setup());
    let mut render = RenderContext::new_sw(&handle).unwrap();
    assert!(!render.update().contains(UpdateFlags::FRAME));

    // Drain startup events without blocking.
    for _ in 0..100 {
        if handle.wait_event(Duration::ZERO) == Event::None {
            break;
        }
    }
    assert!(handle.get_property::<bool>("playback-abort").unwrap_or(true));
}

#[test]
#[ignore = "requires libmpv"]
fn missing_media_fails_before_loading() {
    setup();
    let uri = Url::parse("file:///nonexistent/missing-clip.webm").unwrap();
    let err = Video::new(&uri).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}

#[test]
#[ignore = "requires libmpv"]
fn closed_video_uses_neutral_defaults() {
    setup();
    let uri = Url::parse("https://127.0.0.1:9/never.mkv").unwrap();
    let video = Video::new(&uri).unwrap();
    video.close();
    video.close();

    assert!(!video.is_loaded());
    assert_eq!(video.size(), (0, 0));
    assert_eq!(video.duration(), Duration::ZERO);
    assert_eq!(video.volume(), 0.5);
    assert!(!video.update_frame());
    assert!(video.poll_events().is_empty());
    assert!(video.play().is_ok());
}
