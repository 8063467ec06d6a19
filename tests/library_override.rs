//! An explicit library path takes precedence over `MPV_LIBRARY_PATH`.
//!
//! Kept in its own test binary: the resolved library is cached for the
//! lifetime of the process.

use gpui_mpv_player::Error;
use gpui_mpv_player::mpv::{LIBRARY_PATH_ENV, Library, set_library_path};

const FROM_ENV: &str = "/nonexistent/env/libmpv-missing.so";
const OVERRIDE: &str = "/nonexistent/override/libmpv-missing.so";

#[test]
fn explicit_path_wins_over_env() {
    // SAFETY: the only test in this binary, nothing else reads the
    // environment concurrently.
    unsafe { std::env::set_var(LIBRARY_PATH_ENV, FROM_ENV) };

    assert!(set_library_path(OVERRIDE));
    // Only the first path is kept.
    assert!(!set_library_path("/nonexistent/second/libmpv.so"));

    match Library::global() {
        Err(Error::LibraryUnavailable(message)) => {
            assert!(message.starts_with(OVERRIDE), "unexpected message: {message}");
            assert!(!message.contains(FROM_ENV));
        }
        other => panic!("expected LibraryUnavailable, got {other:?}"),
    }
}
