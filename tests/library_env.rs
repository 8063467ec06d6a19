//! Process-wide library resolution from `MPV_LIBRARY_PATH`.
//!
//! Kept in its own test binary: the resolved library is cached for the
//! lifetime of the process.

use gpui_mpv_player::Error;
use gpui_mpv_player::mpv::{LIBRARY_PATH_ENV, Library, set_library_path};

const BOGUS: &str = "/nonexistent/env/libmpv-missing.so";

#[test]
fn env_path_failure_is_cached() {
    // SAFETY: the only test in this binary, nothing else reads the
    // environment concurrently.
    unsafe { std::env::set_var(LIBRARY_PATH_ENV, BOGUS) };

    let first = match Library::global() {
        Err(Error::LibraryUnavailable(message)) => message,
        other => panic!("expected LibraryUnavailable, got {other:?}"),
    };
    assert!(first.starts_with(BOGUS), "unexpected message: {first}");

    let second = match Library::global() {
        Err(Error::LibraryUnavailable(message)) => message,
        other => panic!("expected LibraryUnavailable, got {other:?}"),
    };
    assert_eq!(first, second);

    // Too late: the library has already been resolved.
    assert!(!set_library_path("/nonexistent/late/libmpv.so"));
    assert!(matches!(
        Library::global(),
        Err(Error::LibraryUnavailable(message)) if message == first
    ));
}
