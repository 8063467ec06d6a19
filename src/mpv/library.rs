//! Runtime loading of libmpv.
//!
//! The shared object is opened with `libloading` and every entry point the
//! crate uses is resolved up front, so a missing symbol is reported when the
//! library is loaded rather than in the middle of playback.

use super::sys;
use crate::error::{Error, ErrorCode, Result};
use std::ffi::{CStr, c_int, c_void};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Environment variable consulted by [`Library::global`] for the library path.
pub const LIBRARY_PATH_ENV: &str = "MPV_LIBRARY_PATH";

#[cfg(target_os = "windows")]
const CANDIDATES: &[&str] = &["mpv-2.dll", "libmpv-2.dll", "mpv-1.dll"];
#[cfg(target_os = "macos")]
const CANDIDATES: &[&str] = &["libmpv.2.dylib", "libmpv.dylib"];
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CANDIDATES: &[&str] = &["libmpv.so.2", "libmpv.so.1", "libmpv.so"];

static LIBRARY_PATH: OnceLock<PathBuf> = OnceLock::new();
static GLOBAL: OnceLock<core::result::Result<Arc<Library>, String>> = OnceLock::new();

/// Sets the path used by [`Library::global`].
///
/// Returns `false` if a path was already set or the global library has
/// already been loaded, in which case the call has no effect.
pub fn set_library_path(path: impl Into<PathBuf>) -> bool {
    if GLOBAL.get().is_some() {
        return false;
    }
    LIBRARY_PATH.set(path.into()).is_ok()
}

/// Platform library names tried by [`Library::open_default`], in order.
pub fn default_candidates() -> &'static [&'static str] {
    CANDIDATES
}

/// A loaded libmpv with its entry points resolved.
pub struct Library {
    pub(crate) client_api_version: sys::mpv_client_api_version_fn,
    pub(crate) error_string: sys::mpv_error_string_fn,
    pub(crate) free: sys::mpv_free_fn,
    pub(crate) create: sys::mpv_create_fn,
    pub(crate) create_client: sys::mpv_create_client_fn,
    pub(crate) initialize: sys::mpv_initialize_fn,
    pub(crate) destroy: sys::mpv_destroy_fn,
    pub(crate) set_option_string: sys::mpv_set_option_string_fn,
    pub(crate) command: sys::mpv_command_fn,
    pub(crate) command_string: sys::mpv_command_string_fn,
    pub(crate) set_property: sys::mpv_set_property_fn,
    pub(crate) get_property: sys::mpv_get_property_fn,
    pub(crate) request_log_messages: sys::mpv_request_log_messages_fn,
    pub(crate) wait_event: sys::mpv_wait_event_fn,
    pub(crate) render_context_create: sys::mpv_render_context_create_fn,
    pub(crate) render_context_update: sys::mpv_render_context_update_fn,
    pub(crate) render_context_render: sys::mpv_render_context_render_fn,
    pub(crate) render_context_free: sys::mpv_render_context_free_fn,

    name: String,
    // Keeps the shared object mapped; the pointers above point into it.
    // `None` only for the in-process stand-in used by unit tests.
    _lib: Option<libloading::Library>,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library").field("name", &self.name).finish()
    }
}

/// Resolves `name` to a function pointer of type `T`.
///
/// # Safety
///
/// `T` must be the exact function pointer type of the exported symbol.
unsafe fn resolve<T: Copy>(lib: &libloading::Library, name: &str) -> Result<T> {
    let symbol: libloading::Symbol<T> =
        unsafe { lib.get(name.as_bytes()) }.map_err(|source| Error::MissingSymbol {
            symbol: name.to_string(),
            source,
        })?;
    Ok(*symbol)
}

impl Library {
    /// Loads libmpv from `path` and resolves all entry points.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        // SAFETY: loading libmpv runs its static initialisers, which have no
        // preconditions on the host process.
        let lib = unsafe { libloading::Library::new(path) }?;
        let library = unsafe { Self::from_library(lib, path.display().to_string()) }?;

        let (major, minor) = library.client_api_version();
        log::info!(
            "loaded {} (client API {}.{})",
            library.name,
            major,
            minor
        );
        Ok(library)
    }

    /// Tries every name in [`default_candidates`] and returns the first
    /// library that loads.
    pub fn open_default() -> Result<Self> {
        let mut tried = Vec::with_capacity(CANDIDATES.len());
        for name in CANDIDATES {
            match Self::open(name) {
                Ok(library) => return Ok(library),
                Err(err @ Error::MissingSymbol { .. }) => return Err(err),
                Err(err) => {
                    log::debug!("could not load {name}: {err}");
                    tried.push(name.to_string());
                }
            }
        }
        Err(Error::LibraryNotFound(tried))
    }

    /// The process-wide library.
    ///
    /// Resolved once: the path from [`set_library_path`], else the
    /// `MPV_LIBRARY_PATH` environment variable, else [`Library::open_default`].
    /// A failure is remembered and returned on every later call.
    pub fn global() -> Result<Arc<Library>> {
        GLOBAL
            .get_or_init(|| {
                let explicit = LIBRARY_PATH
                    .get()
                    .cloned()
                    .or_else(|| std::env::var_os(LIBRARY_PATH_ENV).map(PathBuf::from));
                let loaded = match explicit {
                    Some(path) => {
                        Self::open(&path).map_err(|err| format!("{}: {err}", path.display()))
                    }
                    None => Self::open_default().map_err(|err| err.to_string()),
                };
                loaded.map(Arc::new).inspect_err(|err| log::error!("{err}"))
            })
            .clone()
            .map_err(Error::LibraryUnavailable)
    }

    unsafe fn from_library(lib: libloading::Library, name: String) -> Result<Self> {
        unsafe {
            Ok(Self {
                client_api_version: resolve(&lib, "mpv_client_api_version")?,
                error_string: resolve(&lib, "mpv_error_string")?,
                free: resolve(&lib, "mpv_free")?,
                create: resolve(&lib, "mpv_create")?,
                create_client: resolve(&lib, "mpv_create_client")?,
                initialize: resolve(&lib, "mpv_initialize")?,
                destroy: resolve(&lib, "mpv_destroy")?,
                set_option_string: resolve(&lib, "mpv_set_option_string")?,
                command: resolve(&lib, "mpv_command")?,
                command_string: resolve(&lib, "mpv_command_string")?,
                set_property: resolve(&lib, "mpv_set_property")?,
                get_property: resolve(&lib, "mpv_get_property")?,
                request_log_messages: resolve(&lib, "mpv_request_log_messages")?,
                wait_event: resolve(&lib, "mpv_wait_event")?,
                render_context_create: resolve(&lib, "mpv_render_context_create")?,
                render_context_update: resolve(&lib, "mpv_render_context_update")?,
                render_context_render: resolve(&lib, "mpv_render_context_render")?,
                render_context_free: resolve(&lib, "mpv_render_context_free")?,
                name,
                _lib: Some(lib),
            })
        }
    }

    /// A library whose entry points are Rust functions instead of a loaded
    /// shared object.
    #[cfg(test)]
    pub(crate) fn from_stubs(name: &str) -> Self {
        use super::stub;
        Self {
            client_api_version: stub::client_api_version,
            error_string: stub::error_string,
            free: stub::free,
            create: stub::create,
            create_client: stub::create_client,
            initialize: stub::status_ok,
            destroy: stub::destroy,
            set_option_string: stub::set_option_string,
            command: stub::command,
            command_string: stub::command_string,
            set_property: stub::property,
            get_property: stub::property,
            request_log_messages: stub::command_string,
            wait_event: stub::wait_event,
            render_context_create: stub::render_context_create,
            render_context_update: stub::render_context_update,
            render_context_render: stub::render_context_render,
            render_context_free: stub::render_context_free,
            name: name.to_string(),
            _lib: None,
        }
    }

    /// Name or path the library was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Client API version as `(major, minor)`.
    pub fn client_api_version(&self) -> (u32, u32) {
        let version = unsafe { (self.client_api_version)() } as u64;
        split_api_version(version)
    }

    /// Human readable message for a libmpv status code.
    pub fn error_string(&self, code: c_int) -> String {
        let ptr = unsafe { (self.error_string)(code) };
        if ptr.is_null() {
            return format!("{:?}", ErrorCode::from_raw(code));
        }
        // Static string owned by libmpv.
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    /// Maps a negative status to [`Error::Mpv`], passing other values through.
    pub(crate) fn check(&self, status: c_int, op: impl FnOnce() -> String) -> Result<c_int> {
        if status >= 0 {
            return Ok(status);
        }
        Err(Error::Mpv {
            op: op(),
            code: ErrorCode::from_raw(status),
            message: self.error_string(status),
        })
    }

    pub(crate) unsafe fn free(&self, data: *mut c_void) {
        if !data.is_null() {
            unsafe { (self.free)(data) }
        }
    }
}

fn split_api_version(version: u64) -> (u32, u32) {
    ((version >> 16) as u32, (version & 0xffff) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_client_api_version() {
        // MPV_MAKE_VERSION(2, 3)
        assert_eq!(split_api_version((2 << 16) | 3), (2, 3));
        assert_eq!(split_api_version(1 << 16), (1, 0));
    }

    #[test]
    fn candidates_are_platform_specific() {
        let candidates = default_candidates();
        assert!(!candidates.is_empty());
        if cfg!(target_os = "windows") {
            assert_eq!(candidates[0], "mpv-2.dll");
        } else if cfg!(target_os = "macos") {
            assert!(candidates.iter().all(|name| name.ends_with(".dylib")));
        } else {
            assert_eq!(candidates[0], "libmpv.so.2");
            assert!(candidates.contains(&"libmpv.so.1"));
        }
    }

    #[test]
    fn open_reports_missing_file() {
        let err = Library::open("/nonexistent/dir/libmpv-does-not-exist.so").unwrap_err();
        assert!(matches!(err, Error::Library(_)), "unexpected error: {err}");
    }
}
