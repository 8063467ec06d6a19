use super::event::{Event, LogLevel};
use super::{Library, sys};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr;
use std::sync::Arc;
use std::time::Duration;

mod private {
    pub trait Sealed {}
}

/// A value type that can be read from or written to an mpv property.
pub trait Format: Sized + private::Sealed {
    #[doc(hidden)]
    fn read(
        library: &Library,
        get: impl FnOnce(c_int, *mut c_void) -> Result<()>,
    ) -> Result<Self>;

    #[doc(hidden)]
    fn write(&self, set: impl FnOnce(c_int, *mut c_void) -> Result<()>) -> Result<()>;
}

impl private::Sealed for bool {}
impl Format for bool {
    fn read(_: &Library, get: impl FnOnce(c_int, *mut c_void) -> Result<()>) -> Result<Self> {
        let mut value: c_int = 0;
        get(sys::MPV_FORMAT_FLAG, &mut value as *mut c_int as *mut c_void)?;
        Ok(value != 0)
    }

    fn write(&self, set: impl FnOnce(c_int, *mut c_void) -> Result<()>) -> Result<()> {
        let mut value: c_int = (*self).into();
        set(sys::MPV_FORMAT_FLAG, &mut value as *mut c_int as *mut c_void)
    }
}

impl private::Sealed for i64 {}
impl Format for i64 {
    fn read(_: &Library, get: impl FnOnce(c_int, *mut c_void) -> Result<()>) -> Result<Self> {
        let mut value: i64 = 0;
        get(sys::MPV_FORMAT_INT64, &mut value as *mut i64 as *mut c_void)?;
        Ok(value)
    }

    fn write(&self, set: impl FnOnce(c_int, *mut c_void) -> Result<()>) -> Result<()> {
        let mut value = *self;
        set(sys::MPV_FORMAT_INT64, &mut value as *mut i64 as *mut c_void)
    }
}

impl private::Sealed for f64 {}
impl Format for f64 {
    fn read(_: &Library, get: impl FnOnce(c_int, *mut c_void) -> Result<()>) -> Result<Self> {
        let mut value: f64 = 0.0;
        get(sys::MPV_FORMAT_DOUBLE, &mut value as *mut f64 as *mut c_void)?;
        Ok(value)
    }

    fn write(&self, set: impl FnOnce(c_int, *mut c_void) -> Result<()>) -> Result<()> {
        let mut value = *self;
        set(sys::MPV_FORMAT_DOUBLE, &mut value as *mut f64 as *mut c_void)
    }
}

impl private::Sealed for String {}
impl Format for String {
    fn read(
        library: &Library,
        get: impl FnOnce(c_int, *mut c_void) -> Result<()>,
    ) -> Result<Self> {
        let mut value: *mut c_char = ptr::null_mut();
        get(sys::MPV_FORMAT_STRING, &mut value as *mut *mut c_char as *mut c_void)?;
        if value.is_null() {
            return Ok(String::new());
        }
        let text = unsafe { CStr::from_ptr(value) }
            .to_string_lossy()
            .into_owned();
        unsafe { library.free(value as *mut c_void) };
        Ok(text)
    }

    fn write(&self, set: impl FnOnce(c_int, *mut c_void) -> Result<()>) -> Result<()> {
        let value = CString::new(self.as_str())?;
        let mut ptr = value.as_ptr();
        set(sys::MPV_FORMAT_STRING, &mut ptr as *mut *const c_char as *mut c_void)
    }
}

pub(crate) struct RawHandle {
    pub(crate) library: Arc<Library>,
    pub(crate) ptr: *mut sys::mpv_handle,
    // Held across mpv_wait_event and the decode of the event it returns.
    events: Mutex<()>,
}

impl RawHandle {
    fn new(library: Arc<Library>, ptr: *mut sys::mpv_handle) -> Self {
        Self {
            library,
            ptr,
            events: Mutex::new(()),
        }
    }
}

// The libmpv client API is thread-safe for all functions taking an mpv_handle,
// except mpv_wait_event, which `events` serializes.
unsafe impl Send for RawHandle {}
unsafe impl Sync for RawHandle {}

impl Drop for RawHandle {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { (self.library.destroy)(self.ptr) };
        }
    }
}

/// An mpv client handle.
///
/// Cloning shares the same client; the handle is destroyed with
/// `mpv_destroy` once the last clone (and any render context created from
/// it) is dropped.
#[derive(Clone)]
pub struct Handle(pub(crate) Arc<RawHandle>);

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handle").field(&self.0.ptr).finish()
    }
}

impl Handle {
    /// Creates an uninitialized mpv core.
    pub fn create(library: Arc<Library>) -> Result<Self> {
        let ptr = unsafe { (library.create)() };
        if ptr.is_null() {
            return Err(Error::Create);
        }
        Ok(Self(Arc::new(RawHandle::new(library, ptr))))
    }

    /// Creates another client attached to the same core.
    pub fn create_client(&self, name: &str) -> Result<Self> {
        let name = CString::new(name)?;
        let ptr = unsafe { (self.library().create_client)(self.0.ptr, name.as_ptr()) };
        if ptr.is_null() {
            return Err(Error::Create);
        }
        Ok(Self(Arc::new(RawHandle::new(
            Arc::clone(&self.0.library),
            ptr,
        ))))
    }

    pub fn library(&self) -> &Library {
        &self.0.library
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::mpv_handle {
        self.0.ptr
    }

    pub fn initialize(&self) -> Result<()> {
        let status = unsafe { (self.library().initialize)(self.0.ptr) };
        self.library().check(status, || "mpv_initialize".into())?;
        Ok(())
    }

    /// Sets an option before [`Handle::initialize`].
    pub fn set_option(&self, name: &str, value: &str) -> Result<()> {
        let c_name = CString::new(name)?;
        let c_value = CString::new(value)?;
        let status = unsafe {
            (self.library().set_option_string)(self.0.ptr, c_name.as_ptr(), c_value.as_ptr())
        };
        self.library()
            .check(status, || format!("set_option({name}={value})"))?;
        Ok(())
    }

    pub fn get_property<T: Format>(&self, name: &str) -> Result<T> {
        let c_name = CString::new(name)?;
        let library = self.library();
        T::read(library, |format, data| {
            let status =
                unsafe { (library.get_property)(self.0.ptr, c_name.as_ptr(), format, data) };
            library.check(status, || format!("get_property({name})"))?;
            Ok(())
        })
    }

    pub fn set_property<T: Format>(&self, name: &str, value: T) -> Result<()> {
        let c_name = CString::new(name)?;
        let library = self.library();
        value.write(|format, data| {
            let status =
                unsafe { (library.set_property)(self.0.ptr, c_name.as_ptr(), format, data) };
            library.check(status, || format!("set_property({name})"))?;
            Ok(())
        })
    }

    /// Runs a command given as separate arguments (`mpv_command`).
    pub fn command(&self, args: &[&str]) -> Result<()> {
        let owned = args
            .iter()
            .map(|arg| CString::new(*arg))
            .collect::<core::result::Result<Vec<_>, _>>()?;
        let mut argv = command_argv(&owned);
        let status = unsafe { (self.library().command)(self.0.ptr, argv.as_mut_ptr()) };
        self.library()
            .check(status, || format!("command({})", args.join(" ")))?;
        Ok(())
    }

    /// Runs a command in mpv's input.conf syntax (`mpv_command_string`).
    pub fn command_string(&self, command: &str) -> Result<()> {
        let c_command = CString::new(command)?;
        let status = unsafe { (self.library().command_string)(self.0.ptr, c_command.as_ptr()) };
        self.library()
            .check(status, || format!("command_string({command})"))?;
        Ok(())
    }

    /// Subscribes to log messages at `level` and above.
    pub fn request_log_messages(&self, level: Option<LogLevel>) -> Result<()> {
        let name = level.map_or("no", LogLevel::as_str);
        let c_level = CString::new(name)?;
        let status =
            unsafe { (self.library().request_log_messages)(self.0.ptr, c_level.as_ptr()) };
        self.library()
            .check(status, || format!("request_log_messages({name})"))?;
        Ok(())
    }

    /// Waits up to `timeout` for the next event.
    ///
    /// A zero timeout never blocks, which makes it safe to call from the
    /// rendering thread. Concurrent callers on clones of one handle wait for
    /// each other.
    pub fn wait_event(&self, timeout: Duration) -> Event {
        let _events = self.0.events.lock();
        let raw = unsafe { (self.library().wait_event)(self.0.ptr, timeout.as_secs_f64()) };
        // The event stays valid until the next mpv_wait_event on this handle;
        // `from_raw` copies everything out before returning.
        unsafe { Event::from_raw(raw) }
    }
}

/// Builds the NULL-terminated argv array for `mpv_command`.
fn command_argv(args: &[CString]) -> Vec<*const c_char> {
    args.iter()
        .map(|arg| arg.as_ptr())
        .chain(std::iter::once(ptr::null()))
        .collect()
}
