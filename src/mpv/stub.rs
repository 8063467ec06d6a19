//! No-op libmpv entry points for unit tests that need a [`Library`] without
//! the native library.
//!
//! [`Library`]: super::Library

use super::sys;
use std::ffi::{c_char, c_double, c_int, c_ulong, c_void};
use std::ptr::{self, NonNull};

pub(crate) unsafe extern "C" fn client_api_version() -> c_ulong {
    2 << 16
}

pub(crate) unsafe extern "C" fn error_string(_error: c_int) -> *const c_char {
    c"stub error".as_ptr()
}

pub(crate) unsafe extern "C" fn free(_data: *mut c_void) {}

pub(crate) unsafe extern "C" fn create() -> *mut sys::mpv_handle {
    NonNull::dangling().as_ptr()
}

pub(crate) unsafe extern "C" fn create_client(
    _ctx: *mut sys::mpv_handle,
    _name: *const c_char,
) -> *mut sys::mpv_handle {
    NonNull::dangling().as_ptr()
}

pub(crate) unsafe extern "C" fn status_ok(_ctx: *mut sys::mpv_handle) -> c_int {
    sys::MPV_ERROR_SUCCESS
}

pub(crate) unsafe extern "C" fn destroy(_ctx: *mut sys::mpv_handle) {}

pub(crate) unsafe extern "C" fn set_option_string(
    _ctx: *mut sys::mpv_handle,
    _name: *const c_char,
    _data: *const c_char,
) -> c_int {
    sys::MPV_ERROR_SUCCESS
}

pub(crate) unsafe extern "C" fn command(
    _ctx: *mut sys::mpv_handle,
    _args: *mut *const c_char,
) -> c_int {
    sys::MPV_ERROR_SUCCESS
}

pub(crate) unsafe extern "C" fn command_string(
    _ctx: *mut sys::mpv_handle,
    _args: *const c_char,
) -> c_int {
    sys::MPV_ERROR_SUCCESS
}

pub(crate) unsafe extern "C" fn property(
    _ctx: *mut sys::mpv_handle,
    _name: *const c_char,
    _format: c_int,
    _data: *mut c_void,
) -> c_int {
    sys::MPV_ERROR_PROPERTY_UNAVAILABLE
}

/// Always reports an empty queue.
pub(crate) unsafe extern "C" fn wait_event(
    _ctx: *mut sys::mpv_handle,
    _timeout: c_double,
) -> *mut sys::mpv_event {
    ptr::null_mut()
}

pub(crate) unsafe extern "C" fn render_context_create(
    res: *mut *mut sys::mpv_render_context,
    _mpv: *mut sys::mpv_handle,
    _params: *mut sys::mpv_render_param,
) -> c_int {
    unsafe { *res = NonNull::dangling().as_ptr() };
    sys::MPV_ERROR_SUCCESS
}

pub(crate) unsafe extern "C" fn render_context_update(_ctx: *mut sys::mpv_render_context) -> u64 {
    0
}

pub(crate) unsafe extern "C" fn render_context_render(
    _ctx: *mut sys::mpv_render_context,
    _params: *mut sys::mpv_render_param,
) -> c_int {
    sys::MPV_ERROR_SUCCESS
}

pub(crate) unsafe extern "C" fn render_context_free(_ctx: *mut sys::mpv_render_context) {}
