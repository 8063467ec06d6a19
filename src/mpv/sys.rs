//! Raw libmpv ABI: opaque handles, event payload layouts, constants and the
//! function pointer type of every entry point resolved by [`super::Library`].
//!
//! Layouts follow `client.h` and `render.h` of libmpv client API 2.x.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_double, c_int, c_ulong, c_void};

#[repr(C)]
pub struct mpv_handle {
    _private: [u8; 0],
}

#[repr(C)]
pub struct mpv_render_context {
    _private: [u8; 0],
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mpv_event {
    pub event_id: c_int,
    pub error: c_int,
    pub reply_userdata: u64,
    pub data: *mut c_void,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mpv_event_log_message {
    pub prefix: *const c_char,
    pub level: *const c_char,
    pub text: *const c_char,
    pub log_level: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mpv_event_end_file {
    pub reason: c_int,
    pub error: c_int,
    pub playlist_entry_id: i64,
    pub playlist_insert_id: i64,
    pub playlist_insert_num_entries: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mpv_event_property {
    pub name: *const c_char,
    pub format: c_int,
    pub data: *mut c_void,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mpv_event_client_message {
    pub num_args: c_int,
    pub args: *mut *const c_char,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mpv_render_param {
    pub type_: c_int,
    pub data: *mut c_void,
}

// mpv_error
pub const MPV_ERROR_SUCCESS: c_int = 0;
pub const MPV_ERROR_EVENT_QUEUE_FULL: c_int = -1;
pub const MPV_ERROR_NOMEM: c_int = -2;
pub const MPV_ERROR_UNINITIALIZED: c_int = -3;
pub const MPV_ERROR_INVALID_PARAMETER: c_int = -4;
pub const MPV_ERROR_OPTION_NOT_FOUND: c_int = -5;
pub const MPV_ERROR_OPTION_FORMAT: c_int = -6;
pub const MPV_ERROR_OPTION_ERROR: c_int = -7;
pub const MPV_ERROR_PROPERTY_NOT_FOUND: c_int = -8;
pub const MPV_ERROR_PROPERTY_FORMAT: c_int = -9;
pub const MPV_ERROR_PROPERTY_UNAVAILABLE: c_int = -10;
pub const MPV_ERROR_PROPERTY_ERROR: c_int = -11;
pub const MPV_ERROR_COMMAND: c_int = -12;
pub const MPV_ERROR_LOADING_FAILED: c_int = -13;
pub const MPV_ERROR_AO_INIT_FAILED: c_int = -14;
pub const MPV_ERROR_VO_INIT_FAILED: c_int = -15;
pub const MPV_ERROR_NOTHING_TO_PLAY: c_int = -16;
pub const MPV_ERROR_UNKNOWN_FORMAT: c_int = -17;
pub const MPV_ERROR_UNSUPPORTED: c_int = -18;
pub const MPV_ERROR_NOT_IMPLEMENTED: c_int = -19;
pub const MPV_ERROR_GENERIC: c_int = -20;

// mpv_event_id
pub const MPV_EVENT_NONE: c_int = 0;
pub const MPV_EVENT_SHUTDOWN: c_int = 1;
pub const MPV_EVENT_LOG_MESSAGE: c_int = 2;
pub const MPV_EVENT_GET_PROPERTY_REPLY: c_int = 3;
pub const MPV_EVENT_SET_PROPERTY_REPLY: c_int = 4;
pub const MPV_EVENT_COMMAND_REPLY: c_int = 5;
pub const MPV_EVENT_START_FILE: c_int = 6;
pub const MPV_EVENT_END_FILE: c_int = 7;
pub const MPV_EVENT_FILE_LOADED: c_int = 8;
pub const MPV_EVENT_IDLE: c_int = 11;
pub const MPV_EVENT_TICK: c_int = 14;
pub const MPV_EVENT_CLIENT_MESSAGE: c_int = 16;
pub const MPV_EVENT_VIDEO_RECONFIG: c_int = 17;
pub const MPV_EVENT_AUDIO_RECONFIG: c_int = 18;
pub const MPV_EVENT_SEEK: c_int = 20;
pub const MPV_EVENT_PLAYBACK_RESTART: c_int = 21;
pub const MPV_EVENT_PROPERTY_CHANGE: c_int = 22;
pub const MPV_EVENT_QUEUE_OVERFLOW: c_int = 24;
pub const MPV_EVENT_HOOK: c_int = 25;

// mpv_format
pub const MPV_FORMAT_NONE: c_int = 0;
pub const MPV_FORMAT_STRING: c_int = 1;
pub const MPV_FORMAT_OSD_STRING: c_int = 2;
pub const MPV_FORMAT_FLAG: c_int = 3;
pub const MPV_FORMAT_INT64: c_int = 4;
pub const MPV_FORMAT_DOUBLE: c_int = 5;

// mpv_log_level
pub const MPV_LOG_LEVEL_NONE: c_int = 0;
pub const MPV_LOG_LEVEL_FATAL: c_int = 10;
pub const MPV_LOG_LEVEL_ERROR: c_int = 20;
pub const MPV_LOG_LEVEL_WARN: c_int = 30;
pub const MPV_LOG_LEVEL_INFO: c_int = 40;
pub const MPV_LOG_LEVEL_V: c_int = 50;
pub const MPV_LOG_LEVEL_DEBUG: c_int = 60;
pub const MPV_LOG_LEVEL_TRACE: c_int = 70;

// mpv_end_file_reason
pub const MPV_END_FILE_REASON_EOF: c_int = 0;
pub const MPV_END_FILE_REASON_STOP: c_int = 2;
pub const MPV_END_FILE_REASON_QUIT: c_int = 3;
pub const MPV_END_FILE_REASON_ERROR: c_int = 4;
pub const MPV_END_FILE_REASON_REDIRECT: c_int = 5;

// mpv_render_param_type
pub const MPV_RENDER_PARAM_INVALID: c_int = 0;
pub const MPV_RENDER_PARAM_API_TYPE: c_int = 1;
pub const MPV_RENDER_PARAM_SW_SIZE: c_int = 17;
pub const MPV_RENDER_PARAM_SW_FORMAT: c_int = 18;
pub const MPV_RENDER_PARAM_SW_STRIDE: c_int = 19;
pub const MPV_RENDER_PARAM_SW_POINTER: c_int = 20;

pub const MPV_RENDER_API_TYPE_SW: &std::ffi::CStr = c"sw";

// mpv_render_update_flag
pub const MPV_RENDER_UPDATE_FRAME: u64 = 1 << 0;

pub type mpv_client_api_version_fn = unsafe extern "C" fn() -> c_ulong;
pub type mpv_error_string_fn = unsafe extern "C" fn(error: c_int) -> *const c_char;
pub type mpv_free_fn = unsafe extern "C" fn(data: *mut c_void);
pub type mpv_create_fn = unsafe extern "C" fn() -> *mut mpv_handle;
pub type mpv_create_client_fn =
    unsafe extern "C" fn(ctx: *mut mpv_handle, name: *const c_char) -> *mut mpv_handle;
pub type mpv_initialize_fn = unsafe extern "C" fn(ctx: *mut mpv_handle) -> c_int;
pub type mpv_destroy_fn = unsafe extern "C" fn(ctx: *mut mpv_handle);
pub type mpv_set_option_string_fn =
    unsafe extern "C" fn(ctx: *mut mpv_handle, name: *const c_char, data: *const c_char) -> c_int;
pub type mpv_command_fn = unsafe extern "C" fn(ctx: *mut mpv_handle, args: *mut *const c_char) -> c_int;
pub type mpv_command_string_fn =
    unsafe extern "C" fn(ctx: *mut mpv_handle, args: *const c_char) -> c_int;
pub type mpv_set_property_fn = unsafe extern "C" fn(
    ctx: *mut mpv_handle,
    name: *const c_char,
    format: c_int,
    data: *mut c_void,
) -> c_int;
pub type mpv_get_property_fn = unsafe extern "C" fn(
    ctx: *mut mpv_handle,
    name: *const c_char,
    format: c_int,
    data: *mut c_void,
) -> c_int;
pub type mpv_request_log_messages_fn =
    unsafe extern "C" fn(ctx: *mut mpv_handle, min_level: *const c_char) -> c_int;
pub type mpv_wait_event_fn =
    unsafe extern "C" fn(ctx: *mut mpv_handle, timeout: c_double) -> *mut mpv_event;
pub type mpv_render_context_create_fn = unsafe extern "C" fn(
    res: *mut *mut mpv_render_context,
    mpv: *mut mpv_handle,
    params: *mut mpv_render_param,
) -> c_int;
pub type mpv_render_context_update_fn = unsafe extern "C" fn(ctx: *mut mpv_render_context) -> u64;
pub type mpv_render_context_render_fn =
    unsafe extern "C" fn(ctx: *mut mpv_render_context, params: *mut mpv_render_param) -> c_int;
pub type mpv_render_context_free_fn = unsafe extern "C" fn(ctx: *mut mpv_render_context);
