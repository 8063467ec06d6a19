use super::sys;
use crate::error::ErrorCode;
use std::ffi::{CStr, c_char, c_int};
use std::ptr;

/// Severity of a libmpv log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    Info,
    Verbose,
    Debug,
    Trace,
}

impl LogLevel {
    /// Name accepted by `mpv_request_log_messages`.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Verbose => "v",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    pub(crate) fn from_raw(level: c_int) -> Option<Self> {
        Some(match level {
            sys::MPV_LOG_LEVEL_FATAL => LogLevel::Fatal,
            sys::MPV_LOG_LEVEL_ERROR => LogLevel::Error,
            sys::MPV_LOG_LEVEL_WARN => LogLevel::Warn,
            sys::MPV_LOG_LEVEL_INFO => LogLevel::Info,
            sys::MPV_LOG_LEVEL_V => LogLevel::Verbose,
            sys::MPV_LOG_LEVEL_DEBUG => LogLevel::Debug,
            sys::MPV_LOG_LEVEL_TRACE => LogLevel::Trace,
            _ => return None,
        })
    }

    /// The `log` crate level a message of this severity is forwarded at.
    pub fn to_log(self) -> log::Level {
        match self {
            LogLevel::Fatal | LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Verbose | LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Why a file stopped playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndFileReason {
    Eof,
    Stop,
    Quit,
    Error,
    Redirect,
    Unknown(c_int),
}

impl EndFileReason {
    fn from_raw(reason: c_int) -> Self {
        match reason {
            sys::MPV_END_FILE_REASON_EOF => Self::Eof,
            sys::MPV_END_FILE_REASON_STOP => Self::Stop,
            sys::MPV_END_FILE_REASON_QUIT => Self::Quit,
            sys::MPV_END_FILE_REASON_ERROR => Self::Error,
            sys::MPV_END_FILE_REASON_REDIRECT => Self::Redirect,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndFile {
    pub reason: EndFileReason,
    /// Only meaningful when `reason` is [`EndFileReason::Error`].
    pub error: ErrorCode,
}

/// An event returned by `mpv_wait_event`, copied out of libmpv's storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The queue is empty.
    None,
    Shutdown,
    LogMessage {
        prefix: String,
        level: Option<LogLevel>,
        text: String,
    },
    StartFile,
    EndFile(EndFile),
    FileLoaded,
    VideoReconfig,
    AudioReconfig,
    Seek,
    PlaybackRestart,
    PropertyChange {
        name: String,
    },
    QueueOverflow,
    /// Any event id this crate does not interpret.
    Other(c_int),
}

unsafe fn lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}

impl Event {
    /// Decodes a raw event.
    ///
    /// # Safety
    ///
    /// `raw` must be null or point to a valid `mpv_event` whose `data`
    /// pointer matches its `event_id`, as returned by `mpv_wait_event`
    /// and not yet invalidated by the next call.
    pub(crate) unsafe fn from_raw(raw: *const sys::mpv_event) -> Self {
        let Some(event) = (unsafe { raw.as_ref() }) else {
            return Event::None;
        };

        match event.event_id {
            sys::MPV_EVENT_NONE => Event::None,
            sys::MPV_EVENT_SHUTDOWN => Event::Shutdown,
            sys::MPV_EVENT_LOG_MESSAGE => {
                let data = event.data as *const sys::mpv_event_log_message;
                match unsafe { data.as_ref() } {
                    Some(msg) => unsafe {
                        Event::LogMessage {
                            prefix: lossy(msg.prefix),
                            level: LogLevel::from_raw(msg.log_level),
                            text: lossy(msg.text).trim_end().to_string(),
                        }
                    },
                    None => Event::LogMessage {
                        prefix: String::new(),
                        level: None,
                        text: String::new(),
                    },
                }
            }
            sys::MPV_EVENT_START_FILE => Event::StartFile,
            sys::MPV_EVENT_END_FILE => {
                let data = event.data as *const sys::mpv_event_end_file;
                // Client API 1.x only has the leading {reason, error} pair, so
                // the full struct must not be referenced.
                let (reason, error) = if data.is_null() {
                    (sys::MPV_END_FILE_REASON_EOF, sys::MPV_ERROR_SUCCESS)
                } else {
                    unsafe {
                        (
                            ptr::addr_of!((*data).reason).read(),
                            ptr::addr_of!((*data).error).read(),
                        )
                    }
                };
                Event::EndFile(EndFile {
                    reason: EndFileReason::from_raw(reason),
                    error: ErrorCode::from_raw(error),
                })
            }
            sys::MPV_EVENT_FILE_LOADED => Event::FileLoaded,
            sys::MPV_EVENT_VIDEO_RECONFIG => Event::VideoReconfig,
            sys::MPV_EVENT_AUDIO_RECONFIG => Event::AudioReconfig,
            sys::MPV_EVENT_SEEK => Event::Seek,
            sys::MPV_EVENT_PLAYBACK_RESTART => Event::PlaybackRestart,
            sys::MPV_EVENT_PROPERTY_CHANGE => {
                let data = event.data as *const sys::mpv_event_property;
                let name = unsafe { data.as_ref() }
                    .map(|prop| unsafe { lossy(prop.name) })
                    .unwrap_or_default();
                Event::PropertyChange { name }
            }
            sys::MPV_EVENT_QUEUE_OVERFLOW => Event::QueueOverflow,
            other => Event::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::c_void;
    use std::ptr;

    fn raw(event_id: c_int, data: *mut c_void) -> sys::mpv_event {
        sys::mpv_event {
            event_id,
            error: 0,
            reply_userdata: 0,
            data,
        }
    }

    #[test]
    fn null_pointer_is_none() {
        assert_eq!(unsafe { Event::from_raw(ptr::null()) }, Event::None);
    }

    #[test]
    fn decodes_file_loaded() {
        let ev = raw(sys::MPV_EVENT_FILE_LOADED, ptr::null_mut());
        assert_eq!(unsafe { Event::from_raw(&ev) }, Event::FileLoaded);
    }

    #[test]
    fn decodes_end_file_error() {
        let mut end = sys::mpv_event_end_file {
            reason: sys::MPV_END_FILE_REASON_ERROR,
            error: sys::MPV_ERROR_LOADING_FAILED,
            playlist_entry_id: 1,
            playlist_insert_id: 0,
            playlist_insert_num_entries: 0,
        };
        let ev = raw(sys::MPV_EVENT_END_FILE, &mut end as *mut _ as *mut c_void);
        assert_eq!(
            unsafe { Event::from_raw(&ev) },
            Event::EndFile(EndFile {
                reason: EndFileReason::Error,
                error: ErrorCode::LoadingFailed,
            })
        );
    }

    #[test]
    fn decodes_short_end_file_payload() {
        // Only the two leading fields, as older libmpv builds deliver it.
        let mut short: [c_int; 2] = [sys::MPV_END_FILE_REASON_STOP, sys::MPV_ERROR_SUCCESS];
        let ev = raw(sys::MPV_EVENT_END_FILE, short.as_mut_ptr() as *mut c_void);
        assert_eq!(
            unsafe { Event::from_raw(&ev) },
            Event::EndFile(EndFile {
                reason: EndFileReason::Stop,
                error: ErrorCode::Success,
            })
        );
    }

    #[test]
    fn end_file_without_payload_is_eof() {
        let ev = raw(sys::MPV_EVENT_END_FILE, ptr::null_mut());
        let Event::EndFile(end) = (unsafe { Event::from_raw(&ev) }) else {
            panic!("expected end file");
        };
        assert_eq!(end.reason, EndFileReason::Eof);
        assert!(end.error.is_success());
    }

    #[test]
    fn decodes_log_message() {
        let prefix = c"ffmpeg";
        let level = c"warn";
        let text = c"stream 1: unknown codec\n";
        let mut msg = sys::mpv_event_log_message {
            prefix: prefix.as_ptr(),
            level: level.as_ptr(),
            text: text.as_ptr(),
            log_level: sys::MPV_LOG_LEVEL_WARN,
        };
        let ev = raw(sys::MPV_EVENT_LOG_MESSAGE, &mut msg as *mut _ as *mut c_void);
        assert_eq!(
            unsafe { Event::from_raw(&ev) },
            Event::LogMessage {
                prefix: "ffmpeg".into(),
                level: Some(LogLevel::Warn),
                text: "stream 1: unknown codec".into(),
            }
        );
    }

    #[test]
    fn decodes_property_change_name() {
        let name = c"pause";
        let mut prop = sys::mpv_event_property {
            name: name.as_ptr(),
            format: sys::MPV_FORMAT_NONE,
            data: ptr::null_mut(),
        };
        let ev = raw(sys::MPV_EVENT_PROPERTY_CHANGE, &mut prop as *mut _ as *mut c_void);
        assert_eq!(
            unsafe { Event::from_raw(&ev) },
            Event::PropertyChange {
                name: "pause".into()
            }
        );
    }

    #[test]
    fn unknown_ids_are_kept() {
        let ev = raw(sys::MPV_EVENT_HOOK, ptr::null_mut());
        assert_eq!(unsafe { Event::from_raw(&ev) }, Event::Other(sys::MPV_EVENT_HOOK));
    }

    #[test]
    fn log_levels_order_by_severity() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert_eq!(LogLevel::Verbose.as_str(), "v");
        assert_eq!(LogLevel::Fatal.to_log(), log::Level::Error);
        assert_eq!(LogLevel::from_raw(sys::MPV_LOG_LEVEL_DEBUG), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_raw(sys::MPV_LOG_LEVEL_NONE), None);
    }
}
