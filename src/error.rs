//! Error types for libmpv loading and playback.

use crate::mpv::sys;
use std::ffi::c_int;
use std::path::PathBuf;

/// Convenience result type using [`Error`] as the error variant.
pub type Result<T> = core::result::Result<T, Error>;

/// A libmpv status code (`mpv_error`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    EventQueueFull,
    NoMem,
    Uninitialized,
    InvalidParameter,
    OptionNotFound,
    OptionFormat,
    OptionError,
    PropertyNotFound,
    PropertyFormat,
    PropertyUnavailable,
    PropertyError,
    Command,
    LoadingFailed,
    AoInitFailed,
    VoInitFailed,
    NothingToPlay,
    UnknownFormat,
    Unsupported,
    NotImplemented,
    Generic,
    /// A code this crate does not know about (newer libmpv).
    Unknown(c_int),
}

impl ErrorCode {
    pub fn from_raw(code: c_int) -> Self {
        match code {
            sys::MPV_ERROR_SUCCESS => Self::Success,
            sys::MPV_ERROR_EVENT_QUEUE_FULL => Self::EventQueueFull,
            sys::MPV_ERROR_NOMEM => Self::NoMem,
            sys::MPV_ERROR_UNINITIALIZED => Self::Uninitialized,
            sys::MPV_ERROR_INVALID_PARAMETER => Self::InvalidParameter,
            sys::MPV_ERROR_OPTION_NOT_FOUND => Self::OptionNotFound,
            sys::MPV_ERROR_OPTION_FORMAT => Self::OptionFormat,
            sys::MPV_ERROR_OPTION_ERROR => Self::OptionError,
            sys::MPV_ERROR_PROPERTY_NOT_FOUND => Self::PropertyNotFound,
            sys::MPV_ERROR_PROPERTY_FORMAT => Self::PropertyFormat,
            sys::MPV_ERROR_PROPERTY_UNAVAILABLE => Self::PropertyUnavailable,
            sys::MPV_ERROR_PROPERTY_ERROR => Self::PropertyError,
            sys::MPV_ERROR_COMMAND => Self::Command,
            sys::MPV_ERROR_LOADING_FAILED => Self::LoadingFailed,
            sys::MPV_ERROR_AO_INIT_FAILED => Self::AoInitFailed,
            sys::MPV_ERROR_VO_INIT_FAILED => Self::VoInitFailed,
            sys::MPV_ERROR_NOTHING_TO_PLAY => Self::NothingToPlay,
            sys::MPV_ERROR_UNKNOWN_FORMAT => Self::UnknownFormat,
            sys::MPV_ERROR_UNSUPPORTED => Self::Unsupported,
            sys::MPV_ERROR_NOT_IMPLEMENTED => Self::NotImplemented,
            sys::MPV_ERROR_GENERIC => Self::Generic,
            other => Self::Unknown(other),
        }
    }

    pub fn to_raw(self) -> c_int {
        match self {
            Self::Success => sys::MPV_ERROR_SUCCESS,
            Self::EventQueueFull => sys::MPV_ERROR_EVENT_QUEUE_FULL,
            Self::NoMem => sys::MPV_ERROR_NOMEM,
            Self::Uninitialized => sys::MPV_ERROR_UNINITIALIZED,
            Self::InvalidParameter => sys::MPV_ERROR_INVALID_PARAMETER,
            Self::OptionNotFound => sys::MPV_ERROR_OPTION_NOT_FOUND,
            Self::OptionFormat => sys::MPV_ERROR_OPTION_FORMAT,
            Self::OptionError => sys::MPV_ERROR_OPTION_ERROR,
            Self::PropertyNotFound => sys::MPV_ERROR_PROPERTY_NOT_FOUND,
            Self::PropertyFormat => sys::MPV_ERROR_PROPERTY_FORMAT,
            Self::PropertyUnavailable => sys::MPV_ERROR_PROPERTY_UNAVAILABLE,
            Self::PropertyError => sys::MPV_ERROR_PROPERTY_ERROR,
            Self::Command => sys::MPV_ERROR_COMMAND,
            Self::LoadingFailed => sys::MPV_ERROR_LOADING_FAILED,
            Self::AoInitFailed => sys::MPV_ERROR_AO_INIT_FAILED,
            Self::VoInitFailed => sys::MPV_ERROR_VO_INIT_FAILED,
            Self::NothingToPlay => sys::MPV_ERROR_NOTHING_TO_PLAY,
            Self::UnknownFormat => sys::MPV_ERROR_UNKNOWN_FORMAT,
            Self::Unsupported => sys::MPV_ERROR_UNSUPPORTED,
            Self::NotImplemented => sys::MPV_ERROR_NOT_IMPLEMENTED,
            Self::Generic => sys::MPV_ERROR_GENERIC,
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Errors that can occur while loading libmpv or driving a player.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The shared library was found but could not be loaded.
    #[error("failed to load libmpv: {0}")]
    Library(#[from] libloading::Error),

    /// None of the candidate library names could be loaded.
    #[error("libmpv not found (tried: {})", .0.join(", "))]
    LibraryNotFound(Vec<String>),

    /// The process-wide library failed to load earlier; the cached reason.
    #[error("libmpv unavailable: {0}")]
    LibraryUnavailable(String),

    /// The library loaded but an entry point is missing.
    #[error("missing libmpv symbol `{symbol}`: {source}")]
    MissingSymbol {
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    #[error("mpv_create returned null")]
    Create,

    /// A libmpv call returned a negative status.
    #[error("{op}: {message}")]
    Mpv {
        op: String,
        code: ErrorCode,
        message: String,
    },

    #[error("string contains a nul byte: {0}")]
    NulString(#[from] std::ffi::NulError),

    #[error("media file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid framerate: {0}")]
    Framerate(f64),

    /// A software render target failed validation.
    #[error("invalid render target: {0}")]
    InvalidTarget(&'static str),
}

impl Error {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Mpv { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_codes() {
        assert_eq!(ErrorCode::from_raw(0), ErrorCode::Success);
        assert_eq!(ErrorCode::from_raw(-8), ErrorCode::PropertyNotFound);
        assert_eq!(ErrorCode::from_raw(-10), ErrorCode::PropertyUnavailable);
        assert_eq!(ErrorCode::from_raw(-13), ErrorCode::LoadingFailed);
        assert_eq!(ErrorCode::from_raw(-20), ErrorCode::Generic);
    }

    #[test]
    fn keeps_unknown_codes() {
        assert_eq!(ErrorCode::from_raw(-21), ErrorCode::Unknown(-21));
        assert!(!ErrorCode::from_raw(-21).is_success());
    }

    #[test]
    fn raw_codes_round_trip() {
        for raw in -22..=0 {
            assert_eq!(ErrorCode::from_raw(raw).to_raw(), raw);
        }
    }

    #[test]
    fn library_not_found_lists_candidates() {
        let err = Error::LibraryNotFound(vec!["libmpv.so.2".into(), "libmpv.so.1".into()]);
        assert_eq!(
            err.to_string(),
            "libmpv not found (tried: libmpv.so.2, libmpv.so.1)"
        );
    }

    #[test]
    fn mpv_error_exposes_code() {
        let err = Error::Mpv {
            op: "get_property(width)".into(),
            code: ErrorCode::PropertyUnavailable,
            message: "property unavailable".into(),
        };
        assert_eq!(err.code(), Some(ErrorCode::PropertyUnavailable));
        assert_eq!(err.to_string(), "get_property(width): property unavailable");
    }
}
