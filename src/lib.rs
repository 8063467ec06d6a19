//! # GPUI mpv Player
//!
//! A video player component for GPUI using libmpv for media playback.
//!
//! ## Features
//!
//! - libmpv loaded at runtime, no link-time dependency
//! - Software rendering straight into a BGRA texture (no GL context required)
//! - Every container and codec libmpv supports, local files and streams
//! - Audio control (volume, muting)
//! - Playback control (play, pause, stop, seek, speed, looping)
//! - Event-driven architecture for handling media lifecycle events
//!
//! ## Locating libmpv
//!
//! The library is resolved once per process: a path set with
//! [`mpv::set_library_path`] (or [`PlayerOptions::library_path`]), then the
//! `MPV_LIBRARY_PATH` environment variable, then the platform's usual names
//! (`libmpv.so.2`, `mpv-2.dll`, `libmpv.2.dylib`, ...).
//!
//! ## Example
//!
//! ```no_run
//! use gpui_mpv_player::video_player_from_uri;
//! use url::Url;
//!
//! fn main() {
//!     let uri = Url::parse("file:///path/to/video.mp4").unwrap();
//!     let player = video_player_from_uri(&uri).unwrap();
//!
//!     // Use the player in your GPUI application
//! }
//! ```

mod config;
mod element;
mod error;
mod frame;
mod video;
mod video_player;

pub mod mpv;

pub use config::PlayerOptions;
pub use element::{VideoElement, video};
pub use error::{Error, ErrorCode, Result};
pub use frame::{FrameBuffer, PixelFormat};
pub use video::{MediaEvent, MediaState, Position, Video};
pub use video_player::{
    ContentFit, VideoPlayer, VideoPlayerEvent, VideoPlayerView, video_player,
    video_player_from_uri,
};

// Re-export commonly used types
pub use url::Url;
