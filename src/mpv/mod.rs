//! Dynamic bindings to libmpv.
//!
//! [`Library`] loads the shared object and resolves its entry points,
//! [`Handle`] is the typed client surface (properties, commands, events),
//! and [`RenderContext`] drives the software renderer.

mod event;
mod handle;
mod library;
mod render;
#[cfg(test)]
mod stub;
pub mod sys;

pub use event::{EndFile, EndFileReason, Event, LogLevel};
pub use handle::{Format, Handle};
pub use library::{
    LIBRARY_PATH_ENV, Library, default_candidates, set_library_path,
};
pub use render::{RenderContext, SoftwareTarget, UpdateFlags};
