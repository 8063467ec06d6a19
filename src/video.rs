use crate::config::PlayerOptions;
use crate::error::{Error, ErrorCode, Result};
use crate::frame::FrameBuffer;
use crate::mpv::{
    EndFileReason, Event, Format, Handle, Library, RenderContext, SoftwareTarget, UpdateFlags,
    set_library_path,
};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Upper bound on events drained per tick so a flood of log messages cannot
/// stall the rendering thread.
const MAX_EVENTS_PER_TICK: usize = 64;

/// Media events kept for [`Video::poll_events`] when nothing collects them.
const MAX_PENDING_EVENTS: usize = 32;

/// Replaced frames kept for the element to release from the sprite atlas.
/// Frames beyond this were never painted and are simply dropped.
const MAX_RETIRED_IMAGES: usize = 4;

/// Position in the media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    /// Position based on time.
    Time(Duration),
    /// Position based on nth frame.
    Frame(u64),
}

impl Position {
    /// Seconds from the start, using `framerate` for frame positions.
    fn to_seconds(self, framerate: f64) -> Result<f64> {
        match self {
            Position::Time(t) => Ok(t.as_secs_f64()),
            Position::Frame(f) => {
                if !framerate.is_finite() || framerate <= 0.0 {
                    return Err(Error::Framerate(framerate));
                }
                Ok(f as f64 / framerate)
            }
        }
    }
}

impl From<Duration> for Position {
    fn from(t: Duration) -> Self {
        Position::Time(t)
    }
}

impl From<u64> for Position {
    fn from(f: u64) -> Self {
        Position::Frame(f)
    }
}

/// Lifecycle of the media loaded into a [`Video`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaState {
    Opening,
    Opened,
    Ended,
    Failed,
    Closed,
}

/// Media lifecycle notifications produced by [`Video::poll_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Opened {
        width: u32,
        height: u32,
        duration: Duration,
    },
    Ended,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Opened,
    Ended,
    Failed(ErrorCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EofAction {
    Ended,
    Restart,
}

/// Turns libmpv events and the `eof-reached` property into one-shot media
/// outcomes.
#[derive(Debug)]
struct Lifecycle {
    state: MediaState,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            state: MediaState::Opening,
        }
    }

    fn on_event(&mut self, event: &Event) -> Option<Outcome> {
        match event {
            Event::FileLoaded => {
                self.state = MediaState::Opened;
                Some(Outcome::Opened)
            }
            Event::EndFile(end) if end.reason == EndFileReason::Error => {
                self.state = MediaState::Failed;
                Some(Outcome::Failed(end.error))
            }
            Event::EndFile(_) => match self.state {
                MediaState::Ended | MediaState::Failed | MediaState::Closed => None,
                _ => {
                    self.state = MediaState::Ended;
                    Some(Outcome::Ended)
                }
            },
            Event::Shutdown => {
                self.state = MediaState::Closed;
                None
            }
            _ => None,
        }
    }

    /// With `keep-open` libmpv does not report the end of a file as an
    /// event, so the end is detected from `eof-reached` instead.
    fn on_eof(&mut self, eof: bool, looping: bool) -> Option<EofAction> {
        match (self.state, eof) {
            (MediaState::Ended, false) => {
                self.state = MediaState::Opened;
                None
            }
            (MediaState::Opened, true) if looping => Some(EofAction::Restart),
            (MediaState::Opened, true) => {
                self.state = MediaState::Ended;
                Some(EofAction::Ended)
            }
            _ => None,
        }
    }
}

fn retire(retired: &mut Vec<Arc<gpui::RenderImage>>, image: Arc<gpui::RenderImage>) {
    if retired.len() >= MAX_RETIRED_IMAGES {
        retired.remove(0);
    }
    retired.push(image);
}

fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

/// What `loadfile` is given for `uri`: a plain path for `file://` URIs.
fn media_target(uri: &url::Url) -> Result<String> {
    if uri.scheme() != "file" {
        return Ok(uri.as_str().to_string());
    }
    let path = uri
        .to_file_path()
        .map_err(|_| Error::FileNotFound(PathBuf::from(uri.path())))?;
    if !path.exists() {
        return Err(Error::FileNotFound(path));
    }
    Ok(path.to_string_lossy().into_owned())
}

pub(crate) struct Internal {
    pub(crate) id: u64,
    pub(crate) handle: Option<Handle>,
    pub(crate) render: Mutex<Option<RenderContext>>,
    lifecycle: Lifecycle,
    looping: bool,
    pending: VecDeque<MediaEvent>,

    pub(crate) frame: Mutex<FrameBuffer>,
    pub(crate) image: Mutex<Option<Arc<gpui::RenderImage>>>,
    pub(crate) retired: Mutex<Vec<Arc<gpui::RenderImage>>>,
    pub(crate) upload_frame: AtomicBool,
}

impl std::fmt::Debug for Internal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Internal")
            .field("id", &self.id)
            .field("handle", &self.handle)
            .field("state", &self.lifecycle.state)
            .field("looping", &self.looping)
            .finish_non_exhaustive()
    }
}

impl Internal {
    fn property<T: Format>(&self, name: &str) -> Option<T> {
        let handle = self.handle.as_ref()?;
        match handle.get_property::<T>(name) {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!("video {}: {err}", self.id);
                None
            }
        }
    }

    fn set_property<T: Format>(&self, name: &str, value: T) -> Result<()> {
        match &self.handle {
            Some(handle) => handle.set_property(name, value),
            None => Ok(()),
        }
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.handle.is_some()
            && self.render.lock().is_some()
            && !self.property::<bool>("playback-abort").unwrap_or(true)
    }

    fn size(&self) -> (u32, u32) {
        if !self.is_loaded() {
            return (0, 0);
        }
        let dim = |name: &str| {
            self.property::<i64>(name)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0)
        };
        (dim("width"), dim("height"))
    }

    fn seek(&self, position: impl Into<Position>, accurate: bool) -> Result<()> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };
        if !self.is_loaded() {
            return Ok(());
        }
        let framerate = self.property::<f64>("container-fps").unwrap_or(0.0);
        let secs = position.into().to_seconds(framerate)?;
        let flags = if accurate { "absolute+exact" } else { "absolute" };
        handle.command_string(&format!("no-osd seek {secs:.6} {flags}"))
    }

    fn set_paused(&self, paused: bool) -> Result<()> {
        if !self.is_loaded() {
            return Ok(());
        }
        self.set_property("pause", paused)
    }

    fn rewind(&self) -> Result<()> {
        self.seek(Duration::ZERO, false)?;
        self.set_paused(false)
    }

    fn media_event(&self, outcome: Outcome) -> MediaEvent {
        match outcome {
            Outcome::Opened => {
                let (width, height) = self.size();
                let duration = seconds(self.property::<f64>("duration").unwrap_or(0.0));
                log::info!(
                    "video {}: media opened ({width}x{height}, {:.2}s)",
                    self.id,
                    duration.as_secs_f64()
                );
                MediaEvent::Opened {
                    width,
                    height,
                    duration,
                }
            }
            Outcome::Ended => {
                log::info!("video {}: media ended", self.id);
                MediaEvent::Ended
            }
            Outcome::Failed(code) => {
                let message = match &self.handle {
                    Some(handle) => handle.library().error_string(code.to_raw()),
                    None => format!("{code:?}"),
                };
                log::error!("video {}: media failed: {message}", self.id);
                MediaEvent::Failed(message)
            }
        }
    }

    fn push_event(&mut self, event: MediaEvent) {
        if self.pending.len() == MAX_PENDING_EVENTS {
            self.pending.pop_front();
        }
        self.pending.push_back(event);
    }

    fn close(&mut self) {
        // The render context must go before the core.
        self.render.get_mut().take();
        if self.handle.take().is_some() {
            log::debug!("video {}: closed", self.id);
        }
        self.lifecycle.state = MediaState::Closed;
        self.image.get_mut().take();
        self.upload_frame.store(false, Ordering::SeqCst);
    }
}

/// A multimedia video loaded from a URI (e.g., a local file path or HTTP stream).
#[derive(Debug, Clone)]
pub struct Video(pub(crate) Arc<RwLock<Internal>>);

impl Drop for Video {
    fn drop(&mut self) {
        // Only cleanup if this is the last reference
        if Arc::strong_count(&self.0) == 1 {
            if let Some(mut inner) = self.0.try_write() {
                inner.close();
            }
        }
    }
}

impl Video {
    /// Create a new video player from a given video which loads from `uri`.
    pub fn new(uri: &url::Url) -> Result<Self> {
        Self::with_options(uri, PlayerOptions::default())
    }

    /// Create a new video player with explicit mpv options.
    pub fn with_options(uri: &url::Url, options: PlayerOptions) -> Result<Self> {
        let target = media_target(uri)?;

        if let Some(path) = &options.library_path {
            if !set_library_path(path) {
                log::warn!(
                    "libmpv path {} ignored: library already selected",
                    path.display()
                );
            }
        }
        let library = Library::global()?;

        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);

        // Everything created below is released on drop if a later step fails.
        let handle = Handle::create(library)?;
        for (name, value) in options.to_options() {
            if let Err(err) = handle.set_option(&name, &value) {
                log::warn!("video {id}: {err}");
            }
        }
        handle.initialize()?;
        if options.log_level.is_some() {
            handle.request_log_messages(options.log_level)?;
        }

        let render = RenderContext::new_sw(&handle)?;
        handle.command(&["loadfile", &target, "replace"])?;
        log::info!("video {id}: loading {target}");

        Ok(Video(Arc::new(RwLock::new(Internal {
            id,
            handle: Some(handle),
            render: Mutex::new(Some(render)),
            lifecycle: Lifecycle::new(),
            looping: false,
            pending: VecDeque::new(),

            frame: Mutex::new(FrameBuffer::new(options.pixel_format)),
            image: Mutex::new(None),
            retired: Mutex::new(Vec::new()),
            upload_frame: AtomicBool::new(false),
        }))))
    }

    pub(crate) fn read(&self) -> parking_lot::RwLockReadGuard<'_, Internal> {
        self.0.read()
    }

    pub(crate) fn write(&self) -> parking_lot::RwLockWriteGuard<'_, Internal> {
        self.0.write()
    }

    pub fn id(&self) -> u64 {
        self.read().id
    }

    /// The underlying mpv client, until the video is closed.
    pub fn handle(&self) -> Option<Handle> {
        self.read().handle.clone()
    }

    /// Drains pending libmpv events and returns the lifecycle changes seen
    /// since the last call.
    ///
    /// Meant to be called once per rendering-thread tick; it never blocks.
    pub fn poll_events(&self) -> Vec<MediaEvent> {
        self.pump_events();
        self.write().pending.drain(..).collect()
    }

    /// Processes libmpv events without handing out the resulting media
    /// events; they stay queued for [`Video::poll_events`].
    pub(crate) fn pump_events(&self) {
        let mut inner = self.write();
        let Some(handle) = inner.handle.clone() else {
            return;
        };

        if inner.is_loaded() {
            match handle.get_property::<bool>("eof-reached") {
                Ok(eof) => {
                    let looping = inner.looping;
                    match inner.lifecycle.on_eof(eof, looping) {
                        Some(EofAction::Ended) => {
                            let event = inner.media_event(Outcome::Ended);
                            inner.push_event(event);
                        }
                        Some(EofAction::Restart) => {
                            if let Err(err) = inner.rewind() {
                                log::warn!("video {}: failed to loop: {err}", inner.id);
                            }
                        }
                        None => {}
                    }
                }
                Err(err) => log::debug!("video {}: {err}", inner.id),
            }
        }

        for _ in 0..MAX_EVENTS_PER_TICK {
            match handle.wait_event(Duration::ZERO) {
                Event::None => break,
                Event::LogMessage {
                    prefix,
                    level,
                    text,
                } => {
                    let level = level.map_or(log::Level::Info, |l| l.to_log());
                    log::log!(target: "mpv", level, "[{prefix}] {text}");
                }
                Event::QueueOverflow => {
                    log::warn!("video {}: mpv event queue overflowed", inner.id);
                }
                event => {
                    if let Some(outcome) = inner.lifecycle.on_event(&event) {
                        let event = inner.media_event(outcome);
                        inner.push_event(event);
                    }
                }
            }
        }
    }

    /// Renders a new frame into the texture if libmpv has one.
    ///
    /// Returns `true` when [`Video::current_image`] changed.
    pub fn update_frame(&self) -> bool {
        let inner = self.read();
        let (width, height) = inner.size();
        if width == 0 || height == 0 {
            return false;
        }

        let mut render = inner.render.lock();
        let Some(render) = render.as_mut() else {
            return false;
        };

        let mut frame = inner.frame.lock();
        let resized = frame.resize(width, height);
        if resized {
            log::info!("video {}: resizing pixels ({width} x {height})", inner.id);
        }

        // A resized buffer is blank, so render even without a new frame.
        if !render.update().contains(UpdateFlags::FRAME) && !resized {
            return false;
        }

        let stride = frame.stride();
        let format = frame.format();
        let target = SoftwareTarget {
            width,
            height,
            stride,
            format,
            pixels: frame.data_mut(),
        };
        if let Err(err) = render.render_sw(target) {
            log::error!("video {}: {err}", inner.id);
            return false;
        }
        frame.finish();

        let Some(image) = frame.to_render_image() else {
            return false;
        };
        if let Some(old) = inner.image.lock().replace(image) {
            retire(&mut inner.retired.lock(), old);
        }
        inner.upload_frame.store(true, Ordering::SeqCst);
        true
    }

    /// The latest rendered frame.
    pub fn current_image(&self) -> Option<Arc<gpui::RenderImage>> {
        self.read().image.lock().clone()
    }

    /// Frames replaced since the last call; their atlas textures can be freed.
    pub(crate) fn take_retired_images(&self) -> Vec<Arc<gpui::RenderImage>> {
        std::mem::take(&mut *self.read().retired.lock())
    }

    /// Returns whether a new frame arrived since the last call.
    pub fn take_frame_ready(&self) -> bool {
        self.read().upload_frame.swap(false, Ordering::SeqCst)
    }

    pub fn state(&self) -> MediaState {
        self.read().lifecycle.state
    }

    /// Whether media is loaded and playback has not been aborted.
    pub fn is_loaded(&self) -> bool {
        self.read().is_loaded()
    }

    /// Get the size/resolution of the video as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        self.read().size()
    }

    /// Get the framerate of the video as frames per second.
    pub fn framerate(&self) -> f64 {
        self.read().property::<f64>("container-fps").unwrap_or(0.0)
    }

    pub fn has_video(&self) -> bool {
        let inner = self.read();
        inner.is_loaded() && inner.property::<String>("vid").is_some_and(|v| v != "no")
    }

    pub fn has_audio(&self) -> bool {
        let inner = self.read();
        inner.is_loaded() && inner.property::<String>("aid").is_some_and(|v| v != "no")
    }

    pub fn can_pause(&self) -> bool {
        true
    }

    /// Cache fill in `0.0..=1.0`; `1.0` when nothing is buffering.
    pub fn buffering_progress(&self) -> f32 {
        self.read()
            .property::<i64>("cache-buffering-state")
            .map_or(1.0, |v| v.clamp(0, 100) as f32 / 100.0)
    }

    /// Set the volume multiplier of the audio.
    pub fn set_volume(&self, volume: f64) -> Result<()> {
        let inner = self.read();
        if !inner.is_loaded() {
            return Ok(());
        }
        inner.set_property("volume", volume.max(0.0) * 100.0)
    }

    /// Get the volume multiplier of the audio.
    pub fn volume(&self) -> f64 {
        let inner = self.read();
        if !inner.is_loaded() {
            return 0.5;
        }
        inner.property::<f64>("volume").map_or(0.5, |v| v / 100.0)
    }

    /// Set if the audio is muted or not.
    pub fn set_muted(&self, muted: bool) -> Result<()> {
        let inner = self.read();
        if !inner.is_loaded() {
            return Ok(());
        }
        inner.set_property("mute", muted)
    }

    /// Get if the audio is muted or not.
    pub fn muted(&self) -> bool {
        let inner = self.read();
        inner.is_loaded() && inner.property::<bool>("mute").unwrap_or(false)
    }

    /// Get if the stream ended or not.
    pub fn eos(&self) -> bool {
        self.read().lifecycle.state == MediaState::Ended
    }

    /// Get if the media will loop or not.
    pub fn looping(&self) -> bool {
        self.read().looping
    }

    /// Set if the media will loop or not.
    pub fn set_looping(&self, looping: bool) -> Result<()> {
        let mut inner = self.write();
        inner.looping = looping;
        let value = if looping { "inf" } else { "no" };
        inner.set_property("loop-file", value.to_string())
    }

    /// Set if the media is paused or not.
    pub fn set_paused(&self, paused: bool) -> Result<()> {
        let inner = self.read();
        if inner.lifecycle.state == MediaState::Ended && !paused {
            return inner.rewind();
        }
        inner.set_paused(paused)
    }

    /// Whether a seek is still being carried out.
    pub fn seeking(&self) -> bool {
        let inner = self.read();
        inner.is_loaded() && inner.property::<bool>("seeking").unwrap_or(false)
    }

    /// Get if the media is paused or not.
    pub fn paused(&self) -> bool {
        let inner = self.read();
        inner.is_loaded() && inner.property::<bool>("pause").unwrap_or(false)
    }

    pub fn play(&self) -> Result<()> {
        self.set_paused(false)
    }

    pub fn pause(&self) -> Result<()> {
        self.set_paused(true)
    }

    /// Seeks to the start and pauses.
    pub fn stop(&self) -> Result<()> {
        let inner = self.read();
        if !inner.is_loaded() {
            return Ok(());
        }
        inner.seek(Duration::ZERO, false)?;
        inner.set_paused(true)
    }

    /// Jumps to a specific position in the media.
    pub fn seek(&self, position: impl Into<Position>, accurate: bool) -> Result<()> {
        self.read().seek(position, accurate)
    }

    /// Set the playback speed of the media.
    pub fn set_speed(&self, speed: f64) -> Result<()> {
        let inner = self.read();
        if !inner.is_loaded() {
            return Ok(());
        }
        inner.set_property("speed", speed)
    }

    /// Get the current playback speed.
    pub fn speed(&self) -> f64 {
        let inner = self.read();
        if !inner.is_loaded() {
            return 0.0;
        }
        inner.property::<f64>("speed").unwrap_or(0.0)
    }

    /// Get the current playback position in time.
    pub fn position(&self) -> Duration {
        let inner = self.read();
        if !inner.is_loaded() {
            return Duration::ZERO;
        }
        seconds(inner.property::<f64>("playback-time").unwrap_or(0.0))
    }

    /// Get the media duration.
    pub fn duration(&self) -> Duration {
        let inner = self.read();
        if !inner.is_loaded() {
            return Duration::ZERO;
        }
        seconds(inner.property::<f64>("duration").unwrap_or(0.0))
    }

    /// Restarts a stream.
    pub fn restart_stream(&self) -> Result<()> {
        let mut inner = self.write();
        if inner.lifecycle.state == MediaState::Ended {
            inner.lifecycle.state = MediaState::Opened;
        }
        inner.rewind()
    }

    /// Releases the render context and the mpv core. Safe to call twice.
    pub fn close(&self) {
        self.write().close();
    }
}
