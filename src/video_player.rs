use crate::config::PlayerOptions;
use crate::element::video;
use crate::video::{MediaEvent, Video};
use gpui::{Context, EventEmitter, IntoElement, ParentElement, Render, Styled, Window, div};
use std::time::Duration;

/// Content fit modes for video display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFit {
    #[default]
    Contain,
    Cover,
    Fill,
    ScaleDown,
    None,
}

impl ContentFit {
    pub(crate) fn object_fit(self) -> gpui::ObjectFit {
        match self {
            ContentFit::Contain => gpui::ObjectFit::Contain,
            ContentFit::Cover => gpui::ObjectFit::Cover,
            ContentFit::Fill => gpui::ObjectFit::Fill,
            ContentFit::ScaleDown => gpui::ObjectFit::ScaleDown,
            ContentFit::None => gpui::ObjectFit::None,
        }
    }
}

/// Events that can be emitted by the video player.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoPlayerEvent {
    /// The media was opened and its first frame can be rendered.
    MediaOpened {
        width: u32,
        height: u32,
        duration: Duration,
    },
    /// Playback reached the end of the media.
    MediaEnded,
    /// libmpv could not play the media.
    MediaFailed(String),
    /// New frame is available.
    NewFrame,
}

impl From<MediaEvent> for VideoPlayerEvent {
    fn from(event: MediaEvent) -> Self {
        match event {
            MediaEvent::Opened {
                width,
                height,
                duration,
            } => VideoPlayerEvent::MediaOpened {
                width,
                height,
                duration,
            },
            MediaEvent::Ended => VideoPlayerEvent::MediaEnded,
            MediaEvent::Failed(message) => VideoPlayerEvent::MediaFailed(message),
        }
    }
}

/// Video player component for GPUI.
#[derive(Debug)]
pub struct VideoPlayer {
    video: Video,
    width: Option<gpui::Pixels>,
    height: Option<gpui::Pixels>,
    fit: ContentFit,
}

impl VideoPlayer {
    /// Create a new video player from a video URI.
    pub fn new(uri: &url::Url) -> Result<Self, crate::Error> {
        Ok(Self::from_video(Video::new(uri)?))
    }

    /// Create a new video player with explicit mpv options.
    pub fn with_options(uri: &url::Url, options: PlayerOptions) -> Result<Self, crate::Error> {
        Ok(Self::from_video(Video::with_options(uri, options)?))
    }

    /// Create a video player from an existing Video instance.
    pub fn from_video(video: Video) -> Self {
        Self {
            video,
            width: None,
            height: None,
            fit: ContentFit::Contain,
        }
    }

    /// Set the width of the video player.
    pub fn width(mut self, width: gpui::Pixels) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the height of the video player.
    pub fn height(mut self, height: gpui::Pixels) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the content fit mode.
    pub fn content_fit(mut self, fit: ContentFit) -> Self {
        self.fit = fit;
        self
    }

    /// Get a reference to the underlying video.
    pub fn video(&self) -> &Video {
        &self.video
    }

    /// Poll libmpv and translate what happened into view events.
    fn handle_media_events(&self, cx: &mut Context<VideoPlayerView>) {
        for event in self.video.poll_events() {
            if let MediaEvent::Failed(message) = &event {
                log::error!("mpv error: {message}");
            }
            cx.emit(VideoPlayerEvent::from(event));
        }

        // Check for new frames once (consume the flag) and schedule redraw
        if self.video.take_frame_ready() {
            cx.emit(VideoPlayerEvent::NewFrame);
            cx.notify();
        }
    }
}

/// A view wrapper for the VideoPlayer component.
pub struct VideoPlayerView {
    player: VideoPlayer,
}

impl VideoPlayerView {
    /// Create a new video player view.
    pub fn new(player: VideoPlayer) -> Self {
        Self { player }
    }

    /// Get a reference to the video player.
    pub fn player(&self) -> &VideoPlayer {
        &self.player
    }

    /// Replace the player, e.g. to change its size or fit.
    pub fn set_player(&mut self, player: VideoPlayer) {
        self.player = player;
    }
}

impl EventEmitter<VideoPlayerEvent> for VideoPlayerView {}

impl Render for VideoPlayerView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.player.handle_media_events(cx);

        let mut element = video(self.player.video.clone()).content_fit(self.player.fit);
        if let Some(width) = self.player.width {
            element = element.width(width);
        }
        if let Some(height) = self.player.height {
            element = element.height(height);
        }

        div()
            .size_full()
            .flex()
            .items_center()
            .justify_center()
            .child(element)
    }
}

/// Helper function to create a video player view.
pub fn video_player(player: VideoPlayer) -> VideoPlayerView {
    VideoPlayerView::new(player)
}

/// Helper function to create a video player from a URI.
pub fn video_player_from_uri(uri: &url::Url) -> Result<VideoPlayerView, crate::Error> {
    let player = VideoPlayer::new(uri)?;
    Ok(video_player(player))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_events_map_to_view_events() {
        let opened = MediaEvent::Opened {
            width: 1920,
            height: 1080,
            duration: Duration::from_secs(90),
        };
        assert_eq!(
            VideoPlayerEvent::from(opened),
            VideoPlayerEvent::MediaOpened {
                width: 1920,
                height: 1080,
                duration: Duration::from_secs(90),
            }
        );
        assert_eq!(
            VideoPlayerEvent::from(MediaEvent::Ended),
            VideoPlayerEvent::MediaEnded
        );
        assert_eq!(
            VideoPlayerEvent::from(MediaEvent::Failed("loading failed".into())),
            VideoPlayerEvent::MediaFailed("loading failed".into())
        );
    }

    #[test]
    fn content_fit_defaults_to_contain() {
        assert_eq!(ContentFit::default(), ContentFit::Contain);
        assert!(matches!(
            ContentFit::ScaleDown.object_fit(),
            gpui::ObjectFit::ScaleDown
        ));
    }
}
