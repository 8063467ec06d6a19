use crate::video::{MediaState, Video};
use crate::video_player::ContentFit;
use gpui::{
    ContentMask, Element, ElementId, GlobalElementId, InspectorElementId, IntoElement, LayoutId,
    Window,
};

/// Whether the element needs another tick without a new frame in hand.
///
/// Opening media must tick to see `FileLoaded`; a paused seek must tick until
/// the frame it produces has been pulled.
fn keeps_ticking(state: MediaState, playing: bool, seeking: bool) -> bool {
    match state {
        MediaState::Opening => true,
        MediaState::Opened => playing || seeking,
        MediaState::Ended | MediaState::Failed | MediaState::Closed => false,
    }
}

/// A video element that implements Element trait similar to GPUI's img element
pub struct VideoElement {
    video: Video,
    display_width: Option<gpui::Pixels>,
    display_height: Option<gpui::Pixels>,
    fit: ContentFit,
    element_id: Option<ElementId>,
}

impl VideoElement {
    pub fn new(video: Video) -> Self {
        Self {
            video,
            display_width: None,
            display_height: None,
            fit: ContentFit::Contain,
            element_id: None,
        }
    }

    pub fn id(mut self, id: impl Into<ElementId>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    pub fn size(mut self, width: gpui::Pixels, height: gpui::Pixels) -> Self {
        self.display_width = Some(width);
        self.display_height = Some(height);
        self
    }

    pub fn width(mut self, width: gpui::Pixels) -> Self {
        self.display_width = Some(width);
        self
    }

    pub fn height(mut self, height: gpui::Pixels) -> Self {
        self.display_height = Some(height);
        self
    }

    pub fn content_fit(mut self, fit: ContentFit) -> Self {
        self.fit = fit;
        self
    }

    /// Get the current display dimensions, falling back to video natural size.
    ///
    /// A single explicit side keeps the video's aspect ratio.
    fn get_display_size(&self) -> (gpui::Pixels, gpui::Pixels) {
        let (video_width, video_height) = self.video.size();
        let (natural_w, natural_h) = (video_width as f32, video_height as f32);
        match (self.display_width, self.display_height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) if natural_w > 0.0 => (w, w * (natural_h / natural_w)),
            (None, Some(h)) if natural_h > 0.0 => (h * (natural_w / natural_h), h),
            (Some(w), None) => (w, gpui::px(0.0)),
            (None, Some(h)) => (gpui::px(0.0), h),
            (None, None) => (gpui::px(natural_w), gpui::px(natural_h)),
        }
    }
}

impl Element for VideoElement {
    type RequestLayoutState = ();
    type PrepaintState = ();

    fn id(&self) -> Option<ElementId> {
        self.element_id.clone()
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        window: &mut Window,
        cx: &mut gpui::App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let (width, height) = self.get_display_size();

        let style = gpui::Style {
            size: gpui::Size {
                width: gpui::Length::Definite(gpui::DefiniteLength::Absolute(
                    gpui::AbsoluteLength::Pixels(width),
                )),
                height: gpui::Length::Definite(gpui::DefiniteLength::Absolute(
                    gpui::AbsoluteLength::Pixels(height),
                )),
            },
            ..Default::default()
        };

        let layout_id = window.request_layout(style, [], cx);
        (layout_id, ())
    }

    fn prepaint(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        _bounds: gpui::Bounds<gpui::Pixels>,
        _request_layout_state: &mut Self::RequestLayoutState,
        window: &mut Window,
        _cx: &mut gpui::App,
    ) -> Self::PrepaintState {
        // One rendering-thread tick: collect libmpv events, then pull a frame.
        self.video.pump_events();
        let has_new_frame = self.video.update_frame();

        let state = self.video.state();
        let playing = state == MediaState::Opened && !self.video.paused();
        if keeps_ticking(state, playing, self.video.seeking()) || has_new_frame {
            window.request_animation_frame();
        }
    }

    fn paint(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: gpui::Bounds<gpui::Pixels>,
        _request_layout_state: &mut Self::RequestLayoutState,
        _prepaint_state: &mut Self::PrepaintState,
        window: &mut Window,
        _cx: &mut gpui::App,
    ) {
        // Free atlas textures of frames that were replaced.
        for image in self.video.take_retired_images() {
            if let Err(err) = window.drop_image(image) {
                log::warn!("failed to release video frame texture: {err}");
            }
        }

        let Some(image) = self.video.current_image() else {
            return;
        };
        let target = self.fit.object_fit().get_bounds(bounds, image.size(0));

        window.with_content_mask(Some(ContentMask { bounds }), |window| {
            if let Err(err) = window.paint_image(
                target,
                gpui::Corners::default(),
                image,
                0,     // frame index
                false, // grayscale
            ) {
                log::error!("failed to paint video frame: {err}");
            }
        });
    }
}

impl IntoElement for VideoElement {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

/// Helper function to create a video element
pub fn video(video: Video) -> VideoElement {
    VideoElement::new(video)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_while_playing() {
        assert!(keeps_ticking(MediaState::Opening, false, false));
        assert!(keeps_ticking(MediaState::Opened, true, false));
        assert!(!keeps_ticking(MediaState::Opened, false, false));
        assert!(!keeps_ticking(MediaState::Ended, false, false));
        assert!(!keeps_ticking(MediaState::Closed, true, true));
    }

    #[test]
    fn paused_seek_ticks_until_settled() {
        assert!(keeps_ticking(MediaState::Opened, false, true));
    }
}
