use image::{ImageBuffer, Rgba};
use smallvec::SmallVec;
use std::ffi::CStr;
use std::sync::Arc;

/// Packed 32-bit pixel layouts libmpv's software renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// B, G, R, padding. Matches the BGRA layout gpui uploads images in.
    #[default]
    Bgr0,
    /// R, G, B, padding.
    Rgb0,
}

impl PixelFormat {
    pub fn mpv_name(self) -> &'static CStr {
        match self {
            PixelFormat::Bgr0 => c"bgr0",
            PixelFormat::Rgb0 => c"rgb0",
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        4
    }

    /// Index of the padding byte inside a pixel.
    fn padding_offset(self) -> usize {
        3
    }
}

/// Backing store of the video texture: one packed frame, rendered into by
/// libmpv and copied out as a gpui image.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(format: PixelFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reallocates for a `width` x `height` frame. Returns `true` if the size
    /// changed; the contents are cleared in that case.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        let len = self.stride() * height as usize;
        self.data.clear();
        self.data.resize(len, 0);
        true
    }

    /// Forces every pixel opaque. libmpv leaves the padding byte undefined.
    pub fn finish(&mut self) {
        let offset = self.format.padding_offset();
        let bpp = self.format.bytes_per_pixel();
        for pixel in self.data.chunks_exact_mut(bpp) {
            pixel[offset] = 0xff;
        }
    }

    /// The frame in the BGRA byte order gpui uploads textures in.
    fn texture_bytes(&self) -> Vec<u8> {
        let mut bytes = self.data.clone();
        if self.format == PixelFormat::Rgb0 {
            for pixel in bytes.chunks_exact_mut(self.format.bytes_per_pixel()) {
                pixel.swap(0, 2);
            }
        }
        bytes
    }

    /// Copies the frame into a gpui image, the unit gpui uploads to a GPU
    /// texture.
    pub fn to_render_image(&self) -> Option<Arc<gpui::RenderImage>> {
        if self.is_empty() {
            return None;
        }
        let buffer =
            ImageBuffer::<Rgba<u8>, _>::from_raw(self.width, self.height, self.texture_bytes())?;
        let frames: SmallVec<[image::Frame; 1]> =
            SmallVec::from_elem(image::Frame::new(buffer), 1);
        Some(Arc::new(gpui::RenderImage::new(frames)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_allocates_packed_rows() {
        let mut frame = FrameBuffer::new(PixelFormat::Bgr0);
        assert!(frame.is_empty());
        assert!(frame.resize(4, 2));
        assert_eq!(frame.stride(), 16);
        assert_eq!(frame.data().len(), 32);
        assert!(!frame.resize(4, 2));
    }

    #[test]
    fn resize_clears_contents() {
        let mut frame = FrameBuffer::new(PixelFormat::Rgb0);
        frame.resize(2, 2);
        frame.data_mut().fill(7);
        assert!(frame.resize(3, 1));
        assert!(frame.data().iter().all(|b| *b == 0));
        assert_eq!(frame.data().len(), 12);
    }

    #[test]
    fn finish_sets_padding_only() {
        let mut frame = FrameBuffer::new(PixelFormat::Bgr0);
        frame.resize(2, 1);
        frame.data_mut().copy_from_slice(&[1, 2, 3, 0, 4, 5, 6, 9]);
        frame.finish();
        assert_eq!(frame.data(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn texture_bytes_are_bgra() {
        let pixel = [10, 20, 30, 0];

        let mut bgr = FrameBuffer::new(PixelFormat::Bgr0);
        bgr.resize(1, 1);
        bgr.data_mut().copy_from_slice(&pixel);
        bgr.finish();
        assert_eq!(bgr.texture_bytes(), vec![10, 20, 30, 255]);

        // R=10, G=20, B=30 must land as B, G, R, A.
        let mut rgb = FrameBuffer::new(PixelFormat::Rgb0);
        rgb.resize(1, 1);
        rgb.data_mut().copy_from_slice(&pixel);
        rgb.finish();
        assert_eq!(rgb.texture_bytes(), vec![30, 20, 10, 255]);
        assert_eq!(rgb.data(), &[10, 20, 30, 255]);
    }

    #[test]
    fn non_empty_frame_has_image() {
        let mut frame = FrameBuffer::new(PixelFormat::Rgb0);
        frame.resize(3, 2);
        assert!(frame.to_render_image().is_some());
    }

    #[test]
    fn empty_frame_has_no_image() {
        let frame = FrameBuffer::new(PixelFormat::Bgr0);
        assert!(frame.to_render_image().is_none());
    }

    #[test]
    fn mpv_names() {
        assert_eq!(PixelFormat::default().mpv_name().to_str().unwrap(), "bgr0");
        assert_eq!(PixelFormat::Rgb0.mpv_name().to_str().unwrap(), "rgb0");
    }
}
