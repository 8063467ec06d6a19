use super::handle::Handle;
use super::sys;
use crate::error::{Error, Result};
use crate::frame::PixelFormat;
use std::ffi::{c_int, c_void};
use std::ptr;

/// Flags returned by [`RenderContext::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateFlags(u64);

impl UpdateFlags {
    /// A new video frame must be rendered.
    pub const FRAME: UpdateFlags = UpdateFlags(sys::MPV_RENDER_UPDATE_FRAME);

    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn contains(self, other: UpdateFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A caller-owned pixel buffer libmpv renders into.
#[derive(Debug)]
pub struct SoftwareTarget<'a> {
    pub width: u32,
    pub height: u32,
    /// Bytes per row.
    pub stride: usize,
    pub format: PixelFormat,
    pub pixels: &'a mut [u8],
}

impl SoftwareTarget<'_> {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidTarget("zero-sized target"));
        }
        if self.width > c_int::MAX as u32 || self.height > c_int::MAX as u32 {
            return Err(Error::InvalidTarget("target dimensions overflow"));
        }
        let row = (self.width as usize)
            .checked_mul(self.format.bytes_per_pixel())
            .ok_or(Error::InvalidTarget("target size overflow"))?;
        if self.stride < row {
            return Err(Error::InvalidTarget("stride smaller than a row"));
        }
        // libmpv requires 4-byte aligned strides for the packed formats.
        if self.stride % 4 != 0 {
            return Err(Error::InvalidTarget("stride not a multiple of 4"));
        }
        let len = self
            .stride
            .checked_mul(self.height as usize)
            .ok_or(Error::InvalidTarget("target size overflow"))?;
        if self.pixels.len() < len {
            return Err(Error::InvalidTarget("buffer smaller than stride * height"));
        }
        Ok(())
    }
}

/// A libmpv render context using the software (`"sw"`) backend.
///
/// Holds a clone of the [`Handle`] so the core always outlives the context;
/// libmpv requires the render context to be freed before `mpv_destroy`.
pub struct RenderContext {
    handle: Handle,
    ptr: *mut sys::mpv_render_context,
}

// Render functions may be called from any single thread at a time; the
// context is only ever used behind `&mut self` or a lock.
unsafe impl Send for RenderContext {}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext").field("ptr", &self.ptr).finish()
    }
}

impl RenderContext {
    pub fn new_sw(handle: &Handle) -> Result<Self> {
        let library = handle.library();
        let mut params = [
            sys::mpv_render_param {
                type_: sys::MPV_RENDER_PARAM_API_TYPE,
                data: sys::MPV_RENDER_API_TYPE_SW.as_ptr() as *mut c_void,
            },
            sys::mpv_render_param {
                type_: sys::MPV_RENDER_PARAM_INVALID,
                data: ptr::null_mut(),
            },
        ];
        let mut ctx: *mut sys::mpv_render_context = ptr::null_mut();
        let status = unsafe {
            (library.render_context_create)(&mut ctx, handle.as_ptr(), params.as_mut_ptr())
        };
        library.check(status, || "mpv_render_context_create(sw)".into())?;
        if ctx.is_null() {
            return Err(Error::Create);
        }
        Ok(Self {
            handle: handle.clone(),
            ptr: ctx,
        })
    }

    pub fn update(&mut self) -> UpdateFlags {
        let bits = unsafe { (self.handle.library().render_context_update)(self.ptr) };
        UpdateFlags::from_bits(bits)
    }

    /// Renders the current video frame into `target`.
    pub fn render_sw(&mut self, mut target: SoftwareTarget<'_>) -> Result<()> {
        target.validate()?;

        let mut size: [c_int; 2] = [target.width as c_int, target.height as c_int];
        let mut stride: usize = target.stride;
        let format = target.format.mpv_name();
        let mut params = [
            sys::mpv_render_param {
                type_: sys::MPV_RENDER_PARAM_SW_SIZE,
                data: size.as_mut_ptr() as *mut c_void,
            },
            sys::mpv_render_param {
                type_: sys::MPV_RENDER_PARAM_SW_FORMAT,
                data: format.as_ptr() as *mut c_void,
            },
            sys::mpv_render_param {
                type_: sys::MPV_RENDER_PARAM_SW_STRIDE,
                data: &mut stride as *mut usize as *mut c_void,
            },
            sys::mpv_render_param {
                type_: sys::MPV_RENDER_PARAM_SW_POINTER,
                data: target.pixels.as_mut_ptr() as *mut c_void,
            },
            sys::mpv_render_param {
                type_: sys::MPV_RENDER_PARAM_INVALID,
                data: ptr::null_mut(),
            },
        ];

        let library = self.handle.library();
        let status = unsafe { (library.render_context_render)(self.ptr, params.as_mut_ptr()) };
        library.check(status, || "mpv_render_context_render".into())?;
        Ok(())
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { (self.handle.library().render_context_free)(self.ptr) };
            self.ptr = ptr::null_mut();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(buf: &mut [u8], width: u32, height: u32, stride: usize) -> SoftwareTarget<'_> {
        SoftwareTarget {
            width,
            height,
            stride,
            format: PixelFormat::Bgr0,
            pixels: buf,
        }
    }

    #[test]
    fn accepts_tightly_packed_target() {
        let mut buf = vec![0u8; 16 * 8 * 4];
        assert!(target(&mut buf, 16, 8, 64).validate().is_ok());
    }

    #[test]
    fn rejects_zero_size() {
        let mut buf = vec![0u8; 64];
        let err = target(&mut buf, 0, 8, 64).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidTarget("zero-sized target")));
    }

    #[test]
    fn rejects_short_stride() {
        let mut buf = vec![0u8; 16 * 8 * 4];
        assert!(target(&mut buf, 16, 8, 60).validate().is_err());
    }

    #[test]
    fn rejects_short_buffer() {
        let mut buf = vec![0u8; 16 * 7 * 4];
        assert!(target(&mut buf, 16, 8, 64).validate().is_err());
    }

    #[test]
    fn rejects_overflowing_stride() {
        let mut buf = vec![0u8; 16];
        let err = target(&mut buf, 2, 2, 1 << (usize::BITS - 1))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTarget("target size overflow")));

        let err = target(&mut buf, 2, 2, usize::MAX - 3).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidTarget("target size overflow")));
    }

    #[test]
    fn update_flags_contain_frame() {
        assert!(UpdateFlags::from_bits(1).contains(UpdateFlags::FRAME));
        assert!(UpdateFlags::from_bits(3).contains(UpdateFlags::FRAME));
        assert!(!UpdateFlags::default().contains(UpdateFlags::FRAME));
    }
}
