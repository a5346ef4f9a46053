// glbridge/src/pixel_format.rs
//
//! Pixel format negotiation through `wglChoosePixelFormatARB`.

use crate::extensions::{ContextCreationFunctions, FALSE, TRUE, WGL_ACCELERATION_ARB};
use crate::extensions::{WGL_DOUBLE_BUFFER_ARB, WGL_FULL_ACCELERATION_ARB, WGL_SUPPORT_OPENGL_ARB};
use crate::platform::{Driver, SurfaceHandle};
use crate::Error;

use std::os::raw::c_int;
use std::ptr;

/// A pixel format index, as returned by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelFormat(pub c_int);

bitflags! {
    /// The subset of `PFD_*` flags this crate cares about.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PixelFormatFlags: u32 {
        const DOUBLE_BUFFER  = 0x0001;
        const DRAW_TO_WINDOW = 0x0004;
        const SUPPORT_OPENGL = 0x0020;
        const GENERIC_FORMAT = 0x0040;
    }
}

/// A platform-neutral view of a `PIXELFORMATDESCRIPTOR`. The pixel type is always RGBA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelFormatDescriptor {
    pub flags: PixelFormatFlags,
    pub color_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
}

impl PixelFormatDescriptor {
    /// The conventional 32-bit double-buffered format requested for the throwaway bootstrap
    /// context, before any extension is available.
    pub fn legacy_bootstrap() -> PixelFormatDescriptor {
        PixelFormatDescriptor {
            flags: PixelFormatFlags::DRAW_TO_WINDOW |
                PixelFormatFlags::SUPPORT_OPENGL |
                PixelFormatFlags::DOUBLE_BUFFER,
            color_bits: 32,
            alpha_bits: 0,
            depth_bits: 24,
            stencil_bits: 8,
        }
    }

    /// True if the format is implemented by the Microsoft software renderer.
    #[inline]
    pub fn is_generic(&self) -> bool {
        self.flags.contains(PixelFormatFlags::GENERIC_FORMAT)
    }
}

/// The requirements every negotiated format has to meet.
pub(crate) fn accelerated_attrib_list() -> [c_int; 7] {
    [
        WGL_SUPPORT_OPENGL_ARB, TRUE,
        WGL_DOUBLE_BUFFER_ARB,  TRUE,
        WGL_ACCELERATION_ARB,   WGL_FULL_ACCELERATION_ARB,
        0,
    ]
}

/// Selects a hardware-accelerated, double-buffered OpenGL pixel format and applies it to
/// `surface`. A format the driver describes as generic is rejected.
pub(crate) fn negotiate_pixel_format<D>(driver: &D,
                                        functions: &ContextCreationFunctions,
                                        surface: SurfaceHandle)
                                        -> Result<PixelFormat, Error>
                                        where D: Driver {
    let attrib_i_list = accelerated_attrib_list();

    #[allow(non_snake_case)]
    let wglChoosePixelFormatARB = functions.ChoosePixelFormatARB;

    let (mut pixel_format, mut pixel_format_count) = (0, 0);
    let ok = unsafe {
        wglChoosePixelFormatARB(surface.as_ptr(),
                                attrib_i_list.as_ptr(),
                                ptr::null(),
                                1,
                                &mut pixel_format,
                                &mut pixel_format_count)
    };
    if ok == FALSE {
        return Err(Error::PixelFormatSelectionFailed(driver.last_error()));
    }
    if pixel_format_count == 0 {
        return Err(Error::NoPixelFormatFound);
    }

    let pixel_format = PixelFormat(pixel_format);
    let descriptor = driver.describe_pixel_format(surface, pixel_format)
                           .map_err(Error::PixelFormatDescriptionFailed)?;
    if descriptor.is_generic() {
        return Err(Error::NoAcceleratedPixelFormat);
    }
    driver.set_pixel_format(surface, pixel_format, &descriptor)
          .map_err(Error::SetPixelFormatFailed)?;

    debug!("glbridge: negotiated pixel format {} ({:?})", pixel_format.0, descriptor);
    Ok(pixel_format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accelerated_attrib_list_is_zero_terminated_pairs() {
        let list = accelerated_attrib_list();
        assert_eq!(list.len() % 2, 1);
        assert_eq!(*list.last().unwrap(), 0);

        let pairs: Vec<(c_int, c_int)> = list[..list.len() - 1].chunks(2)
                                                               .map(|pair| (pair[0], pair[1]))
                                                               .collect();
        assert!(pairs.contains(&(WGL_SUPPORT_OPENGL_ARB, TRUE)));
        assert!(pairs.contains(&(WGL_DOUBLE_BUFFER_ARB, TRUE)));
        assert!(pairs.contains(&(WGL_ACCELERATION_ARB, WGL_FULL_ACCELERATION_ARB)));
    }

    #[test]
    fn legacy_bootstrap_format_is_double_buffered_rgba32() {
        let descriptor = PixelFormatDescriptor::legacy_bootstrap();
        assert_eq!(descriptor.color_bits, 32);
        assert_eq!(descriptor.depth_bits, 24);
        assert_eq!(descriptor.stencil_bits, 8);
        assert!(descriptor.flags.contains(PixelFormatFlags::DOUBLE_BUFFER |
                                          PixelFormatFlags::SUPPORT_OPENGL));
        assert!(!descriptor.is_generic());
    }
}
