// glbridge/src/info.rs
//
//! OpenGL information.

/// Describes the OpenGL version that is requested when a context is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GLVersion {
    pub major: u8,
    pub minor: u8,
}

impl GLVersion {
    #[inline]
    pub fn new(major: u8, minor: u8) -> GLVersion {
        GLVersion { major, minor }
    }
}

/// The OpenGL profile requested through `WGL_CONTEXT_PROFILE_MASK_ARB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GLProfile {
    Core,
    Compatibility,
}
