// glbridge/src/context.rs
//
//! Context types shared by all drivers.

use crate::extensions::{WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB, WGL_CONTEXT_CORE_PROFILE_BIT_ARB};
use crate::extensions::{WGL_CONTEXT_DEBUG_BIT_ARB, WGL_CONTEXT_FLAGS_ARB};
use crate::extensions::{WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB, WGL_CONTEXT_MAJOR_VERSION_ARB};
use crate::extensions::{WGL_CONTEXT_MINOR_VERSION_ARB, WGL_CONTEXT_PROFILE_MASK_ARB};
use crate::info::{GLProfile, GLVersion};
use crate::platform::{SurfaceHandle, WindowHandle};
use crate::registry::ContextRegistry;

use std::fmt::{self, Debug, Formatter};
use std::os::raw::{c_int, c_void};
use std::sync::Arc;
use std::thread;

/// Identifies a context created by a `Device`. Allocated by the context registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextID(pub u64);

/// An opaque native rendering context handle (`HGLRC`).
///
/// This is the value exchanged with callers on the other side of a binding, as a 64-bit integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NativeContextHandle(u64);

impl NativeContextHandle {
    #[inline]
    pub fn from_u64(handle: u64) -> NativeContextHandle {
        NativeContextHandle(handle)
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_ptr(glrc: *mut c_void) -> NativeContextHandle {
        NativeContextHandle(glrc as usize as u64)
    }

    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0 as usize as *mut c_void
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

bitflags! {
    /// Flags passed through `WGL_CONTEXT_FLAGS_ARB`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ContextAttributeFlags: u8 {
        const DEBUG              = 0x01;
        const FORWARD_COMPATIBLE = 0x02;
    }
}

/// What to ask `wglCreateContextAttribsARB` for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextAttributes {
    pub version: GLVersion,
    pub profile: GLProfile,
    pub flags: ContextAttributeFlags,
}

impl ContextAttributes {
    #[inline]
    pub fn new(version: GLVersion, profile: GLProfile, flags: ContextAttributeFlags)
               -> ContextAttributes {
        ContextAttributes { version, profile, flags }
    }

    /// The zero-terminated `WGL_CONTEXT_*_ARB` attribute list.
    pub(crate) fn to_wgl_attrib_list(&self) -> [c_int; 9] {
        let mut wgl_flags = 0;
        if self.flags.contains(ContextAttributeFlags::DEBUG) {
            wgl_flags |= WGL_CONTEXT_DEBUG_BIT_ARB;
        }
        if self.flags.contains(ContextAttributeFlags::FORWARD_COMPATIBLE) {
            wgl_flags |= WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB;
        }
        let profile_mask = match self.profile {
            GLProfile::Core => WGL_CONTEXT_CORE_PROFILE_BIT_ARB,
            GLProfile::Compatibility => WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB,
        };

        [
            WGL_CONTEXT_MAJOR_VERSION_ARB, self.version.major as c_int,
            WGL_CONTEXT_MINOR_VERSION_ARB, self.version.minor as c_int,
            WGL_CONTEXT_FLAGS_ARB,         wgl_flags,
            WGL_CONTEXT_PROFILE_MASK_ARB,  profile_mask,
            0,
        ]
    }
}

/// Anything that names a native context: something that can be shared with, exported, or
/// checked for currency.
pub trait AsNativeContext {
    fn native_context(&self) -> NativeContextHandle;
}

/// A context created by a `Device`, together with the hidden window and device context it
/// renders into.
///
/// Contexts must be destroyed with `Device::destroy_context()`; dropping one that is still alive
/// panics. The hidden window belongs to the thread that created the context, so that is the
/// thread it has to be destroyed on.
pub struct Context {
    pub(crate) id: ContextID,
    pub(crate) registry: Arc<ContextRegistry>,
    pub(crate) window: WindowHandle,
    pub(crate) surface: SurfaceHandle,
    pub(crate) native_context: NativeContextHandle,
    pub(crate) attributes: ContextAttributes,
    pub(crate) destroyed: bool,
}

impl Context {
    #[inline]
    pub fn id(&self) -> ContextID {
        self.id
    }

    #[inline]
    pub fn attributes(&self) -> &ContextAttributes {
        &self.attributes
    }

    #[inline]
    pub fn window(&self) -> WindowHandle {
        self.window
    }

    #[inline]
    pub fn surface(&self) -> SurfaceHandle {
        self.surface
    }
}

impl AsNativeContext for Context {
    #[inline]
    fn native_context(&self) -> NativeContextHandle {
        debug_assert!(!self.destroyed);
        self.native_context
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Context({}, {:#x})", self.id.0, self.native_context.as_u64())
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if !self.destroyed && !thread::panicking() {
            panic!("Should have destroyed the context first with `destroy_context()`!")
        }
    }
}

/// A context adopted from a native handle created elsewhere.
///
/// No window or device context is associated with it and it is not registered, so it never shows
/// up in `Device::current_context()`. It can't be made current or destroyed through this crate;
/// its lifetime belongs to whoever created it. It can be used as a share source and checked with
/// `Device::is_context_current()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrappedContext {
    native_context: NativeContextHandle,
}

impl WrappedContext {
    #[inline]
    pub fn new(native_context: NativeContextHandle) -> WrappedContext {
        WrappedContext { native_context }
    }
}

impl AsNativeContext for WrappedContext {
    #[inline]
    fn native_context(&self) -> NativeContextHandle {
        self.native_context
    }
}
