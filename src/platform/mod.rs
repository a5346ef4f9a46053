// glbridge/src/platform/mod.rs
//
//! Platform-specific backends, and the native API surface they implement.

use crate::pixel_format::{PixelFormat, PixelFormatDescriptor};
use crate::{NativeContextHandle, WindowingApiError};

use euclid::default::Size2D;
use std::ffi::CStr;
use std::os::raw::c_void;

pub mod generic;

#[cfg(windows)]
pub mod windows;

/// An opaque module handle (`HINSTANCE`) that owns the hidden window class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModuleHandle(pub usize);

/// An opaque native window handle (`HWND`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub usize);

/// An opaque device context handle (`HDC`): the drawable a context renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub usize);

impl SurfaceHandle {
    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }
}

/// The window system and WGL entry points this crate is built on.
///
/// Every method is a thin mapping of one native call. Context creation beyond the legacy path
/// goes through extension entry points obtained from `get_proc_address`, not through this trait.
///
/// Implementations must be shareable across threads: the bootstrap runs on a worker thread.
pub trait Driver: Send + Sync + 'static {
    /// Registers the hidden window class. Succeeds if the class already exists.
    fn register_window_class(&self, module: Option<ModuleHandle>, class_name: &CStr)
                             -> Result<(), WindowingApiError>;

    /// Creates an invisible window of the registered class.
    fn create_hidden_window(&self,
                            module: Option<ModuleHandle>,
                            class_name: &CStr,
                            size: Size2D<i32>)
                            -> Result<WindowHandle, WindowingApiError>;

    /// Destroys `window`. Only the thread that created a window can destroy it.
    fn destroy_window(&self, window: WindowHandle) -> Result<(), WindowingApiError>;

    /// Acquires the device context of `window`.
    fn get_surface(&self, window: WindowHandle) -> Result<SurfaceHandle, WindowingApiError>;

    fn release_surface(&self, window: WindowHandle, surface: SurfaceHandle);

    /// Chooses a pixel format through the legacy, non-extension path.
    fn choose_pixel_format(&self, surface: SurfaceHandle, descriptor: &PixelFormatDescriptor)
                           -> Result<PixelFormat, WindowingApiError>;

    fn describe_pixel_format(&self, surface: SurfaceHandle, pixel_format: PixelFormat)
                             -> Result<PixelFormatDescriptor, WindowingApiError>;

    fn set_pixel_format(&self,
                        surface: SurfaceHandle,
                        pixel_format: PixelFormat,
                        descriptor: &PixelFormatDescriptor)
                        -> Result<(), WindowingApiError>;

    /// Creates a context through `wglCreateContext`, with whatever version the driver picks.
    fn create_legacy_context(&self, surface: SurfaceHandle)
                             -> Result<NativeContextHandle, WindowingApiError>;

    fn delete_context(&self, context: NativeContextHandle) -> Result<(), WindowingApiError>;

    /// Binds `target` to the calling thread, or unbinds the current context if `None`.
    fn make_current(&self, target: Option<(SurfaceHandle, NativeContextHandle)>)
                    -> Result<(), WindowingApiError>;

    /// The context current on the calling thread.
    fn current_context(&self) -> Option<NativeContextHandle>;

    /// Looks up an entry point by name. Returns null if the symbol is unknown.
    ///
    /// Extension entry points only resolve while a context is current on the calling thread.
    fn get_proc_address(&self, symbol_name: &CStr) -> *const c_void;

    /// The error reported by the last failing native call on this thread.
    fn last_error(&self) -> WindowingApiError;
}
