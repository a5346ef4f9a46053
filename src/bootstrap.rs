// glbridge/src/bootstrap.rs
//
//! The two-phase bootstrap that resolves extension entry points, and the RAII guards shared with
//! context creation.
//!
//! WGL only hands out extension entry points while a context is current, and the modern context
//! creation function is itself an extension. So the first phase creates a throwaway legacy
//! context purely to look up `wglChoosePixelFormatARB` and `wglCreateContextAttribsARB`; the
//! second phase uses those to create a real versioned context and loads everything else from it.

use crate::extensions::{self, ContextCreationFunctions, GLFunctions};
use crate::pixel_format::{self, PixelFormatDescriptor};
use crate::platform::{Driver, ModuleHandle, SurfaceHandle, WindowHandle};
use crate::{ContextAttributes, Error, NativeContextHandle};

use euclid::default::Size2D;
use std::ffi::CStr;

/// Where bootstrap windows come from, and what the second phase asks for.
pub(crate) struct BootstrapParams<'a> {
    pub(crate) module: Option<ModuleHandle>,
    pub(crate) window_class_name: &'a CStr,
    pub(crate) hidden_window_size: Size2D<i32>,
    pub(crate) attributes: ContextAttributes,
}

/// Phase one. Must run on a thread with no context of its own worth preserving.
pub(crate) fn load_context_creation_functions<D>(driver: &D, params: &BootstrapParams)
                                                 -> Result<ContextCreationFunctions, Error>
                                                 where D: Driver {
    driver.register_window_class(params.module, params.window_class_name)
          .map_err(Error::WindowClassRegistrationFailed)?;

    let window = HiddenWindow::new(driver,
                                   params.module,
                                   params.window_class_name,
                                   params.hidden_window_size)?;
    let surface = window.surface()?;

    let requested_format = PixelFormatDescriptor::legacy_bootstrap();
    let pixel_format = driver.choose_pixel_format(surface.handle(), &requested_format)
                             .map_err(Error::PixelFormatSelectionFailed)?;
    driver.set_pixel_format(surface.handle(), pixel_format, &requested_format)
          .map_err(Error::SetPixelFormatFailed)?;

    let context = OwnedNativeContext::new(driver,
                                          driver.create_legacy_context(surface.handle())
                                                .map_err(Error::ContextCreationFailed)?);
    let _current = CurrentContextGuard::new(driver, surface.handle(), context.handle())?;

    extensions::log_current_context_info(driver, "Dummy Context");
    let functions = ContextCreationFunctions::resolve(driver)?;
    debug!("glbridge: resolved the ARB context creation entry points");
    Ok(functions)
}

/// Phase two. Needs the entry points from phase one.
pub(crate) fn load_gl_functions<D>(driver: &D,
                                   functions: &ContextCreationFunctions,
                                   params: &BootstrapParams)
                                   -> Result<GLFunctions, Error>
                                   where D: Driver {
    let window = HiddenWindow::new(driver,
                                   params.module,
                                   params.window_class_name,
                                   params.hidden_window_size)?;
    let surface = window.surface()?;
    pixel_format::negotiate_pixel_format(driver, functions, surface.handle())?;

    let context = OwnedNativeContext::new(driver,
                                          create_context_attribs(driver,
                                                                 functions,
                                                                 surface.handle(),
                                                                 None,
                                                                 &params.attributes)?);
    let _current = CurrentContextGuard::new(driver, surface.handle(), context.handle())?;

    extensions::log_current_context_info(driver, "Function Pointer Resolving Context");
    Ok(GLFunctions::resolve(driver))
}

/// Calls `wglCreateContextAttribsARB` on `surface`, whose pixel format must already be set.
pub(crate) fn create_context_attribs<D>(driver: &D,
                                        functions: &ContextCreationFunctions,
                                        surface: SurfaceHandle,
                                        share_with: Option<NativeContextHandle>,
                                        attributes: &ContextAttributes)
                                        -> Result<NativeContextHandle, Error>
                                        where D: Driver {
    #[allow(non_snake_case)]
    let wglCreateContextAttribsARB = functions.CreateContextAttribsARB;

    let share_context = share_with.map_or(std::ptr::null_mut(), NativeContextHandle::as_ptr);
    let attrib_list = attributes.to_wgl_attrib_list();
    let glrc = unsafe {
        wglCreateContextAttribsARB(surface.as_ptr(), share_context, attrib_list.as_ptr())
    };
    if glrc.is_null() {
        return Err(Error::ContextCreationFailed(driver.last_error()));
    }
    Ok(NativeContextHandle::from_ptr(glrc))
}

/// A hidden window, destroyed when dropped unless released with `into_handle()`.
pub(crate) struct HiddenWindow<'a, D: Driver> {
    driver: &'a D,
    window: Option<WindowHandle>,
}

impl<'a, D: Driver> HiddenWindow<'a, D> {
    pub(crate) fn new(driver: &'a D,
                      module: Option<ModuleHandle>,
                      class_name: &CStr,
                      size: Size2D<i32>)
                      -> Result<HiddenWindow<'a, D>, Error> {
        let window = driver.create_hidden_window(module, class_name, size)
                           .map_err(Error::WindowCreationFailed)?;
        Ok(HiddenWindow { driver, window: Some(window) })
    }

    /// Acquires the window's device context. Drop the returned guard before the window.
    pub(crate) fn surface(&self) -> Result<SurfaceGuard<'a, D>, Error> {
        let window = self.handle();
        let surface = self.driver.get_surface(window).map_err(Error::SurfaceAcquisitionFailed)?;
        Ok(SurfaceGuard { driver: self.driver, window, surface: Some(surface) })
    }

    #[inline]
    pub(crate) fn handle(&self) -> WindowHandle {
        self.window.expect("Window already released!")
    }

    pub(crate) fn into_handle(mut self) -> WindowHandle {
        self.window.take().expect("Window already released!")
    }
}

impl<'a, D: Driver> Drop for HiddenWindow<'a, D> {
    fn drop(&mut self) {
        if let Some(window) = self.window.take() {
            if let Err(err) = self.driver.destroy_window(window) {
                warn!("glbridge: failed to destroy hidden window {:#x}: {}", window.0, err);
            }
        }
    }
}

/// A device context, released when dropped unless released with `into_handle()`.
pub(crate) struct SurfaceGuard<'a, D: Driver> {
    driver: &'a D,
    window: WindowHandle,
    surface: Option<SurfaceHandle>,
}

impl<'a, D: Driver> SurfaceGuard<'a, D> {
    #[inline]
    pub(crate) fn handle(&self) -> SurfaceHandle {
        self.surface.expect("Surface already released!")
    }

    pub(crate) fn into_handle(mut self) -> SurfaceHandle {
        self.surface.take().expect("Surface already released!")
    }
}

impl<'a, D: Driver> Drop for SurfaceGuard<'a, D> {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.take() {
            self.driver.release_surface(self.window, surface);
        }
    }
}

/// A bootstrap context, deleted when dropped.
struct OwnedNativeContext<'a, D: Driver> {
    driver: &'a D,
    context: NativeContextHandle,
}

impl<'a, D: Driver> OwnedNativeContext<'a, D> {
    fn new(driver: &'a D, context: NativeContextHandle) -> OwnedNativeContext<'a, D> {
        OwnedNativeContext { driver, context }
    }

    #[inline]
    fn handle(&self) -> NativeContextHandle {
        self.context
    }
}

impl<'a, D: Driver> Drop for OwnedNativeContext<'a, D> {
    fn drop(&mut self) {
        if let Err(err) = self.driver.delete_context(self.context) {
            warn!("glbridge: failed to delete bootstrap context: {}", err);
        }
    }
}

/// Keeps a context current for its lifetime and leaves no context current afterwards.
#[must_use]
struct CurrentContextGuard<'a, D: Driver> {
    driver: &'a D,
}

impl<'a, D: Driver> CurrentContextGuard<'a, D> {
    fn new(driver: &'a D, surface: SurfaceHandle, context: NativeContextHandle)
           -> Result<CurrentContextGuard<'a, D>, Error> {
        driver.make_current(Some((surface, context))).map_err(Error::MakeCurrentFailed)?;
        Ok(CurrentContextGuard { driver })
    }
}

impl<'a, D: Driver> Drop for CurrentContextGuard<'a, D> {
    fn drop(&mut self) {
        drop(self.driver.make_current(None));
    }
}
