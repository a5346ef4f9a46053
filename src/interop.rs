// glbridge/src/interop.rs
//
//! Thin wrappers over the `WGL_NV_DX_interop` entry points.
//!
//! These let a Direct3D 9 device share textures and render targets with OpenGL contexts created by
//! this crate. Every method forwards to the driver unchanged; the only additions are typed
//! handles and turning failure results into errors.

use crate::error::{self, Error};
use crate::extensions::{DXInteropFunctions, FALSE};
use crate::gl::types::{GLenum, GLint, GLuint};
use crate::platform::Driver;

use std::os::raw::{c_int, c_void};

/// A handle returned by `wglDXOpenDeviceNV`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InteropDeviceHandle(pub usize);

/// A handle returned by `wglDXRegisterObjectNV`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InteropObjectHandle(pub usize);

impl InteropDeviceHandle {
    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }
}

impl InteropObjectHandle {
    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }
}

/// How OpenGL will access a registered object (`WGL_ACCESS_*_NV`).
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteropAccess {
    ReadOnly = 0,
    ReadWrite = 1,
    WriteDiscard = 2,
}

impl InteropAccess {
    #[inline]
    fn to_gl(self) -> GLenum {
        self as GLenum
    }
}

/// The resolved interop entry points. Obtained from `Device::dx_interop()`.
pub struct DXInterop<'a, D: Driver> {
    driver: &'a D,
    functions: &'a DXInteropFunctions,
}

impl<'a, D: Driver> DXInterop<'a, D> {
    pub(crate) fn new(driver: &'a D, functions: &'a DXInteropFunctions) -> DXInterop<'a, D> {
        DXInterop { driver, functions }
    }

    /// Prepares a Direct3D device for interop.
    ///
    /// # Safety
    ///
    /// `dx_device` must be a valid `IDirect3DDevice9`. A context created by this crate must be
    /// current.
    pub unsafe fn open_device(&self, dx_device: *mut c_void)
                              -> Result<InteropDeviceHandle, Error> {
        let device = (self.functions.DXOpenDeviceNV)(dx_device);
        debug!("glbridge: wglDXOpenDeviceNV({:?}) = {:?}", dx_device, device);
        if device.is_null() {
            return Err(self.call_failed("wglDXOpenDeviceNV"));
        }
        Ok(InteropDeviceHandle(device as usize))
    }

    /// # Safety
    ///
    /// `device` must have been returned by `open_device()` and not closed since.
    pub unsafe fn close_device(&self, device: InteropDeviceHandle) -> Result<(), Error> {
        let ok = (self.functions.DXCloseDeviceNV)(device.as_ptr());
        debug!("glbridge: wglDXCloseDeviceNV({:#x}) = {}", device.0, ok);
        self.check(ok, "wglDXCloseDeviceNV")
    }

    /// Associates a shared resource handle with a Direct3D resource. Must be called before the
    /// resource is registered.
    ///
    /// # Safety
    ///
    /// `dx_object` must be a valid Direct3D resource and `share_handle` the handle it was created
    /// with.
    pub unsafe fn set_resource_share_handle(&self,
                                            dx_object: *mut c_void,
                                            share_handle: *mut c_void)
                                            -> Result<(), Error> {
        let ok = (self.functions.DXSetResourceShareHandleNV)(dx_object, share_handle);
        debug!("glbridge: wglDXSetResourceShareHandleNV({:?}, {:?}) = {}",
               dx_object,
               share_handle,
               ok);
        self.check(ok, "wglDXSetResourceShareHandleNV")
    }

    /// Binds a Direct3D resource to the GL object `name` of type `object_type`.
    ///
    /// # Safety
    ///
    /// `device` must be open and `dx_object` a valid resource of that device. `name` must be a
    /// texture or renderbuffer name in the current context's share group.
    pub unsafe fn register_object(&self,
                                  device: InteropDeviceHandle,
                                  dx_object: *mut c_void,
                                  name: GLuint,
                                  object_type: GLenum,
                                  access: InteropAccess)
                                  -> Result<InteropObjectHandle, Error> {
        let object = (self.functions.DXRegisterObjectNV)(device.as_ptr(),
                                                         dx_object,
                                                         name,
                                                         object_type,
                                                         access.to_gl());
        debug!("glbridge: wglDXRegisterObjectNV({:#x}, {:?}, {}, {:#x}, {:?}) = {:?}",
               device.0,
               dx_object,
               name,
               object_type,
               access,
               object);
        if object.is_null() {
            return Err(self.call_failed("wglDXRegisterObjectNV"));
        }
        Ok(InteropObjectHandle(object as usize))
    }

    /// # Safety
    ///
    /// `object` must have been registered on `device` and must not be locked.
    pub unsafe fn unregister_object(&self,
                                    device: InteropDeviceHandle,
                                    object: InteropObjectHandle)
                                    -> Result<(), Error> {
        let ok = (self.functions.DXUnregisterObjectNV)(device.as_ptr(), object.as_ptr());
        debug!("glbridge: wglDXUnregisterObjectNV({:#x}, {:#x}) = {}", device.0, object.0, ok);
        self.check(ok, "wglDXUnregisterObjectNV")
    }

    /// Changes the access mode of a registered object.
    ///
    /// # Safety
    ///
    /// `object` must be registered and unlocked.
    pub unsafe fn object_access(&self, object: InteropObjectHandle, access: InteropAccess)
                                -> Result<(), Error> {
        let ok = (self.functions.DXObjectAccessNV)(object.as_ptr(), access.to_gl());
        debug!("glbridge: wglDXObjectAccessNV({:#x}, {:?}) = {}", object.0, access, ok);
        self.check(ok, "wglDXObjectAccessNV")
    }

    /// Hands `objects` over to OpenGL. Either all of them are locked or none is.
    ///
    /// # Safety
    ///
    /// Every object must be registered on `device`.
    pub unsafe fn lock_objects(&self,
                               device: InteropDeviceHandle,
                               objects: &mut [InteropObjectHandle])
                               -> Result<(), Error> {
        let ok = (self.functions.DXLockObjectsNV)(device.as_ptr(),
                                                  objects.len() as GLint,
                                                  objects.as_mut_ptr() as *mut *mut c_void);
        debug!("glbridge: wglDXLockObjectsNV({:#x}, {:?}) = {}", device.0, objects, ok);
        self.check(ok, "wglDXLockObjectsNV")
    }

    /// Hands `objects` back to Direct3D.
    ///
    /// # Safety
    ///
    /// Every object must be registered on `device` and currently locked.
    pub unsafe fn unlock_objects(&self,
                                 device: InteropDeviceHandle,
                                 objects: &mut [InteropObjectHandle])
                                 -> Result<(), Error> {
        let ok = (self.functions.DXUnlockObjectsNV)(device.as_ptr(),
                                                    objects.len() as GLint,
                                                    objects.as_mut_ptr() as *mut *mut c_void);
        debug!("glbridge: wglDXUnlockObjectsNV({:#x}, {:?}) = {}", device.0, objects, ok);
        self.check(ok, "wglDXUnlockObjectsNV")
    }

    fn check(&self, ok: c_int, name: &'static str) -> Result<(), Error> {
        if ok == FALSE {
            Err(self.call_failed(name))
        } else {
            Ok(())
        }
    }

    fn call_failed(&self, name: &'static str) -> Error {
        error::record(Error::DXInteropCallFailed(name, self.driver.last_error()))
    }
}
