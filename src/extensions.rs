// glbridge/src/extensions.rs
//
//! WGL extension entry points and the tables they are resolved into.

use crate::gl::types::{GLenum, GLint, GLuint};
use crate::gl::Gl;
use crate::platform::Driver;
use crate::Error;

use std::ffi::{CStr, CString};
use std::mem;
use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::ptr;

pub(crate) const WGL_ACCELERATION_ARB:          c_int = 0x2003;
pub(crate) const WGL_SUPPORT_OPENGL_ARB:        c_int = 0x2010;
pub(crate) const WGL_DOUBLE_BUFFER_ARB:         c_int = 0x2011;
pub(crate) const WGL_FULL_ACCELERATION_ARB:     c_int = 0x2027;
pub(crate) const WGL_CONTEXT_MAJOR_VERSION_ARB: c_int = 0x2091;
pub(crate) const WGL_CONTEXT_MINOR_VERSION_ARB: c_int = 0x2092;
pub(crate) const WGL_CONTEXT_FLAGS_ARB:         c_int = 0x2094;
pub(crate) const WGL_CONTEXT_PROFILE_MASK_ARB:  c_int = 0x9126;

pub(crate) const WGL_CONTEXT_DEBUG_BIT_ARB:                 c_int = 0x0001;
pub(crate) const WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB:    c_int = 0x0002;
pub(crate) const WGL_CONTEXT_CORE_PROFILE_BIT_ARB:          c_int = 0x0001;
pub(crate) const WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB: c_int = 0x0002;

pub(crate) const TRUE: c_int = 1;
pub(crate) const FALSE: c_int = 0;

pub(crate) type ChoosePixelFormatARBFn = unsafe extern "system" fn(hdc: *mut c_void,
                                                                  piAttribIList: *const c_int,
                                                                  pfAttribFList: *const f32,
                                                                  nMaxFormats: c_uint,
                                                                  piFormats: *mut c_int,
                                                                  nNumFormats: *mut c_uint)
                                                                  -> c_int;
pub(crate) type CreateContextAttribsARBFn = unsafe extern "system" fn(hDC: *mut c_void,
                                                                     shareContext: *mut c_void,
                                                                     attribList: *const c_int)
                                                                     -> *mut c_void;
pub(crate) type GetStringFn = unsafe extern "system" fn(name: GLenum) -> *const c_char;

pub(crate) type DXOpenDeviceNVFn = unsafe extern "system" fn(dxDevice: *mut c_void)
                                                            -> *mut c_void;
pub(crate) type DXCloseDeviceNVFn = unsafe extern "system" fn(hDevice: *mut c_void) -> c_int;
pub(crate) type DXRegisterObjectNVFn = unsafe extern "system" fn(hDevice: *mut c_void,
                                                                dxObject: *mut c_void,
                                                                name: GLuint,
                                                                object_type: GLenum,
                                                                access: GLenum)
                                                                -> *mut c_void;
pub(crate) type DXUnregisterObjectNVFn = unsafe extern "system" fn(hDevice: *mut c_void,
                                                                  hObject: *mut c_void)
                                                                  -> c_int;
pub(crate) type DXObjectAccessNVFn = unsafe extern "system" fn(hObject: *mut c_void,
                                                              access: GLenum)
                                                              -> c_int;
pub(crate) type DXLockObjectsNVFn = unsafe extern "system" fn(hDevice: *mut c_void,
                                                             count: GLint,
                                                             hObjects: *mut *mut c_void)
                                                             -> c_int;
pub(crate) type DXSetResourceShareHandleNVFn = unsafe extern "system" fn(dxObject: *mut c_void,
                                                                        shareHandle: *mut c_void)
                                                                        -> c_int;

/// The two entry points resolved by the first bootstrap phase.
#[allow(non_snake_case)]
#[derive(Clone, Copy)]
pub(crate) struct ContextCreationFunctions {
    pub(crate) ChoosePixelFormatARB: ChoosePixelFormatARBFn,
    pub(crate) CreateContextAttribsARB: CreateContextAttribsARBFn,
}

/// The `WGL_NV_DX_interop` entry points. Present only if every one of them resolved.
#[allow(non_snake_case)]
#[derive(Clone, Copy)]
pub(crate) struct DXInteropFunctions {
    pub(crate) DXOpenDeviceNV: DXOpenDeviceNVFn,
    pub(crate) DXCloseDeviceNV: DXCloseDeviceNVFn,
    pub(crate) DXRegisterObjectNV: DXRegisterObjectNVFn,
    pub(crate) DXUnregisterObjectNV: DXUnregisterObjectNVFn,
    pub(crate) DXObjectAccessNV: DXObjectAccessNVFn,
    pub(crate) DXLockObjectsNV: DXLockObjectsNVFn,
    pub(crate) DXUnlockObjectsNV: DXLockObjectsNVFn,
    pub(crate) DXSetResourceShareHandleNV: DXSetResourceShareHandleNVFn,
}

/// Everything resolved by the second bootstrap phase.
pub(crate) struct GLFunctions {
    pub(crate) gl: Gl,
    pub(crate) dx_interop: Option<DXInteropFunctions>,
}

// The table only holds function addresses, which are valid on every thread once resolved.
unsafe impl Send for GLFunctions {}
unsafe impl Sync for GLFunctions {}

impl ContextCreationFunctions {
    /// Resolves the ARB entry points. A context must be current on the calling thread.
    pub(crate) fn resolve<D: Driver>(driver: &D) -> Result<ContextCreationFunctions, Error> {
        let choose_pixel_format = driver.get_proc_address(c"wglChoosePixelFormatARB");
        let create_context_attribs = driver.get_proc_address(c"wglCreateContextAttribsARB");
        if choose_pixel_format.is_null() || create_context_attribs.is_null() {
            return Err(Error::RequiredExtensionUnavailable);
        }

        unsafe {
            Ok(ContextCreationFunctions {
                ChoosePixelFormatARB: mem::transmute::<*const c_void, ChoosePixelFormatARBFn>(
                    choose_pixel_format),
                CreateContextAttribsARB:
                    mem::transmute::<*const c_void, CreateContextAttribsARBFn>(
                        create_context_attribs),
            })
        }
    }
}

impl DXInteropFunctions {
    /// Resolves the interop entry points, or returns `None` if any of them is missing.
    pub(crate) fn resolve<D: Driver>(driver: &D) -> Option<DXInteropFunctions> {
        let lookup = |name: &CStr| {
            let address = driver.get_proc_address(name);
            if address.is_null() {
                debug!("glbridge: {:?} is unavailable", name);
                None
            } else {
                Some(address)
            }
        };

        let open_device = lookup(c"wglDXOpenDeviceNV");
        let close_device = lookup(c"wglDXCloseDeviceNV");
        let register_object = lookup(c"wglDXRegisterObjectNV");
        let unregister_object = lookup(c"wglDXUnregisterObjectNV");
        let object_access = lookup(c"wglDXObjectAccessNV");
        let lock_objects = lookup(c"wglDXLockObjectsNV");
        let unlock_objects = lookup(c"wglDXUnlockObjectsNV");
        let set_resource_share_handle = lookup(c"wglDXSetResourceShareHandleNV");

        unsafe {
            Some(DXInteropFunctions {
                DXOpenDeviceNV: mem::transmute::<*const c_void, DXOpenDeviceNVFn>(open_device?),
                DXCloseDeviceNV: mem::transmute::<*const c_void, DXCloseDeviceNVFn>(
                    close_device?),
                DXRegisterObjectNV: mem::transmute::<*const c_void, DXRegisterObjectNVFn>(
                    register_object?),
                DXUnregisterObjectNV: mem::transmute::<*const c_void, DXUnregisterObjectNVFn>(
                    unregister_object?),
                DXObjectAccessNV: mem::transmute::<*const c_void, DXObjectAccessNVFn>(
                    object_access?),
                DXLockObjectsNV: mem::transmute::<*const c_void, DXLockObjectsNVFn>(
                    lock_objects?),
                DXUnlockObjectsNV: mem::transmute::<*const c_void, DXLockObjectsNVFn>(
                    unlock_objects?),
                DXSetResourceShareHandleNV:
                    mem::transmute::<*const c_void, DXSetResourceShareHandleNVFn>(
                        set_resource_share_handle?),
            })
        }
    }
}

impl GLFunctions {
    /// Loads the GL function table and the optional interop entry points from the context that is
    /// current on the calling thread.
    pub(crate) fn resolve<D: Driver>(driver: &D) -> GLFunctions {
        let gl = Gl::load_with(|symbol_name| get_proc_address(driver, symbol_name));
        let dx_interop = DXInteropFunctions::resolve(driver);
        if dx_interop.is_none() {
            debug!("glbridge: WGL_NV_DX_interop is not supported by this driver");
        }
        GLFunctions { gl, dx_interop }
    }
}

fn get_proc_address<D: Driver>(driver: &D, symbol_name: &str) -> *const c_void {
    match CString::new(symbol_name) {
        Ok(symbol_name) => driver.get_proc_address(&symbol_name),
        Err(_) => ptr::null(),
    }
}

/// Logs version, vendor and renderer of the context current on this thread.
pub(crate) fn log_current_context_info<D: Driver>(driver: &D, label: &str) {
    if !log_enabled!(log::Level::Debug) {
        return;
    }

    let get_string = driver.get_proc_address(c"glGetString");
    if get_string.is_null() {
        debug!("glbridge: {}: glGetString is unavailable", label);
        return;
    }

    unsafe {
        let get_string = mem::transmute::<*const c_void, GetStringFn>(get_string);
        let describe = |name: GLenum| {
            let string = get_string(name);
            if string.is_null() {
                "<unknown>".to_owned()
            } else {
                CStr::from_ptr(string).to_string_lossy().into_owned()
            }
        };
        debug!("glbridge: OpenGL context information \"{}\"", label);
        debug!("glbridge:   Version: {}", describe(crate::gl::VERSION));
        debug!("glbridge:   Vendor: {}", describe(crate::gl::VENDOR));
        debug!("glbridge:   Renderer: {}", describe(crate::gl::RENDERER));
    }
}
