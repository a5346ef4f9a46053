// glbridge/src/platform/windows/wgl/driver.rs
//
//! The window system and WGL calls behind `Driver`.

use crate::pixel_format::{PixelFormat, PixelFormatDescriptor, PixelFormatFlags};
use crate::platform::{Driver, ModuleHandle, SurfaceHandle, WindowHandle};
use crate::{NativeContextHandle, WindowingApiError};

use euclid::default::Size2D;
use std::ffi::CStr;
use std::mem;
use std::os::raw::c_void;
use std::ptr;
use winapi::shared::minwindef::{FALSE, HINSTANCE, UINT, WORD};
use winapi::shared::windef::{HDC, HGLRC, HWND};
use winapi::shared::winerror::ERROR_CLASS_ALREADY_EXISTS;
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::libloaderapi;
use winapi::um::wingdi::{self, wglCreateContext, wglDeleteContext, wglGetCurrentContext};
use winapi::um::wingdi::{wglGetProcAddress, wglMakeCurrent, PFD_MAIN_PLANE, PFD_TYPE_RGBA};
use winapi::um::wingdi::PIXELFORMATDESCRIPTOR;
use winapi::um::winuser::{self, CS_HREDRAW, CS_OWNDC, CS_VREDRAW, WNDCLASSA};
use winapi::um::winuser::{WS_CLIPCHILDREN, WS_CLIPSIBLINGS};

/// The real driver, backed by `user32`, `gdi32` and `opengl32`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WglDriver;

impl WglDriver {
    #[inline]
    pub fn new() -> WglDriver {
        WglDriver
    }
}

impl Driver for WglDriver {
    fn register_window_class(&self, module: Option<ModuleHandle>, class_name: &CStr)
                             -> Result<(), WindowingApiError> {
        unsafe {
            let instance = module_instance(module);
            let mut window_class: WNDCLASSA = mem::zeroed();
            if winuser::GetClassInfoA(instance, class_name.as_ptr(), &mut window_class) != FALSE {
                return Ok(());
            }

            let window_class = WNDCLASSA {
                style: CS_OWNDC | CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(winuser::DefWindowProcA),
                cbClsExtra: 0,
                cbWndExtra: 0,
                hInstance: instance,
                hIcon: ptr::null_mut(),
                hCursor: ptr::null_mut(),
                hbrBackground: ptr::null_mut(),
                lpszMenuName: ptr::null_mut(),
                lpszClassName: class_name.as_ptr(),
            };
            if winuser::RegisterClassA(&window_class) == 0 {
                // Another thread may have registered it since we looked.
                let code = GetLastError();
                if code == ERROR_CLASS_ALREADY_EXISTS {
                    return Ok(());
                }
                return Err(WindowingApiError::from_win32_code(code));
            }
            debug!("glbridge: registered window class {:?}", class_name);
            Ok(())
        }
    }

    fn create_hidden_window(&self,
                            module: Option<ModuleHandle>,
                            class_name: &CStr,
                            size: Size2D<i32>)
                            -> Result<WindowHandle, WindowingApiError> {
        unsafe {
            let window = winuser::CreateWindowExA(0,
                                                  class_name.as_ptr(),
                                                  class_name.as_ptr(),
                                                  WS_CLIPSIBLINGS | WS_CLIPCHILDREN,
                                                  0,
                                                  0,
                                                  size.width,
                                                  size.height,
                                                  ptr::null_mut(),
                                                  ptr::null_mut(),
                                                  module_instance(module),
                                                  ptr::null_mut());
            if window.is_null() {
                return Err(self.last_error());
            }
            Ok(WindowHandle(window as usize))
        }
    }

    fn destroy_window(&self, window: WindowHandle) -> Result<(), WindowingApiError> {
        unsafe {
            // Fails with `ERROR_ACCESS_DENIED` off the creating thread.
            if winuser::DestroyWindow(window.0 as HWND) == FALSE {
                return Err(self.last_error());
            }
            Ok(())
        }
    }

    fn get_surface(&self, window: WindowHandle) -> Result<SurfaceHandle, WindowingApiError> {
        unsafe {
            let dc = winuser::GetDC(window.0 as HWND);
            if dc.is_null() {
                return Err(self.last_error());
            }
            Ok(SurfaceHandle(dc as usize))
        }
    }

    fn release_surface(&self, window: WindowHandle, surface: SurfaceHandle) {
        unsafe {
            winuser::ReleaseDC(window.0 as HWND, surface.0 as HDC);
        }
    }

    fn choose_pixel_format(&self, surface: SurfaceHandle, descriptor: &PixelFormatDescriptor)
                           -> Result<PixelFormat, WindowingApiError> {
        unsafe {
            let pixel_format_descriptor = to_native_descriptor(descriptor);
            let pixel_format = wingdi::ChoosePixelFormat(surface.0 as HDC,
                                                         &pixel_format_descriptor);
            if pixel_format == 0 {
                return Err(self.last_error());
            }
            Ok(PixelFormat(pixel_format))
        }
    }

    fn describe_pixel_format(&self, surface: SurfaceHandle, pixel_format: PixelFormat)
                             -> Result<PixelFormatDescriptor, WindowingApiError> {
        unsafe {
            let mut pixel_format_descriptor: PIXELFORMATDESCRIPTOR = mem::zeroed();
            let max_pixel_format =
                wingdi::DescribePixelFormat(surface.0 as HDC,
                                            pixel_format.0,
                                            mem::size_of::<PIXELFORMATDESCRIPTOR>() as UINT,
                                            &mut pixel_format_descriptor);
            if max_pixel_format == 0 {
                return Err(self.last_error());
            }
            Ok(from_native_descriptor(&pixel_format_descriptor))
        }
    }

    fn set_pixel_format(&self,
                        surface: SurfaceHandle,
                        pixel_format: PixelFormat,
                        descriptor: &PixelFormatDescriptor)
                        -> Result<(), WindowingApiError> {
        unsafe {
            let pixel_format_descriptor = to_native_descriptor(descriptor);
            if wingdi::SetPixelFormat(surface.0 as HDC,
                                      pixel_format.0,
                                      &pixel_format_descriptor) == FALSE {
                return Err(self.last_error());
            }
            Ok(())
        }
    }

    fn create_legacy_context(&self, surface: SurfaceHandle)
                             -> Result<NativeContextHandle, WindowingApiError> {
        unsafe {
            let glrc = wglCreateContext(surface.0 as HDC);
            if glrc.is_null() {
                return Err(self.last_error());
            }
            Ok(NativeContextHandle::from_ptr(glrc as *mut c_void))
        }
    }

    fn delete_context(&self, context: NativeContextHandle) -> Result<(), WindowingApiError> {
        unsafe {
            if wglDeleteContext(context.as_ptr() as HGLRC) == FALSE {
                return Err(self.last_error());
            }
            Ok(())
        }
    }

    fn make_current(&self, target: Option<(SurfaceHandle, NativeContextHandle)>)
                    -> Result<(), WindowingApiError> {
        let (dc, glrc) = match target {
            Some((surface, context)) => (surface.0 as HDC, context.as_ptr() as HGLRC),
            None => (ptr::null_mut(), ptr::null_mut()),
        };
        unsafe {
            if wglMakeCurrent(dc, glrc) == FALSE {
                return Err(self.last_error());
            }
            Ok(())
        }
    }

    fn current_context(&self) -> Option<NativeContextHandle> {
        unsafe {
            let glrc = wglGetCurrentContext();
            if glrc.is_null() {
                None
            } else {
                Some(NativeContextHandle::from_ptr(glrc as *mut c_void))
            }
        }
    }

    fn get_proc_address(&self, symbol_name: &CStr) -> *const c_void {
        unsafe {
            // Some drivers return small sentinel values instead of null for unknown symbols.
            let address = wglGetProcAddress(symbol_name.as_ptr()) as *const c_void;
            match address as isize {
                0 | 1 | 2 | 3 | -1 => {}
                _ => return address,
            }

            // OpenGL 1.1 entry points are only exported by `opengl32.dll` itself.
            let opengl32 = libloaderapi::GetModuleHandleA(c"opengl32.dll".as_ptr());
            if opengl32.is_null() {
                return ptr::null();
            }
            libloaderapi::GetProcAddress(opengl32, symbol_name.as_ptr()) as *const c_void
        }
    }

    fn last_error(&self) -> WindowingApiError {
        unsafe { WindowingApiError::from_win32_code(GetLastError()) }
    }
}

unsafe fn module_instance(module: Option<ModuleHandle>) -> HINSTANCE {
    match module {
        Some(module) => module.0 as HINSTANCE,
        None => libloaderapi::GetModuleHandleA(ptr::null()),
    }
}

fn to_native_descriptor(descriptor: &PixelFormatDescriptor) -> PIXELFORMATDESCRIPTOR {
    PIXELFORMATDESCRIPTOR {
        nSize: mem::size_of::<PIXELFORMATDESCRIPTOR>() as WORD,
        nVersion: 1,
        dwFlags: descriptor.flags.bits(),
        iPixelType: PFD_TYPE_RGBA,
        cColorBits: descriptor.color_bits,
        cRedBits: 0,
        cRedShift: 0,
        cGreenBits: 0,
        cGreenShift: 0,
        cBlueBits: 0,
        cBlueShift: 0,
        cAlphaBits: descriptor.alpha_bits,
        cAlphaShift: 0,
        cAccumBits: 0,
        cAccumRedBits: 0,
        cAccumGreenBits: 0,
        cAccumBlueBits: 0,
        cAccumAlphaBits: 0,
        cDepthBits: descriptor.depth_bits,
        cStencilBits: descriptor.stencil_bits,
        cAuxBuffers: 0,
        iLayerType: PFD_MAIN_PLANE,
        bReserved: 0,
        dwLayerMask: 0,
        dwVisibleMask: 0,
        dwDamageMask: 0,
    }
}

fn from_native_descriptor(descriptor: &PIXELFORMATDESCRIPTOR) -> PixelFormatDescriptor {
    PixelFormatDescriptor {
        flags: PixelFormatFlags::from_bits_truncate(descriptor.dwFlags),
        color_bits: descriptor.cColorBits,
        alpha_bits: descriptor.cAlphaBits,
        depth_bits: descriptor.cDepthBits,
        stencil_bits: descriptor.cStencilBits,
    }
}
