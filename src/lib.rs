// glbridge/src/lib.rs
//
//! Off-screen OpenGL context management for Windows.
//!
//! This crate creates, shares and destroys hardware-accelerated WGL contexts, each living on its
//! own hidden window, and resolves the function pointers needed to go beyond OpenGL 1.1: the ARB
//! context creation extensions, the full GL function table and the optional
//! `WGL_NV_DX_interop` entry points used to share resources with Direct3D.
//!
//! It is intended as the native half of a toolkit that wants to render into off-screen surfaces
//! without going through its own windowing pipeline. It does not manage surfaces or swap chains,
//! only contexts and their interop handles.
//!
//! All native calls go through the [`Driver`] trait. On Windows the real implementation is
//! `platform::windows::wgl::WglDriver`; a simulated driver is available for tests behind the
//! `test-driver` feature.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod platform;
pub use crate::platform::{Driver, ModuleHandle, SurfaceHandle, WindowHandle};

pub mod error;
pub use crate::error::{BootstrapPhase, Error, WindowingApiError};

mod context;
pub use crate::context::{AsNativeContext, Context, ContextAttributeFlags, ContextAttributes};
pub use crate::context::{ContextID, NativeContextHandle, WrappedContext};

mod device;
pub use crate::device::{Device, DeviceDescriptor};

mod info;
pub use crate::info::{GLProfile, GLVersion};

mod interop;
pub use crate::interop::{DXInterop, InteropAccess, InteropDeviceHandle, InteropObjectHandle};

mod pixel_format;
pub use crate::pixel_format::{PixelFormat, PixelFormatDescriptor, PixelFormatFlags};

mod registry;
pub use crate::registry::ContextRegistry;

mod bootstrap;
mod executor;
mod extensions;

/// The OpenGL function table resolved during initialization.
#[allow(clippy::all, missing_docs, non_camel_case_types, non_snake_case, non_upper_case_globals)]
#[allow(dead_code, unused_imports)]
pub mod gl {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

#[cfg(test)]
mod tests;
