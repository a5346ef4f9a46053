// glbridge/src/platform/windows/wgl/mod.rs
//
//! A backend using the native Windows OpenGL WGL API.

mod driver;
pub use self::driver::WglDriver;
