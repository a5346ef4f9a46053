// glbridge/src/error.rs
//
//! Various errors that methods can produce, and the process-wide last-error slot.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::{Mutex, PoisonError};

/// Various errors that methods can produce.
#[derive(Debug)]
pub enum Error {
    /// The context creation entry points have not been resolved yet; call
    /// `Device::initialize()` first.
    NotInitialized,
    /// An extension necessary for this library to function isn't supported.
    RequiredExtensionUnavailable,
    /// The hidden window class couldn't be registered.
    WindowClassRegistrationFailed(WindowingApiError),
    /// The hidden window backing a context couldn't be created.
    WindowCreationFailed(WindowingApiError),
    /// The device context of the hidden window couldn't be acquired.
    SurfaceAcquisitionFailed(WindowingApiError),
    /// Choosing an OpenGL pixel format failed.
    PixelFormatSelectionFailed(WindowingApiError),
    /// The system couldn't find a pixel format matching the requirements.
    NoPixelFormatFound,
    /// The only matching pixel format is implemented by the software renderer.
    NoAcceleratedPixelFormat,
    /// The chosen pixel format couldn't be described.
    PixelFormatDescriptionFailed(WindowingApiError),
    /// The chosen pixel format couldn't be applied to the device context.
    SetPixelFormatFailed(WindowingApiError),
    /// The system couldn't create an OpenGL context.
    ContextCreationFailed(WindowingApiError),
    /// The system couldn't destroy the OpenGL context.
    ContextDestructionFailed(WindowingApiError),
    /// The hidden window backing a context couldn't be destroyed, typically because this isn't
    /// the thread that created it.
    WindowDestructionFailed(WindowingApiError),
    /// The system couldn't make the OpenGL context current or not current.
    MakeCurrentFailed(WindowingApiError),
    /// The isolated worker thread couldn't be spawned or panicked.
    WorkerThreadFailed,
    /// One of the initialization phases failed.
    Bootstrap(BootstrapPhase, Box<Error>),
    /// A `WGL_NV_DX_interop` call reported failure.
    DXInteropCallFailed(&'static str, WindowingApiError),
}

/// The initialization phase an error occurred in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapPhase {
    /// Resolution of `wglChoosePixelFormatARB` and `wglCreateContextAttribsARB` through a legacy
    /// context.
    ContextCreationPointers,
    /// Resolution of the GL function table and interop entry points through a versioned context.
    GLPointers,
}

/// Abstraction of the errors that WGL and the window system return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowingApiError {
    /// Miscellaneous error.
    Failed,
    /// Invalid pixel format, or a pixel format incompatible with the share context.
    BadPixelFormat,
    /// The context is invalid.
    BadContext,
    /// Invalid device context.
    BadDrawable,
    /// Invalid window handle.
    BadWindow,
    /// Arguments are inconsistent, e.g. a share context on a different device.
    BadMatch,
    /// An argument value is invalid.
    BadParameter,
    /// The operation is invalid in the current state.
    BadOperation,
    /// The system couldn't allocate resources for the request.
    BadAlloc,
    /// The calling thread isn't allowed to operate on the object.
    BadAccess,
    /// The requested OpenGL version isn't supported (`ERROR_INVALID_VERSION_ARB`).
    BadVersion,
    /// The requested OpenGL profile isn't supported (`ERROR_INVALID_PROFILE_ARB`).
    BadProfile,
}

const ERROR_ACCESS_DENIED: u32 = 5;
const ERROR_INVALID_HANDLE: u32 = 6;
const ERROR_NOT_ENOUGH_MEMORY: u32 = 8;
const ERROR_INVALID_PARAMETER: u32 = 87;
const ERROR_NO_SYSTEM_RESOURCES: u32 = 1450;
const ERROR_INVALID_WINDOW_HANDLE: u32 = 1400;
const ERROR_DC_NOT_FOUND: u32 = 1425;
const ERROR_INVALID_PIXEL_FORMAT: u32 = 2000;
const ERROR_INVALID_OPERATION: u32 = 4317;
const ERROR_INVALID_VERSION_ARB: u32 = 0x2095;
const ERROR_INVALID_PROFILE_ARB: u32 = 0x2096;
const ERROR_INCOMPATIBLE_DEVICE_CONTEXTS_ARB: u32 = 0x2054;

impl WindowingApiError {
    /// Maps a `GetLastError()` code.
    ///
    /// Drivers report the ARB context creation errors with the customer bit set, so only the low
    /// word is inspected.
    pub fn from_win32_code(code: u32) -> WindowingApiError {
        match code & 0xffff {
            ERROR_INVALID_PIXEL_FORMAT => WindowingApiError::BadPixelFormat,
            ERROR_INVALID_HANDLE => WindowingApiError::BadContext,
            ERROR_DC_NOT_FOUND => WindowingApiError::BadDrawable,
            ERROR_INVALID_WINDOW_HANDLE => WindowingApiError::BadWindow,
            ERROR_INCOMPATIBLE_DEVICE_CONTEXTS_ARB => WindowingApiError::BadMatch,
            ERROR_INVALID_PARAMETER => WindowingApiError::BadParameter,
            ERROR_INVALID_OPERATION => WindowingApiError::BadOperation,
            ERROR_NOT_ENOUGH_MEMORY | ERROR_NO_SYSTEM_RESOURCES => WindowingApiError::BadAlloc,
            ERROR_ACCESS_DENIED => WindowingApiError::BadAccess,
            ERROR_INVALID_VERSION_ARB => WindowingApiError::BadVersion,
            ERROR_INVALID_PROFILE_ARB => WindowingApiError::BadProfile,
            _ => WindowingApiError::Failed,
        }
    }
}

impl Display for WindowingApiError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let description = match *self {
            WindowingApiError::Failed => "unspecified failure",
            WindowingApiError::BadPixelFormat => "invalid pixel format",
            WindowingApiError::BadContext => "invalid context",
            WindowingApiError::BadDrawable => "invalid device context",
            WindowingApiError::BadWindow => "invalid window",
            WindowingApiError::BadMatch => "incompatible arguments",
            WindowingApiError::BadParameter => "invalid parameter",
            WindowingApiError::BadOperation => "invalid operation",
            WindowingApiError::BadAlloc => "out of resources",
            WindowingApiError::BadAccess => "access denied",
            WindowingApiError::BadVersion => "unsupported OpenGL version",
            WindowingApiError::BadProfile => "unsupported OpenGL profile",
        };
        f.write_str(description)
    }
}

impl Display for BootstrapPhase {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            BootstrapPhase::ContextCreationPointers => f.write_str("dummy context bootstrap"),
            BootstrapPhase::GLPointers => f.write_str("function pointer resolving bootstrap"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Error::NotInitialized => {
                f.write_str("the context creation entry points have not been initialized")
            }
            Error::RequiredExtensionUnavailable => f.write_str(
                "failed to get proc address of 'wglChoosePixelFormatARB' and \
                 'wglCreateContextAttribsARB'",
            ),
            Error::WindowClassRegistrationFailed(err) => {
                write!(f, "failed to register the hidden window class: {}", err)
            }
            Error::WindowCreationFailed(err) => {
                write!(f, "failed to create the hidden window: {}", err)
            }
            Error::SurfaceAcquisitionFailed(err) => {
                write!(f, "failed to get the device context of the hidden window: {}", err)
            }
            Error::PixelFormatSelectionFailed(err) => {
                write!(f, "failed to choose the pixel format: {}", err)
            }
            Error::NoPixelFormatFound => f.write_str("no matching pixel format was found"),
            Error::NoAcceleratedPixelFormat => {
                f.write_str("the matching pixel format is not hardware-accelerated")
            }
            Error::PixelFormatDescriptionFailed(err) => {
                write!(f, "failed to describe the pixel format: {}", err)
            }
            Error::SetPixelFormatFailed(err) => write!(f, "failed to set the pixel format: {}", err),
            Error::ContextCreationFailed(err) => {
                write!(f, "failed to create the opengl context: {}", err)
            }
            Error::ContextDestructionFailed(err) => {
                write!(f, "failed to delete the opengl context: {}", err)
            }
            Error::WindowDestructionFailed(err) => {
                write!(f, "failed to destroy the hidden window: {}", err)
            }
            Error::MakeCurrentFailed(err) => {
                write!(f, "failed to make the opengl context current: {}", err)
            }
            Error::WorkerThreadFailed => f.write_str("the bootstrap worker thread failed"),
            Error::Bootstrap(phase, ref cause) => write!(f, "{}: {}", phase, cause),
            Error::DXInteropCallFailed(name, err) => write!(f, "{} failed: {}", name, err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            Error::Bootstrap(_, ref cause) => Some(&**cause),
            _ => None,
        }
    }
}

lazy_static! {
    static ref LAST_ERROR: Mutex<Option<String>> = Mutex::new(None);
}

/// Returns the message of the most recent failure, if any, without clearing it.
///
/// This is the error channel for callers on the other side of a language binding, which only see
/// a `false` or null result. Rust callers should use the returned `Result` instead.
pub fn last_error() -> Option<String> {
    LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Returns and clears the message of the most recent failure.
pub fn take_last_error() -> Option<String> {
    LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Clears the last-error slot.
pub fn clear_last_error() {
    *LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Records `error` in the last-error slot and hands it back.
pub(crate) fn record(error: Error) -> Error {
    warn!("glbridge: {}", error);
    *LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner) = Some(error.to_string());
    error
}
