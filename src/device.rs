// glbridge/src/device.rs
//
//! The entry point: bootstraps function pointers and creates, shares and destroys contexts.

use crate::bootstrap::{self, BootstrapParams, HiddenWindow};
use crate::context::{AsNativeContext, Context, ContextAttributeFlags, ContextAttributes};
use crate::context::{ContextID, NativeContextHandle, WrappedContext};
use crate::error::{self, BootstrapPhase, Error};
use crate::executor::IsolatedThread;
use crate::extensions::{ContextCreationFunctions, GLFunctions};
use crate::gl::Gl;
use crate::info::{GLProfile, GLVersion};
use crate::interop::DXInterop;
use crate::pixel_format;
use crate::platform::{Driver, ModuleHandle};
use crate::registry::ContextRegistry;

use euclid::default::Size2D;
use once_cell::sync::OnceCell;
use std::ffi::CString;
use std::sync::Arc;

const BOOTSTRAP_THREAD_NAME: &str = "glbridge-bootstrap";

/// Configuration for a `Device`.
#[derive(Clone, Debug)]
pub struct DeviceDescriptor {
    /// The module that owns the hidden window class. `None` means the executable.
    pub module: Option<ModuleHandle>,
    /// The class every hidden window is created with.
    pub window_class_name: CString,
    /// The client size of hidden windows.
    pub hidden_window_size: Size2D<i32>,
    /// What the second bootstrap phase asks for. The function table is loaded from this context.
    pub bootstrap_attributes: ContextAttributes,
    /// The version requested by `Device::create_shared_compat_context()`.
    pub shared_compat_version: GLVersion,
}

impl Default for DeviceDescriptor {
    fn default() -> DeviceDescriptor {
        DeviceDescriptor {
            module: None,
            window_class_name: CString::from(c"GLBridgeHiddenWindow"),
            hidden_window_size: Size2D::new(1, 1),
            bootstrap_attributes: ContextAttributes::new(GLVersion::new(4, 5),
                                                         GLProfile::Core,
                                                         ContextAttributeFlags::empty()),
            shared_compat_version: GLVersion::new(2, 1),
        }
    }
}

/// Creates and manages off-screen contexts on top of a `Driver`.
///
/// A device must be initialized before it can create contexts. Initialization resolves the
/// context creation entry points, then the GL function table and the interop entry points. Each
/// set is resolved at most once per device; a failed attempt is retried by the next call.
pub struct Device<D: Driver> {
    driver: D,
    descriptor: DeviceDescriptor,
    registry: Arc<ContextRegistry>,
    context_creation_functions: OnceCell<ContextCreationFunctions>,
    gl_functions: OnceCell<GLFunctions>,
}

impl<D: Driver> Device<D> {
    /// Creates an uninitialized device with its own context registry.
    pub fn new(driver: D, descriptor: DeviceDescriptor) -> Device<D> {
        Device::with_registry(driver, descriptor, Arc::new(ContextRegistry::new()))
    }

    /// Creates an uninitialized device that registers its contexts in `registry`.
    pub fn with_registry(driver: D, descriptor: DeviceDescriptor, registry: Arc<ContextRegistry>)
                         -> Device<D> {
        Device {
            driver,
            descriptor,
            registry,
            context_creation_functions: OnceCell::new(),
            gl_functions: OnceCell::new(),
        }
    }

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[inline]
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn registry(&self) -> &Arc<ContextRegistry> {
        &self.registry
    }

    /// Runs both bootstrap phases. Does nothing if they have already succeeded.
    pub fn initialize(&self) -> Result<(), Error> {
        if self.is_initialized() {
            return Ok(());
        }
        self.initialize_context_creation_pointers()?;
        self.initialize_gl_pointers()?;
        info!("glbridge: device initialized (DX interop {})",
              if self.is_dx_interop_available() { "available" } else { "unavailable" });
        Ok(())
    }

    /// Resolves `wglChoosePixelFormatARB` and `wglCreateContextAttribsARB`.
    ///
    /// The throwaway context used for this is made current on a worker thread, so the calling
    /// thread's current context is left alone.
    pub fn initialize_context_creation_pointers(&self) -> Result<(), Error> {
        self.context_creation_functions.get_or_try_init(|| {
            debug!("glbridge: resolving the context creation entry points");
            let params = self.bootstrap_params();
            IsolatedThread::new(BOOTSTRAP_THREAD_NAME)
                .run(|| bootstrap::load_context_creation_functions(&self.driver, &params))
                .and_then(|result| result)
                .map_err(|err| Error::Bootstrap(BootstrapPhase::ContextCreationPointers,
                                                Box::new(err)))
        }).map(|_| ()).map_err(error::record)
    }

    /// Loads the GL function table and the interop entry points. Requires
    /// `initialize_context_creation_pointers()` to have succeeded.
    pub fn initialize_gl_pointers(&self) -> Result<(), Error> {
        let functions = match self.context_creation_functions.get() {
            Some(functions) => functions,
            None => return Err(error::record(Error::NotInitialized)),
        };

        self.gl_functions.get_or_try_init(|| {
            debug!("glbridge: resolving the GL function table");
            let params = self.bootstrap_params();
            IsolatedThread::new(BOOTSTRAP_THREAD_NAME)
                .run(|| bootstrap::load_gl_functions(&self.driver, functions, &params))
                .and_then(|result| result)
                .map_err(|err| Error::Bootstrap(BootstrapPhase::GLPointers, Box::new(err)))
        }).map(|_| ()).map_err(error::record)
    }

    /// True once both bootstrap phases have succeeded.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.context_creation_functions.get().is_some() && self.gl_functions.get().is_some()
    }

    /// The GL function table. Usable with any context created by this device once it is current.
    #[inline]
    pub fn gl(&self) -> Option<&Gl> {
        self.gl_functions.get().map(|functions| &functions.gl)
    }

    /// True if every `WGL_NV_DX_interop` entry point resolved.
    #[inline]
    pub fn is_dx_interop_available(&self) -> bool {
        self.dx_interop().is_some()
    }

    /// The `WGL_NV_DX_interop` entry points, if the driver exposes all of them.
    pub fn dx_interop(&self) -> Option<DXInterop<D>> {
        let functions = self.gl_functions.get()?.dx_interop.as_ref()?;
        Some(DXInterop::new(&self.driver, functions))
    }

    /// Creates a debug compatibility-profile context of `version`, optionally sharing objects
    /// with `shared`.
    pub fn create_context(&self, shared: Option<&dyn AsNativeContext>, version: GLVersion)
                          -> Result<Context, Error> {
        let attributes = ContextAttributes::new(version,
                                                GLProfile::Compatibility,
                                                ContextAttributeFlags::DEBUG);
        self.create_context_with_attributes(shared, &attributes)
    }

    /// Creates a debug compatibility-profile context at the configured baseline version.
    pub fn create_shared_compat_context(&self, shared: Option<&dyn AsNativeContext>)
                                        -> Result<Context, Error> {
        self.create_context(shared, self.descriptor.shared_compat_version)
    }

    /// Creates a context on a new hidden window.
    ///
    /// On failure everything acquired so far is released and nothing is registered.
    pub fn create_context_with_attributes(&self,
                                          shared: Option<&dyn AsNativeContext>,
                                          attributes: &ContextAttributes)
                                          -> Result<Context, Error> {
        self.create_context_internal(shared, attributes).map_err(error::record)
    }

    fn create_context_internal(&self,
                               shared: Option<&dyn AsNativeContext>,
                               attributes: &ContextAttributes)
                               -> Result<Context, Error> {
        let functions = self.context_creation_functions.get().ok_or(Error::NotInitialized)?;

        let window = HiddenWindow::new(&self.driver,
                                       self.descriptor.module,
                                       &self.descriptor.window_class_name,
                                       self.descriptor.hidden_window_size)?;
        let surface = window.surface()?;
        pixel_format::negotiate_pixel_format(&self.driver, functions, surface.handle())?;

        let share_with = shared.map(|context| context.native_context());
        let native_context = bootstrap::create_context_attribs(&self.driver,
                                                               functions,
                                                               surface.handle(),
                                                               share_with,
                                                               attributes)?;

        let surface = surface.into_handle();
        let window = window.into_handle();
        let registry = self.registry.clone();
        let id = registry.register(native_context);
        debug!("glbridge: created context {} ({:#x}, {}.{} {:?}, shared with {:?})",
               id.0,
               native_context.as_u64(),
               attributes.version.major,
               attributes.version.minor,
               attributes.profile,
               share_with.map(NativeContextHandle::as_u64));

        Ok(Context {
            id,
            registry,
            window,
            surface,
            native_context,
            attributes: *attributes,
            destroyed: false,
        })
    }

    /// Adopts a context created outside this crate. Nothing is allocated or registered.
    #[inline]
    pub fn wrap_context(&self, native_context: NativeContextHandle) -> WrappedContext {
        WrappedContext::new(native_context)
    }

    /// Destroys a context along with its hidden window, and removes it from the registry it was
    /// created in.
    ///
    /// Must be called on the thread that created the context, or the hidden window can't be
    /// destroyed. The device context is released and the window destruction attempted even if
    /// deleting the context fails. A deletion failure is reported ahead of a window failure.
    pub fn destroy_context(&self, mut context: Context) -> Result<(), Error> {
        let native_context = context.native_context;
        if context.registry.unregister(native_context).is_none() {
            warn!("glbridge: context {} was missing from its registry", context.id.0);
        }

        if self.driver.current_context() == Some(native_context) {
            if let Err(err) = self.driver.make_current(None) {
                warn!("glbridge: failed to detach context {} before deletion: {}",
                      context.id.0,
                      err);
            }
        }

        let delete_result = self.driver.delete_context(native_context);
        self.driver.release_surface(context.window, context.surface);
        let window_result = self.driver.destroy_window(context.window);
        context.destroyed = true;

        match (delete_result, window_result) {
            (Ok(()), Ok(())) => {
                debug!("glbridge: destroyed context {}", context.id.0);
                Ok(())
            }
            (Err(err), _) => Err(error::record(Error::ContextDestructionFailed(err))),
            (Ok(()), Err(err)) => Err(error::record(Error::WindowDestructionFailed(err))),
        }
    }

    /// Binds `context` and its device context to the calling thread.
    pub fn make_context_current(&self, context: &Context) -> Result<(), Error> {
        self.driver
            .make_current(Some((context.surface, context.native_context())))
            .map_err(|err| error::record(Error::MakeCurrentFailed(err)))
    }

    /// Unbinds whatever context is current on the calling thread.
    pub fn make_no_context_current(&self) -> Result<(), Error> {
        self.driver
            .make_current(None)
            .map_err(|err| error::record(Error::MakeCurrentFailed(err)))
    }

    /// True if `context` is current on the calling thread.
    pub fn is_context_current(&self, context: &dyn AsNativeContext) -> bool {
        self.driver.current_context() == Some(context.native_context())
    }

    /// True if no context is current on the calling thread.
    pub fn is_no_context_current(&self) -> bool {
        self.driver.current_context().is_none()
    }

    /// The registered context current on the calling thread, if any.
    pub fn current_context(&self) -> Option<ContextID> {
        let native_context = self.driver.current_context()?;
        self.registry.lookup(native_context)
    }

    fn bootstrap_params(&self) -> BootstrapParams {
        BootstrapParams {
            module: self.descriptor.module,
            window_class_name: &self.descriptor.window_class_name,
            hidden_window_size: self.descriptor.hidden_window_size,
            attributes: self.descriptor.bootstrap_attributes,
        }
    }
}
