// glbridge/src/tests.rs
//
//! Unit tests.

use crate::context::{AsNativeContext, ContextAttributeFlags, ContextAttributes};
use crate::device::{Device, DeviceDescriptor};
use crate::error::{self, BootstrapPhase, Error, WindowingApiError};
use crate::extensions::{FALSE, TRUE, WGL_ACCELERATION_ARB, WGL_CONTEXT_CORE_PROFILE_BIT_ARB};
use crate::extensions::{WGL_CONTEXT_DEBUG_BIT_ARB, WGL_CONTEXT_FLAGS_ARB};
use crate::extensions::{WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB, WGL_CONTEXT_MAJOR_VERSION_ARB};
use crate::extensions::{WGL_CONTEXT_MINOR_VERSION_ARB, WGL_CONTEXT_PROFILE_MASK_ARB};
use crate::extensions::{WGL_DOUBLE_BUFFER_ARB, WGL_FULL_ACCELERATION_ARB, WGL_SUPPORT_OPENGL_ARB};
use crate::gl;
use crate::info::{GLProfile, GLVersion};
use crate::interop::InteropAccess;
use crate::platform::generic::mock::{MockDriver, MockFaults};
use crate::platform::{Driver, WindowHandle};
use crate::registry::ContextRegistry;

use serial_test::serial;
use std::os::raw::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

fn initialized_device() -> Device<MockDriver> {
    let device = Device::new(MockDriver::new(), DeviceDescriptor::default());
    device.initialize().unwrap();
    device
}

fn assert_nothing_leaked(device: &Device<MockDriver>) {
    assert_eq!(device.driver().live_windows(), 0);
    assert_eq!(device.driver().live_surfaces(), 0);
    assert_eq!(device.driver().live_contexts(), 0);
}

// Runs the first bootstrap phase against `faults` and returns the underlying error.
fn context_creation_pointer_failure(faults: MockFaults) -> Error {
    let device = Device::new(MockDriver::with_faults(faults), DeviceDescriptor::default());
    let error = device.initialize_context_creation_pointers().unwrap_err();
    assert_nothing_leaked(&device);
    match error {
        Error::Bootstrap(BootstrapPhase::ContextCreationPointers, cause) => *cause,
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
#[serial]
fn test_initialization() {
    let device = Device::new(MockDriver::new(), DeviceDescriptor::default());
    assert!(!device.is_initialized());
    assert!(device.gl().is_none());
    assert!(device.dx_interop().is_none());

    device.initialize().unwrap();
    assert!(device.is_initialized());
    assert!(device.gl().is_some());
    assert!(device.is_dx_interop_available());
    assert_eq!(device.driver().legacy_contexts_created(), 1);
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_initialization_is_idempotent() {
    let device = initialized_device();
    device.initialize().unwrap();
    device.initialize_context_creation_pointers().unwrap();
    device.initialize_gl_pointers().unwrap();
    assert_eq!(device.driver().legacy_contexts_created(), 1);
    assert_eq!(device.driver().legacy_current_threads().len(), 1);
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_concurrent_initialization_runs_the_bootstrap_once() {
    let device = Device::new(MockDriver::new(), DeviceDescriptor::default());
    thread::scope(|scope| {
        let threads: Vec<_> = (0..4).map(|_| scope.spawn(|| device.initialize())).collect();
        for thread in threads {
            thread.join().unwrap().unwrap();
        }
    });
    assert_eq!(device.driver().legacy_contexts_created(), 1);
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_bootstrap_leaves_the_calling_thread_alone() {
    let driver = MockDriver::new();
    let (foreign_surface, foreign_context) = driver.create_foreign_context();
    driver.make_current(Some((foreign_surface, foreign_context))).unwrap();

    let device = Device::new(driver, DeviceDescriptor::default());
    device.initialize().unwrap();

    // The caller's context is still current, and the throwaway context was never current here.
    assert_eq!(device.driver().current_context(), Some(foreign_context));
    let caller = thread::current().name().map(str::to_owned);
    let bootstrap_threads = device.driver().legacy_current_threads();
    assert_eq!(bootstrap_threads, vec![Some("glbridge-bootstrap".to_owned())]);
    assert_ne!(bootstrap_threads[0], caller);

    device.driver().make_current(None).unwrap();
    device.driver().delete_context(foreign_context).unwrap();
    device.driver().release_surface(WindowHandle(0), foreign_surface);
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_context_creation_pointer_failures_are_distinct() {
    let cause = context_creation_pointer_failure(MockFaults {
        window_creation: true,
        ..MockFaults::default()
    });
    assert!(matches!(cause, Error::WindowCreationFailed(_)));

    let cause = context_creation_pointer_failure(MockFaults {
        surface_acquisition: true,
        ..MockFaults::default()
    });
    assert!(matches!(cause, Error::SurfaceAcquisitionFailed(_)));

    let cause = context_creation_pointer_failure(MockFaults {
        legacy_pixel_format: true,
        ..MockFaults::default()
    });
    assert!(matches!(cause, Error::PixelFormatSelectionFailed(WindowingApiError::BadPixelFormat)));

    let cause = context_creation_pointer_failure(MockFaults {
        set_pixel_format: true,
        ..MockFaults::default()
    });
    assert!(matches!(cause, Error::SetPixelFormatFailed(WindowingApiError::BadPixelFormat)));

    let cause = context_creation_pointer_failure(MockFaults {
        legacy_context_creation: true,
        ..MockFaults::default()
    });
    assert!(matches!(cause, Error::ContextCreationFailed(_)));

    let cause = context_creation_pointer_failure(MockFaults {
        make_current: true,
        ..MockFaults::default()
    });
    assert!(matches!(cause, Error::MakeCurrentFailed(_)));

    let cause = context_creation_pointer_failure(MockFaults {
        missing_context_creation_extensions: true,
        ..MockFaults::default()
    });
    assert!(matches!(cause, Error::RequiredExtensionUnavailable));
}

#[test]
#[serial]
fn test_failed_bootstrap_is_retried() {
    let device = Device::new(MockDriver::with_faults(MockFaults {
        make_current: true,
        ..MockFaults::default()
    }), DeviceDescriptor::default());
    assert!(device.initialize().is_err());
    assert!(!device.is_initialized());

    device.driver().set_faults(MockFaults::default());
    device.initialize().unwrap();
    assert!(device.is_initialized());
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_gl_pointers_require_context_creation_pointers() {
    let device = Device::new(MockDriver::new(), DeviceDescriptor::default());
    match device.initialize_gl_pointers() {
        Err(Error::NotInitialized) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(device.driver().legacy_contexts_created(), 0);
}

#[test]
#[serial]
fn test_gl_pointer_failures() {
    let device = Device::new(MockDriver::with_faults(MockFaults {
        no_matching_pixel_format: true,
        ..MockFaults::default()
    }), DeviceDescriptor::default());
    match device.initialize() {
        Err(Error::Bootstrap(BootstrapPhase::GLPointers, cause)) => {
            assert!(matches!(*cause, Error::NoPixelFormatFound));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!device.is_initialized());
    assert_nothing_leaked(&device);

    // The bootstrap context asks for 4.5.
    let device = Device::new(MockDriver::with_faults(MockFaults {
        max_version: Some(GLVersion::new(4, 1)),
        ..MockFaults::default()
    }), DeviceDescriptor::default());
    match device.initialize() {
        Err(Error::Bootstrap(BootstrapPhase::GLPointers, cause)) => {
            assert!(matches!(*cause,
                             Error::ContextCreationFailed(WindowingApiError::BadVersion)));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_gl_pointer_failures_after_context_creation_pointers() {
    check_gl_pointer_failure(MockFaults { window_creation: true, ..MockFaults::default() },
                             |error| matches!(error, Error::WindowCreationFailed(_)));
    check_gl_pointer_failure(MockFaults { surface_acquisition: true, ..MockFaults::default() },
                             |error| matches!(error, Error::SurfaceAcquisitionFailed(_)));
    check_gl_pointer_failure(MockFaults { make_current: true, ..MockFaults::default() },
                             |error| matches!(error, Error::MakeCurrentFailed(_)));
    check_gl_pointer_failure(MockFaults { generic_pixel_format: true, ..MockFaults::default() },
                             |error| matches!(error, Error::NoAcceleratedPixelFormat));

    fn check_gl_pointer_failure<F>(faults: MockFaults, is_expected: F)
                                   where F: Fn(&Error) -> bool {
        let device = Device::new(MockDriver::new(), DeviceDescriptor::default());
        device.initialize_context_creation_pointers().unwrap();

        device.driver().set_faults(faults.clone());
        match device.initialize_gl_pointers() {
            Err(Error::Bootstrap(BootstrapPhase::GLPointers, ref cause)) if is_expected(cause) => {}
            other => panic!("unexpected result for {:?}: {:?}", faults, other),
        }
        assert!(!device.is_initialized());
        assert!(device.gl().is_none());
        assert!(device.is_no_context_current());
        assert_nothing_leaked(&device);

        // Only the second phase is retried.
        device.driver().set_faults(MockFaults::default());
        device.initialize().unwrap();
        assert_eq!(device.driver().legacy_contexts_created(), 1);
        assert_nothing_leaked(&device);
    }
}

#[test]
#[serial]
fn test_configurable_bootstrap_version() {
    let descriptor = DeviceDescriptor {
        bootstrap_attributes: ContextAttributes::new(GLVersion::new(3, 3),
                                                     GLProfile::Core,
                                                     ContextAttributeFlags::empty()),
        ..DeviceDescriptor::default()
    };
    let device = Device::new(MockDriver::with_faults(MockFaults {
        max_version: Some(GLVersion::new(4, 1)),
        ..MockFaults::default()
    }), descriptor);
    device.initialize().unwrap();
    assert_eq!(device.driver().last_context_attributes().unwrap(), vec![
        WGL_CONTEXT_MAJOR_VERSION_ARB, 3,
        WGL_CONTEXT_MINOR_VERSION_ARB, 3,
        WGL_CONTEXT_FLAGS_ARB, 0,
        WGL_CONTEXT_PROFILE_MASK_ARB, WGL_CONTEXT_CORE_PROFILE_BIT_ARB,
    ]);
}

#[test]
#[serial]
fn test_interop_is_optional() {
    let device = Device::new(MockDriver::with_faults(MockFaults {
        missing_dx_interop: true,
        ..MockFaults::default()
    }), DeviceDescriptor::default());
    device.initialize().unwrap();
    assert!(device.is_initialized());
    assert!(!device.is_dx_interop_available());
    assert!(device.dx_interop().is_none());
}

#[test]
#[serial]
fn test_context_creation_requires_initialization() {
    let device = Device::new(MockDriver::new(), DeviceDescriptor::default());
    match device.create_context(None, GLVersion::new(3, 3)) {
        Err(Error::NotInitialized) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    match device.create_shared_compat_context(None) {
        Err(Error::NotInitialized) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_context_creation() {
    let device = initialized_device();
    let context = device.create_context(None, GLVersion::new(3, 3)).unwrap();

    let native_context = context.native_context();
    assert!(!native_context.is_null());
    assert_eq!(device.registry().lookup(native_context), Some(context.id()));
    assert_eq!(device.driver().context_version(native_context),
               Some((GLVersion::new(3, 3), GLProfile::Compatibility)));
    assert_eq!(device.driver().live_windows(), 1);
    assert_eq!(device.driver().live_surfaces(), 1);

    // Debug compatibility contexts are requested.
    let attributes = device.driver().last_context_attributes().unwrap();
    assert!(attributes.chunks(2).any(|pair| {
        pair == [WGL_CONTEXT_FLAGS_ARB, WGL_CONTEXT_DEBUG_BIT_ARB]
    }));

    // Creation doesn't make anything current.
    assert!(!device.is_context_current(&context));
    assert_eq!(device.current_context(), None);

    device.destroy_context(context).unwrap();
    assert!(device.registry().is_empty());
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_pixel_format_negotiation_requests_acceleration() {
    let device = initialized_device();
    let context = device.create_context(None, GLVersion::new(2, 1)).unwrap();

    let request = device.driver().last_pixel_format_request().unwrap();
    let pairs: Vec<_> = request.chunks(2).map(|pair| (pair[0], pair[1])).collect();
    assert!(pairs.contains(&(WGL_SUPPORT_OPENGL_ARB, TRUE)));
    assert!(pairs.contains(&(WGL_DOUBLE_BUFFER_ARB, TRUE)));
    assert!(pairs.contains(&(WGL_ACCELERATION_ARB, WGL_FULL_ACCELERATION_ARB)));
    assert!(!pairs.contains(&(WGL_SUPPORT_OPENGL_ARB, FALSE)));

    device.destroy_context(context).unwrap();
}

#[test]
#[serial]
fn test_context_creation_with_attributes() {
    let device = initialized_device();
    let attributes = ContextAttributes::new(GLVersion::new(4, 1),
                                            GLProfile::Core,
                                            ContextAttributeFlags::FORWARD_COMPATIBLE);
    let context = device.create_context_with_attributes(None, &attributes).unwrap();
    assert_eq!(*context.attributes(), attributes);
    assert_eq!(device.driver().context_version(context.native_context()),
               Some((GLVersion::new(4, 1), GLProfile::Core)));
    assert_eq!(device.driver().last_context_attributes().unwrap(), vec![
        WGL_CONTEXT_MAJOR_VERSION_ARB, 4,
        WGL_CONTEXT_MINOR_VERSION_ARB, 1,
        WGL_CONTEXT_FLAGS_ARB, WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB,
        WGL_CONTEXT_PROFILE_MASK_ARB, WGL_CONTEXT_CORE_PROFILE_BIT_ARB,
    ]);
    device.destroy_context(context).unwrap();
}

#[test]
#[serial]
fn test_context_ids_are_unique() {
    let device = initialized_device();
    let contexts: Vec<_> = (0..3).map(|_| {
        device.create_context(None, GLVersion::new(3, 0)).unwrap()
    }).collect();
    assert_ne!(contexts[0].id(), contexts[1].id());
    assert_ne!(contexts[1].id(), contexts[2].id());
    assert_ne!(contexts[0].id(), contexts[2].id());
    assert_eq!(device.registry().len(), 3);

    for context in contexts {
        device.destroy_context(context).unwrap();
    }
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_context_sharing() {
    let device = initialized_device();
    let first = device.create_context(None, GLVersion::new(3, 3)).unwrap();
    let second = device.create_context(Some(&first), GLVersion::new(3, 3)).unwrap();
    let unshared = device.create_context(None, GLVersion::new(3, 3)).unwrap();

    assert_ne!(first.native_context(), second.native_context());
    let driver = device.driver();
    assert_eq!(driver.share_group(first.native_context()),
               driver.share_group(second.native_context()));
    assert_ne!(driver.share_group(first.native_context()),
               driver.share_group(unshared.native_context()));

    device.destroy_context(first).unwrap();
    device.destroy_context(second).unwrap();
    device.destroy_context(unshared).unwrap();
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_shared_compat_context() {
    let device = initialized_device();
    let main = device.create_context(None, GLVersion::new(4, 5)).unwrap();
    let compat = device.create_shared_compat_context(Some(&main)).unwrap();

    assert_eq!(compat.attributes().version, GLVersion::new(2, 1));
    assert_eq!(device.driver().context_version(compat.native_context()),
               Some((GLVersion::new(2, 1), GLProfile::Compatibility)));
    assert_eq!(device.driver().share_group(compat.native_context()),
               device.driver().share_group(main.native_context()));

    device.destroy_context(compat).unwrap();
    device.destroy_context(main).unwrap();
}

#[test]
#[serial]
fn test_unsupported_version_fails() {
    let device = initialized_device();
    device.driver().set_faults(MockFaults {
        max_version: Some(GLVersion::new(3, 3)),
        ..MockFaults::default()
    });

    error::clear_last_error();
    match device.create_context(None, GLVersion::new(4, 0)) {
        Err(Error::ContextCreationFailed(WindowingApiError::BadVersion)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(error::last_error().unwrap().contains("unsupported OpenGL version"));
    assert!(device.registry().is_empty());
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_context_creation_failures_release_resources() {
    let device = initialized_device();

    check_creation_failure(&device,
                           MockFaults { window_creation: true, ..MockFaults::default() },
                           |error| matches!(error, Error::WindowCreationFailed(_)));
    check_creation_failure(&device,
                           MockFaults { surface_acquisition: true, ..MockFaults::default() },
                           |error| matches!(error, Error::SurfaceAcquisitionFailed(_)));
    check_creation_failure(&device,
                           MockFaults { accelerated_pixel_format: true, ..MockFaults::default() },
                           |error| matches!(error, Error::PixelFormatSelectionFailed(_)));
    check_creation_failure(&device,
                           MockFaults { no_matching_pixel_format: true, ..MockFaults::default() },
                           |error| matches!(error, Error::NoPixelFormatFound));
    check_creation_failure(&device,
                           MockFaults { describe_pixel_format: true, ..MockFaults::default() },
                           |error| matches!(error, Error::PixelFormatDescriptionFailed(_)));
    check_creation_failure(&device,
                           MockFaults { generic_pixel_format: true, ..MockFaults::default() },
                           |error| matches!(error, Error::NoAcceleratedPixelFormat));
    check_creation_failure(&device,
                           MockFaults { set_pixel_format: true, ..MockFaults::default() },
                           |error| matches!(error, Error::SetPixelFormatFailed(_)));
    check_creation_failure(&device,
                           MockFaults { versioned_context_creation: true, ..MockFaults::default() },
                           |error| matches!(error, Error::ContextCreationFailed(_)));

    fn check_creation_failure<F>(device: &Device<MockDriver>, faults: MockFaults, is_expected: F)
                                 where F: FnOnce(&Error) -> bool {
        device.driver().set_faults(faults.clone());
        match device.create_context(None, GLVersion::new(3, 3)) {
            Err(ref error) if is_expected(error) => {}
            Err(error) => panic!("unexpected error for {:?}: {:?}", faults, error),
            Ok(context) => {
                device.destroy_context(context).unwrap();
                panic!("creation should have failed for {:?}", faults);
            }
        }
        assert!(device.registry().is_empty());
        assert_nothing_leaked(device);
    }
}

#[test]
#[serial]
fn test_sharing_with_an_unknown_context_fails() {
    let device = initialized_device();
    let bogus = device.wrap_context(crate::NativeContextHandle::from_u64(0xdead0));
    match device.create_context(Some(&bogus), GLVersion::new(3, 3)) {
        Err(Error::ContextCreationFailed(WindowingApiError::BadContext)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_current_context() {
    let device = initialized_device();
    let first = device.create_context(None, GLVersion::new(3, 3)).unwrap();
    let second = device.create_context(Some(&first), GLVersion::new(3, 3)).unwrap();
    assert!(device.is_no_context_current());

    device.make_context_current(&first).unwrap();
    assert!(device.is_context_current(&first));
    assert!(!device.is_context_current(&second));
    assert!(!device.is_no_context_current());
    assert_eq!(device.current_context(), Some(first.id()));

    device.make_context_current(&second).unwrap();
    assert_eq!(device.current_context(), Some(second.id()));

    device.make_no_context_current().unwrap();
    assert!(device.is_no_context_current());
    assert!(!device.is_context_current(&second));
    assert_eq!(device.current_context(), None);

    device.destroy_context(first).unwrap();
    device.destroy_context(second).unwrap();
}

#[test]
#[serial]
fn test_current_context_is_per_thread() {
    let device = initialized_device();
    let context = device.create_context(None, GLVersion::new(3, 3)).unwrap();
    device.make_context_current(&context).unwrap();

    thread::scope(|scope| {
        scope.spawn(|| {
            assert!(device.is_no_context_current());
            assert_eq!(device.current_context(), None);
        }).join().unwrap();
    });
    assert_eq!(device.current_context(), Some(context.id()));

    device.make_no_context_current().unwrap();
    device.destroy_context(context).unwrap();
}

#[test]
#[serial]
fn test_make_current_failure_is_reported() {
    let device = initialized_device();
    let context = device.create_context(None, GLVersion::new(3, 3)).unwrap();
    device.driver().set_faults(MockFaults { make_current: true, ..MockFaults::default() });

    error::clear_last_error();
    assert!(matches!(device.make_context_current(&context), Err(Error::MakeCurrentFailed(_))));
    assert!(device.is_no_context_current());
    assert!(error::last_error().is_some());

    device.driver().set_faults(MockFaults::default());
    device.destroy_context(context).unwrap();
}

#[test]
#[serial]
fn test_destroying_the_current_context_detaches_it() {
    let device = initialized_device();
    let context = device.create_context(None, GLVersion::new(3, 3)).unwrap();
    device.make_context_current(&context).unwrap();

    device.destroy_context(context).unwrap();
    assert!(device.is_no_context_current());
    assert_eq!(device.current_context(), None);
    assert!(device.registry().is_empty());
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_destroy_failure_still_releases_the_window() {
    let device = initialized_device();
    let context = device.create_context(None, GLVersion::new(3, 3)).unwrap();
    let native_context = context.native_context();
    device.driver().set_faults(MockFaults { delete_context: true, ..MockFaults::default() });

    match device.destroy_context(context) {
        Err(Error::ContextDestructionFailed(WindowingApiError::BadContext)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(device.driver().live_windows(), 0);
    assert_eq!(device.driver().live_surfaces(), 0);
    assert_eq!(device.registry().lookup(native_context), None);
}

#[test]
#[serial]
fn test_destroying_on_another_thread_reports_the_window() {
    let device = initialized_device();
    let context = device.create_context(None, GLVersion::new(3, 3)).unwrap();
    let window = context.window();
    let native_context = context.native_context();
    error::clear_last_error();

    let result = thread::scope(|scope| {
        scope.spawn(|| device.destroy_context(context)).join().unwrap()
    });
    match result {
        Err(Error::WindowDestructionFailed(WindowingApiError::BadAccess)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(error::last_error().is_some());

    // The context is gone; only the window is left for its owner.
    assert_eq!(device.registry().lookup(native_context), None);
    assert_eq!(device.driver().live_contexts(), 0);
    assert_eq!(device.driver().live_surfaces(), 0);
    assert_eq!(device.driver().live_windows(), 1);

    device.driver().destroy_window(window).unwrap();
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_dropping_a_live_context_panics() {
    let device = initialized_device();
    let context = device.create_context(None, GLVersion::new(3, 3)).unwrap();
    let result = panic::catch_unwind(AssertUnwindSafe(move || drop(context)));
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_wrapped_contexts() {
    let device = initialized_device();
    let (foreign_surface, foreign_context) = device.driver().create_foreign_context();
    let wrapped = device.wrap_context(foreign_context);
    assert_eq!(wrapped.native_context(), foreign_context);
    assert!(device.registry().is_empty());

    device.driver().make_current(Some((foreign_surface, foreign_context))).unwrap();
    assert!(device.is_context_current(&wrapped));
    assert_eq!(device.current_context(), None);

    // Wrapped contexts can be shared with.
    let shared = device.create_context(Some(&wrapped), GLVersion::new(3, 3)).unwrap();
    assert_eq!(device.driver().share_group(shared.native_context()),
               device.driver().share_group(foreign_context));
    device.destroy_context(shared).unwrap();

    // Still current, still ours to clean up.
    assert!(device.is_context_current(&wrapped));
    device.make_no_context_current().unwrap();
    device.driver().delete_context(foreign_context).unwrap();
    device.driver().release_surface(WindowHandle(0), foreign_surface);
    assert_nothing_leaked(&device);
}

#[test]
#[serial]
fn test_devices_can_share_a_registry() {
    let registry = Arc::new(ContextRegistry::new());
    let driver = MockDriver::new();
    let first_device =
        Device::with_registry(driver.clone(), DeviceDescriptor::default(), registry.clone());
    let second_device = Device::with_registry(driver, DeviceDescriptor::default(), registry.clone());
    first_device.initialize().unwrap();
    second_device.initialize().unwrap();

    let first = first_device.create_context(None, GLVersion::new(3, 3)).unwrap();
    let second = second_device.create_context(None, GLVersion::new(3, 3)).unwrap();
    assert_ne!(first.id(), second.id());
    assert_eq!(registry.len(), 2);

    first_device.make_context_current(&first).unwrap();
    assert_eq!(second_device.current_context(), Some(first.id()));

    first_device.make_no_context_current().unwrap();
    first_device.destroy_context(first).unwrap();
    second_device.destroy_context(second).unwrap();
    assert!(registry.is_empty());
}

#[test]
#[serial]
fn test_destroying_through_another_device_unregisters_the_context() {
    let driver = MockDriver::new();
    let owner = Device::new(driver.clone(), DeviceDescriptor::default());
    let other = Device::new(driver, DeviceDescriptor::default());
    owner.initialize().unwrap();
    other.initialize().unwrap();

    let context = owner.create_context(None, GLVersion::new(3, 3)).unwrap();
    let native_context = context.native_context();
    assert_eq!(owner.registry().len(), 1);
    assert!(other.registry().is_empty());

    other.destroy_context(context).unwrap();
    assert_eq!(owner.registry().lookup(native_context), None);
    assert!(owner.registry().is_empty());
    assert!(other.registry().is_empty());
    assert_nothing_leaked(&owner);
}

#[test]
#[serial]
fn test_failures_are_recorded() {
    let device = Device::new(MockDriver::new(), DeviceDescriptor::default());
    error::clear_last_error();
    assert!(device.create_context(None, GLVersion::new(3, 3)).is_err());
    let message = error::take_last_error().unwrap();
    assert!(message.contains("not been initialized"));

    let device = Device::new(MockDriver::with_faults(MockFaults {
        legacy_context_creation: true,
        ..MockFaults::default()
    }), DeviceDescriptor::default());
    assert!(device.initialize().is_err());
    let message = error::take_last_error().unwrap();
    assert!(message.starts_with("dummy context bootstrap"));
    assert!(message.contains("failed to create the opengl context"));
}

#[test]
#[serial]
fn test_interop_passthroughs() {
    let device = initialized_device();
    let interop = device.dx_interop().unwrap();
    let driver = device.driver();
    let dx_device = 0x100 as *mut c_void;
    let dx_texture = 0x200 as *mut c_void;
    let share_handle = 0x300 as *mut c_void;

    unsafe {
        let interop_device = interop.open_device(dx_device).unwrap();
        assert_eq!(driver.open_interop_devices(), 1);

        interop.set_resource_share_handle(dx_texture, share_handle).unwrap();
        let object = interop.register_object(interop_device,
                                             dx_texture,
                                             1,
                                             gl::TEXTURE_2D,
                                             InteropAccess::ReadWrite)
                            .unwrap();
        assert_eq!(driver.interop_object_access(object), Some(1));

        interop.object_access(object, InteropAccess::ReadOnly).unwrap();
        assert_eq!(driver.interop_object_access(object), Some(0));

        interop.lock_objects(interop_device, &mut [object]).unwrap();
        assert_eq!(driver.is_interop_object_locked(object), Some(true));

        // Locked objects can't be unregistered.
        match interop.unregister_object(interop_device, object) {
            Err(Error::DXInteropCallFailed("wglDXUnregisterObjectNV",
                                           WindowingApiError::BadOperation)) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        interop.unlock_objects(interop_device, &mut [object]).unwrap();
        assert_eq!(driver.is_interop_object_locked(object), Some(false));
        interop.unregister_object(interop_device, object).unwrap();
        assert_eq!(driver.interop_object_access(object), None);

        interop.close_device(interop_device).unwrap();
        assert_eq!(driver.open_interop_devices(), 0);
    }
}

#[test]
#[serial]
fn test_interop_failures() {
    let device = initialized_device();
    let interop = device.dx_interop().unwrap();

    error::clear_last_error();
    unsafe {
        match interop.open_device(std::ptr::null_mut()) {
            Err(Error::DXInteropCallFailed("wglDXOpenDeviceNV", WindowingApiError::BadParameter)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        let interop_device = interop.open_device(0x100 as *mut c_void).unwrap();
        match interop.register_object(interop_device,
                                      std::ptr::null_mut(),
                                      1,
                                      gl::TEXTURE_2D,
                                      InteropAccess::WriteDiscard) {
            Err(Error::DXInteropCallFailed("wglDXRegisterObjectNV", _)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        interop.close_device(interop_device).unwrap();
        assert!(interop.close_device(interop_device).is_err());
    }
    assert!(error::last_error().unwrap().contains("wglDXCloseDeviceNV"));
}
