// glbridge/src/platform/generic/mock.rs
//
//! A simulated WGL driver for tests.
//!
//! The mock keeps all of its windows, device contexts, contexts and interop objects in one
//! process-wide table, mirroring how the real handles are process-global. The current context is
//! tracked per thread. Extension entry points are only handed out while a context is current on
//! the calling thread, as on WGL. Windows can only be destroyed by the thread that created them.
//!
//! Because the state is global, tests using the mock must not run concurrently with each other.

use crate::extensions::{FALSE, TRUE, WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB};
use crate::extensions::{WGL_CONTEXT_CORE_PROFILE_BIT_ARB, WGL_CONTEXT_MAJOR_VERSION_ARB};
use crate::extensions::{WGL_CONTEXT_MINOR_VERSION_ARB, WGL_CONTEXT_PROFILE_MASK_ARB};
use crate::gl;
use crate::gl::types::{GLenum, GLint, GLuint};
use crate::info::{GLProfile, GLVersion};
use crate::interop::InteropObjectHandle;
use crate::pixel_format::{PixelFormat, PixelFormatDescriptor, PixelFormatFlags};
use crate::platform::{Driver, ModuleHandle, SurfaceHandle, WindowHandle};
use crate::{NativeContextHandle, WindowingApiError};

use euclid::default::Size2D;
use fnv::{FnvHashMap, FnvHashSet};
use std::cell::Cell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::ptr;
use std::slice;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

/// The format returned by the legacy `ChoosePixelFormat` path.
pub const MOCK_LEGACY_PIXEL_FORMAT: PixelFormat = PixelFormat(1);
/// The format returned by `wglChoosePixelFormatARB`.
pub const MOCK_ACCELERATED_PIXEL_FORMAT: PixelFormat = PixelFormat(7);

const DEFAULT_MAX_VERSION: GLVersion = GLVersion { major: 4, minor: 6 };

/// Failures to inject into the mock driver. Everything succeeds by default.
#[derive(Clone, Debug, Default)]
pub struct MockFaults {
    pub window_class_registration: bool,
    pub window_creation: bool,
    pub surface_acquisition: bool,
    /// `ChoosePixelFormat` fails.
    pub legacy_pixel_format: bool,
    /// `wglChoosePixelFormatARB` returns FALSE.
    pub accelerated_pixel_format: bool,
    /// `wglChoosePixelFormatARB` succeeds but matches nothing.
    pub no_matching_pixel_format: bool,
    pub describe_pixel_format: bool,
    /// The accelerated format is described with `PFD_GENERIC_FORMAT`.
    pub generic_pixel_format: bool,
    pub set_pixel_format: bool,
    /// `wglCreateContext` fails.
    pub legacy_context_creation: bool,
    /// `wglCreateContextAttribsARB` fails.
    pub versioned_context_creation: bool,
    /// Binding a context fails. Unbinding always succeeds.
    pub make_current: bool,
    pub delete_context: bool,
    /// `wglChoosePixelFormatARB` and `wglCreateContextAttribsARB` don't resolve.
    pub missing_context_creation_extensions: bool,
    /// `wglDXLockObjectsNV` doesn't resolve.
    pub missing_dx_interop: bool,
    /// The highest version `wglCreateContextAttribsARB` accepts. Defaults to 4.6.
    pub max_version: Option<GLVersion>,
}

struct MockSurface {
    window: Option<WindowHandle>,
    pixel_format: Option<PixelFormat>,
}

struct MockContext {
    share_group: u64,
    version: GLVersion,
    profile: GLProfile,
    legacy: bool,
}

struct MockInteropObject {
    device: usize,
    access: GLenum,
    locked: bool,
}

#[derive(Default)]
struct MockState {
    faults: MockFaults,
    next_handle: usize,
    next_share_group: u64,
    window_classes: FnvHashSet<CString>,
    windows: FnvHashMap<WindowHandle, ThreadId>,
    surfaces: FnvHashMap<SurfaceHandle, MockSurface>,
    contexts: FnvHashMap<NativeContextHandle, MockContext>,
    legacy_contexts_created: usize,
    legacy_current_threads: Vec<Option<String>>,
    last_pixel_format_request: Option<Vec<c_int>>,
    last_context_attributes: Option<Vec<c_int>>,
    interop_devices: FnvHashSet<usize>,
    interop_objects: FnvHashMap<usize, MockInteropObject>,
}

impl MockState {
    fn allocate_handle(&mut self) -> usize {
        self.next_handle += 1;
        0x1000 + self.next_handle * 0x10
    }

    fn allocate_share_group(&mut self) -> u64 {
        self.next_share_group += 1;
        self.next_share_group
    }

    fn max_version(&self) -> GLVersion {
        self.faults.max_version.unwrap_or(DEFAULT_MAX_VERSION)
    }
}

lazy_static! {
    static ref STATE: Mutex<MockState> = Mutex::new(MockState::default());
}

thread_local! {
    static CURRENT: Cell<Option<(SurfaceHandle, NativeContextHandle)>> = const { Cell::new(None) };
    static LAST_ERROR: Cell<WindowingApiError> = const { Cell::new(WindowingApiError::Failed) };
}

fn state() -> MutexGuard<'static, MockState> {
    STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn set_last_error(error: WindowingApiError) {
    LAST_ERROR.with(|last_error| last_error.set(error));
}

fn fail<T>(error: WindowingApiError) -> Result<T, WindowingApiError> {
    set_last_error(error);
    Err(error)
}

/// A driver that simulates WGL in memory.
///
/// Creating a `MockDriver` resets the simulation, so create one per test. Clones share the same
/// simulation.
#[derive(Clone, Debug)]
pub struct MockDriver {
    _private: (),
}

impl MockDriver {
    /// Resets the simulation with no faults.
    pub fn new() -> MockDriver {
        MockDriver::with_faults(MockFaults::default())
    }

    /// Resets the simulation with `faults` injected.
    pub fn with_faults(faults: MockFaults) -> MockDriver {
        *state() = MockState { faults, ..MockState::default() };
        CURRENT.with(|current| current.set(None));
        MockDriver { _private: () }
    }

    /// Replaces the injected faults, keeping every live object.
    pub fn set_faults(&self, faults: MockFaults) {
        state().faults = faults;
    }

    pub fn live_windows(&self) -> usize {
        state().windows.len()
    }

    pub fn live_surfaces(&self) -> usize {
        state().surfaces.len()
    }

    pub fn live_contexts(&self) -> usize {
        state().contexts.len()
    }

    /// How many contexts were created through `wglCreateContext`.
    pub fn legacy_contexts_created(&self) -> usize {
        state().legacy_contexts_created
    }

    /// The names of the threads that legacy contexts were made current on, in order.
    pub fn legacy_current_threads(&self) -> Vec<Option<String>> {
        state().legacy_current_threads.clone()
    }

    /// Contexts that share objects have the same share group.
    pub fn share_group(&self, context: NativeContextHandle) -> Option<u64> {
        state().contexts.get(&context).map(|context| context.share_group)
    }

    pub fn context_version(&self, context: NativeContextHandle) -> Option<(GLVersion, GLProfile)> {
        state().contexts.get(&context).map(|context| (context.version, context.profile))
    }

    /// The attributes of the last `wglChoosePixelFormatARB` call, without the terminator.
    pub fn last_pixel_format_request(&self) -> Option<Vec<c_int>> {
        state().last_pixel_format_request.clone()
    }

    /// The attributes of the last `wglCreateContextAttribsARB` call, without the terminator.
    pub fn last_context_attributes(&self) -> Option<Vec<c_int>> {
        state().last_context_attributes.clone()
    }

    pub fn open_interop_devices(&self) -> usize {
        state().interop_devices.len()
    }

    pub fn is_interop_object_locked(&self, object: InteropObjectHandle) -> Option<bool> {
        state().interop_objects.get(&object.0).map(|object| object.locked)
    }

    pub fn interop_object_access(&self, object: InteropObjectHandle) -> Option<GLenum> {
        state().interop_objects.get(&object.0).map(|object| object.access)
    }

    /// Creates a context the way another library would, on a device context without a window.
    ///
    /// The caller owns both; release them with `delete_context()` and `release_surface()`.
    pub fn create_foreign_context(&self) -> (SurfaceHandle, NativeContextHandle) {
        let mut state = state();
        let surface = SurfaceHandle(state.allocate_handle());
        state.surfaces.insert(surface, MockSurface {
            window: None,
            pixel_format: Some(MOCK_ACCELERATED_PIXEL_FORMAT),
        });
        let context = NativeContextHandle::from_u64(state.allocate_handle() as u64);
        let share_group = state.allocate_share_group();
        let version = state.max_version();
        state.contexts.insert(context, MockContext {
            share_group,
            version,
            profile: GLProfile::Compatibility,
            legacy: false,
        });
        (surface, context)
    }
}

impl Driver for MockDriver {
    fn register_window_class(&self, _: Option<ModuleHandle>, class_name: &CStr)
                             -> Result<(), WindowingApiError> {
        let mut state = state();
        if state.faults.window_class_registration {
            return fail(WindowingApiError::Failed);
        }
        state.window_classes.insert(class_name.to_owned());
        Ok(())
    }

    fn create_hidden_window(&self,
                            _: Option<ModuleHandle>,
                            class_name: &CStr,
                            size: Size2D<i32>)
                            -> Result<WindowHandle, WindowingApiError> {
        let mut state = state();
        if state.faults.window_creation || !state.window_classes.contains(class_name) {
            return fail(WindowingApiError::Failed);
        }
        if size.width <= 0 || size.height <= 0 {
            return fail(WindowingApiError::BadParameter);
        }
        let window = WindowHandle(state.allocate_handle());
        state.windows.insert(window, thread::current().id());
        Ok(window)
    }

    fn destroy_window(&self, window: WindowHandle) -> Result<(), WindowingApiError> {
        let mut state = state();
        match state.windows.get(&window) {
            None => fail(WindowingApiError::BadWindow),
            Some(&owner) if owner != thread::current().id() => fail(WindowingApiError::BadAccess),
            Some(_) => {
                state.windows.remove(&window);
                Ok(())
            }
        }
    }

    fn get_surface(&self, window: WindowHandle) -> Result<SurfaceHandle, WindowingApiError> {
        let mut state = state();
        if state.faults.surface_acquisition {
            return fail(WindowingApiError::Failed);
        }
        if !state.windows.contains_key(&window) {
            return fail(WindowingApiError::BadWindow);
        }
        let surface = SurfaceHandle(state.allocate_handle());
        state.surfaces.insert(surface, MockSurface { window: Some(window), pixel_format: None });
        Ok(surface)
    }

    fn release_surface(&self, window: WindowHandle, surface: SurfaceHandle) {
        let mut state = state();
        let owned_by_window = match state.surfaces.get(&surface) {
            Some(mock_surface) => mock_surface.window.map_or(true, |owner| owner == window),
            None => false,
        };
        if owned_by_window {
            state.surfaces.remove(&surface);
        }
    }

    fn choose_pixel_format(&self, surface: SurfaceHandle, _: &PixelFormatDescriptor)
                           -> Result<PixelFormat, WindowingApiError> {
        let state = state();
        if state.faults.legacy_pixel_format {
            return fail(WindowingApiError::BadPixelFormat);
        }
        if !state.surfaces.contains_key(&surface) {
            return fail(WindowingApiError::BadDrawable);
        }
        Ok(MOCK_LEGACY_PIXEL_FORMAT)
    }

    fn describe_pixel_format(&self, surface: SurfaceHandle, pixel_format: PixelFormat)
                             -> Result<PixelFormatDescriptor, WindowingApiError> {
        let state = state();
        if state.faults.describe_pixel_format {
            return fail(WindowingApiError::BadPixelFormat);
        }
        if !state.surfaces.contains_key(&surface) {
            return fail(WindowingApiError::BadDrawable);
        }
        if pixel_format == MOCK_LEGACY_PIXEL_FORMAT {
            Ok(PixelFormatDescriptor::legacy_bootstrap())
        } else if pixel_format == MOCK_ACCELERATED_PIXEL_FORMAT {
            let mut flags = PixelFormatFlags::DRAW_TO_WINDOW |
                PixelFormatFlags::SUPPORT_OPENGL |
                PixelFormatFlags::DOUBLE_BUFFER;
            if state.faults.generic_pixel_format {
                flags |= PixelFormatFlags::GENERIC_FORMAT;
            }
            Ok(PixelFormatDescriptor {
                flags,
                color_bits: 32,
                alpha_bits: 8,
                depth_bits: 24,
                stencil_bits: 8,
            })
        } else {
            fail(WindowingApiError::BadPixelFormat)
        }
    }

    fn set_pixel_format(&self, surface: SurfaceHandle, pixel_format: PixelFormat, _: &PixelFormatDescriptor)
                        -> Result<(), WindowingApiError> {
        let mut state = state();
        if state.faults.set_pixel_format {
            return fail(WindowingApiError::BadPixelFormat);
        }
        let mock_surface = match state.surfaces.get_mut(&surface) {
            Some(mock_surface) => mock_surface,
            None => return fail(WindowingApiError::BadDrawable),
        };
        // A window's pixel format can only be set once.
        match mock_surface.pixel_format {
            Some(current) if current != pixel_format => fail(WindowingApiError::BadPixelFormat),
            _ => {
                mock_surface.pixel_format = Some(pixel_format);
                Ok(())
            }
        }
    }

    fn create_legacy_context(&self, surface: SurfaceHandle)
                             -> Result<NativeContextHandle, WindowingApiError> {
        let mut state = state();
        if state.faults.legacy_context_creation {
            return fail(WindowingApiError::Failed);
        }
        match state.surfaces.get(&surface) {
            None => return fail(WindowingApiError::BadDrawable),
            Some(mock_surface) if mock_surface.pixel_format.is_none() => {
                return fail(WindowingApiError::BadPixelFormat)
            }
            Some(_) => {}
        }

        let context = NativeContextHandle::from_u64(state.allocate_handle() as u64);
        let share_group = state.allocate_share_group();
        let version = state.max_version();
        state.contexts.insert(context, MockContext {
            share_group,
            version,
            profile: GLProfile::Compatibility,
            legacy: true,
        });
        state.legacy_contexts_created += 1;
        Ok(context)
    }

    fn delete_context(&self, context: NativeContextHandle) -> Result<(), WindowingApiError> {
        let mut state = state();
        if state.faults.delete_context {
            return fail(WindowingApiError::BadContext);
        }
        if state.contexts.remove(&context).is_none() {
            return fail(WindowingApiError::BadContext);
        }
        CURRENT.with(|current| {
            if matches!(current.get(), Some((_, current_context)) if current_context == context) {
                current.set(None);
            }
        });
        Ok(())
    }

    fn make_current(&self, target: Option<(SurfaceHandle, NativeContextHandle)>)
                    -> Result<(), WindowingApiError> {
        let (surface, context) = match target {
            None => {
                CURRENT.with(|current| current.set(None));
                return Ok(());
            }
            Some(target) => target,
        };

        let mut state = state();
        if state.faults.make_current {
            return fail(WindowingApiError::Failed);
        }
        let legacy = match state.contexts.get(&context) {
            Some(mock_context) => mock_context.legacy,
            None => return fail(WindowingApiError::BadContext),
        };
        if !state.surfaces.contains_key(&surface) {
            return fail(WindowingApiError::BadDrawable);
        }

        CURRENT.with(|current| current.set(Some((surface, context))));
        if legacy {
            state.legacy_current_threads.push(thread::current().name().map(str::to_owned));
        }
        Ok(())
    }

    fn current_context(&self) -> Option<NativeContextHandle> {
        CURRENT.with(|current| current.get()).map(|(_, context)| context)
    }

    fn get_proc_address(&self, symbol_name: &CStr) -> *const c_void {
        if self.current_context().is_none() {
            return ptr::null();
        }

        let state = state();
        match symbol_name.to_bytes() {
            b"wglChoosePixelFormatARB" if !state.faults.missing_context_creation_extensions => {
                choose_pixel_format_arb as *const c_void
            }
            b"wglCreateContextAttribsARB" if !state.faults.missing_context_creation_extensions => {
                create_context_attribs_arb as *const c_void
            }
            b"glGetString" => get_string as *const c_void,
            b"wglDXOpenDeviceNV" => dx_open_device as *const c_void,
            b"wglDXCloseDeviceNV" => dx_close_device as *const c_void,
            b"wglDXRegisterObjectNV" => dx_register_object as *const c_void,
            b"wglDXUnregisterObjectNV" => dx_unregister_object as *const c_void,
            b"wglDXObjectAccessNV" => dx_object_access as *const c_void,
            b"wglDXLockObjectsNV" if !state.faults.missing_dx_interop => {
                dx_lock_objects as *const c_void
            }
            b"wglDXUnlockObjectsNV" => dx_unlock_objects as *const c_void,
            b"wglDXSetResourceShareHandleNV" => dx_set_resource_share_handle as *const c_void,
            _ => ptr::null(),
        }
    }

    fn last_error(&self) -> WindowingApiError {
        LAST_ERROR.with(|last_error| last_error.get())
    }
}

/// Reads a zero-terminated key/value attribute list, dropping the terminator.
unsafe fn read_attrib_list(list: *const c_int) -> Vec<c_int> {
    let mut attributes = vec![];
    if list.is_null() {
        return attributes;
    }
    let mut index = 0;
    while *list.add(index) != 0 {
        attributes.push(*list.add(index));
        attributes.push(*list.add(index + 1));
        index += 2;
    }
    attributes
}

unsafe extern "system" fn choose_pixel_format_arb(hdc: *mut c_void,
                                                  attrib_i_list: *const c_int,
                                                  _: *const f32,
                                                  max_formats: c_uint,
                                                  formats: *mut c_int,
                                                  format_count: *mut c_uint)
                                                  -> c_int {
    let mut state = state();
    if !state.surfaces.contains_key(&SurfaceHandle(hdc as usize)) {
        set_last_error(WindowingApiError::BadDrawable);
        return FALSE;
    }
    if state.faults.accelerated_pixel_format {
        set_last_error(WindowingApiError::BadPixelFormat);
        return FALSE;
    }

    state.last_pixel_format_request = Some(read_attrib_list(attrib_i_list));
    if state.faults.no_matching_pixel_format || max_formats == 0 {
        *format_count = 0;
    } else {
        *formats = MOCK_ACCELERATED_PIXEL_FORMAT.0;
        *format_count = 1;
    }
    TRUE
}

unsafe extern "system" fn create_context_attribs_arb(hdc: *mut c_void,
                                                     share_context: *mut c_void,
                                                     attrib_list: *const c_int)
                                                     -> *mut c_void {
    let mut state = state();
    let attributes = read_attrib_list(attrib_list);
    state.last_context_attributes = Some(attributes.clone());

    match state.surfaces.get(&SurfaceHandle(hdc as usize)) {
        None => {
            set_last_error(WindowingApiError::BadDrawable);
            return ptr::null_mut();
        }
        Some(mock_surface) if mock_surface.pixel_format.is_none() => {
            set_last_error(WindowingApiError::BadPixelFormat);
            return ptr::null_mut();
        }
        Some(_) => {}
    }
    if state.faults.versioned_context_creation {
        set_last_error(WindowingApiError::Failed);
        return ptr::null_mut();
    }

    let (mut major, mut minor) = (1, 0);
    let mut profile_mask = WGL_CONTEXT_CORE_PROFILE_BIT_ARB;
    for pair in attributes.chunks_exact(2) {
        match pair[0] {
            WGL_CONTEXT_MAJOR_VERSION_ARB => major = pair[1],
            WGL_CONTEXT_MINOR_VERSION_ARB => minor = pair[1],
            WGL_CONTEXT_PROFILE_MASK_ARB => profile_mask = pair[1],
            _ => {}
        }
    }

    let version = GLVersion::new(major as u8, minor as u8);
    if version > state.max_version() {
        set_last_error(WindowingApiError::BadVersion);
        return ptr::null_mut();
    }
    let profile = match profile_mask {
        WGL_CONTEXT_CORE_PROFILE_BIT_ARB => GLProfile::Core,
        WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB => GLProfile::Compatibility,
        _ => {
            set_last_error(WindowingApiError::BadProfile);
            return ptr::null_mut();
        }
    };

    let share_group = if share_context.is_null() {
        state.allocate_share_group()
    } else {
        match state.contexts.get(&NativeContextHandle::from_ptr(share_context)) {
            Some(shared) => shared.share_group,
            None => {
                set_last_error(WindowingApiError::BadContext);
                return ptr::null_mut();
            }
        }
    };

    let context = NativeContextHandle::from_u64(state.allocate_handle() as u64);
    state.contexts.insert(context, MockContext { share_group, version, profile, legacy: false });
    context.as_ptr()
}

unsafe extern "system" fn get_string(name: GLenum) -> *const c_char {
    match name {
        gl::VERSION => c"4.6.0 glbridge mock".as_ptr(),
        gl::VENDOR => c"glbridge".as_ptr(),
        gl::RENDERER => c"Mock Renderer".as_ptr(),
        _ => ptr::null(),
    }
}

unsafe extern "system" fn dx_open_device(dx_device: *mut c_void) -> *mut c_void {
    if dx_device.is_null() {
        set_last_error(WindowingApiError::BadParameter);
        return ptr::null_mut();
    }
    let mut state = state();
    let device = state.allocate_handle();
    state.interop_devices.insert(device);
    device as *mut c_void
}

unsafe extern "system" fn dx_close_device(device: *mut c_void) -> c_int {
    let mut state = state();
    let device = device as usize;
    if !state.interop_devices.remove(&device) {
        set_last_error(WindowingApiError::BadParameter);
        return FALSE;
    }
    state.interop_objects.retain(|_, object| object.device != device);
    TRUE
}

unsafe extern "system" fn dx_set_resource_share_handle(dx_object: *mut c_void, _: *mut c_void)
                                                       -> c_int {
    if dx_object.is_null() {
        set_last_error(WindowingApiError::BadParameter);
        return FALSE;
    }
    TRUE
}

unsafe extern "system" fn dx_register_object(device: *mut c_void,
                                             dx_object: *mut c_void,
                                             _: GLuint,
                                             _: GLenum,
                                             access: GLenum)
                                             -> *mut c_void {
    let mut state = state();
    if dx_object.is_null() || !state.interop_devices.contains(&(device as usize)) {
        set_last_error(WindowingApiError::BadParameter);
        return ptr::null_mut();
    }
    let object = state.allocate_handle();
    state.interop_objects.insert(object, MockInteropObject {
        device: device as usize,
        access,
        locked: false,
    });
    object as *mut c_void
}

unsafe extern "system" fn dx_unregister_object(device: *mut c_void, object: *mut c_void)
                                               -> c_int {
    let mut state = state();
    match state.interop_objects.get(&(object as usize)) {
        Some(mock_object) if mock_object.device == device as usize && !mock_object.locked => {}
        _ => {
            set_last_error(WindowingApiError::BadOperation);
            return FALSE;
        }
    }
    state.interop_objects.remove(&(object as usize));
    TRUE
}

unsafe extern "system" fn dx_object_access(object: *mut c_void, access: GLenum) -> c_int {
    let mut state = state();
    match state.interop_objects.get_mut(&(object as usize)) {
        Some(mock_object) if !mock_object.locked && access <= 2 => {
            mock_object.access = access;
            TRUE
        }
        _ => {
            set_last_error(WindowingApiError::BadOperation);
            FALSE
        }
    }
}

unsafe fn set_objects_locked(device: *mut c_void,
                             count: GLint,
                             objects: *mut *mut c_void,
                             locked: bool)
                             -> c_int {
    if count < 0 || (count > 0 && objects.is_null()) {
        set_last_error(WindowingApiError::BadParameter);
        return FALSE;
    }
    if count == 0 {
        return TRUE;
    }

    let mut state = state();
    let objects = slice::from_raw_parts(objects as *const *mut c_void, count as usize);
    let all_valid = objects.iter().all(|object| {
        match state.interop_objects.get(&(*object as usize)) {
            Some(mock_object) => mock_object.device == device as usize && mock_object.locked != locked,
            None => false,
        }
    });
    if !all_valid {
        set_last_error(WindowingApiError::BadOperation);
        return FALSE;
    }
    for object in objects {
        if let Some(mock_object) = state.interop_objects.get_mut(&(*object as usize)) {
            mock_object.locked = locked;
        }
    }
    TRUE
}

unsafe extern "system" fn dx_lock_objects(device: *mut c_void,
                                          count: GLint,
                                          objects: *mut *mut c_void)
                                          -> c_int {
    set_objects_locked(device, count, objects, true)
}

unsafe extern "system" fn dx_unlock_objects(device: *mut c_void,
                                            count: GLint,
                                            objects: *mut *mut c_void)
                                            -> c_int {
    set_objects_locked(device, count, objects, false)
}
