//! Errors reported by the auxiliary exports.
//!
//! The routing entry points never fail. Only logging setup reports errors, through an
//! optional `valhalla_error_t **` out-parameter that the caller frees.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Opaque error type for C callers.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct valhalla_error_t;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("invalid log filter `{filter}`: {reason}")]
    InvalidLogFilter { filter: String, reason: String },
    #[error("invalid RUST_LOG value `{filter}`: {reason}")]
    InvalidEnvFilter { filter: String, reason: String },
    #[error("logging already initialized by another logger")]
    LoggerTaken,
}

/// Heap object behind a `valhalla_error_t` pointer.
struct ErrorHandle {
    message: CString,
}

impl From<&BridgeError> for ErrorHandle {
    fn from(error: &BridgeError) -> Self {
        Self {
            message: to_cstring(&error.to_string()),
        }
    }
}

/// Converts text for C, replacing interior NULs with spaces.
pub(crate) fn to_cstring(value: &str) -> CString {
    CString::new(value.replace('\0', " ")).unwrap_or_default()
}

/// Caller-provided `valhalla_error_t **`, possibly null.
pub(crate) struct ErrorSlot {
    out: *mut *mut valhalla_error_t,
}

impl ErrorSlot {
    /// Wraps `out` and resets it to null.
    pub(crate) fn new(out: *mut *mut valhalla_error_t) -> Self {
        if !out.is_null() {
            // Safety: caller provided a valid out_error pointer.
            unsafe { *out = ptr::null_mut() };
        }
        Self { out }
    }

    /// Stores a new handle for `error`. Ignored when the caller passed null.
    pub(crate) fn set(&self, error: &BridgeError) {
        if self.out.is_null() {
            return;
        }
        let handle = Box::new(ErrorHandle::from(error));
        // Safety: out is non-null and points to writable memory.
        unsafe { *self.out = Box::into_raw(handle).cast() };
    }
}

/// Returns the message for an error allocated by the bridge.
///
/// The returned pointer is valid as long as the error handle is alive.
#[unsafe(no_mangle)]
pub extern "C" fn valhalla_error_message(error: *const valhalla_error_t) -> *const c_char {
    // Safety: error is null or a handle allocated by `ErrorSlot::set`.
    match unsafe { error.cast::<ErrorHandle>().as_ref() } {
        Some(handle) => handle.message.as_ptr(),
        None => ptr::null(),
    }
}

/// Frees an error returned by the bridge. Null is ignored.
#[unsafe(no_mangle)]
pub extern "C" fn valhalla_error_free(error: *mut valhalla_error_t) {
    if error.is_null() {
        return;
    }
    // Safety: error is a handle allocated by `ErrorSlot::set` and not yet freed.
    drop(unsafe { Box::from_raw(error.cast::<ErrorHandle>()) });
}
