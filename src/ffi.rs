//! Shared utilities for the bridge's C FFI surface.

use std::ffi::CStr;
use std::os::raw::c_char;

/// Copies a caller-supplied C string, decoding invalid UTF-8 lossily.
pub(crate) fn read_optional_cstr(value: *const c_char) -> Option<String> {
    if value.is_null() {
        return None;
    }
    // Safety: caller guarantees a valid, NUL-terminated C string.
    let cstr = unsafe { CStr::from_ptr(value) };
    Some(cstr.to_string_lossy().into_owned())
}
