//! Platform log sink used when no C callback is configured.
//!
//! On Android records are written to logcat with the record target as the tag,
//! so the routing entry points show up under `ValhallaNative`.

use log::Record;

#[cfg(target_os = "android")]
mod logcat {
    use std::os::raw::{c_char, c_int};

    use log::Level;

    use crate::error::to_cstring;

    // android/log.h priorities
    const ANDROID_LOG_VERBOSE: c_int = 2;
    const ANDROID_LOG_DEBUG: c_int = 3;
    const ANDROID_LOG_INFO: c_int = 4;
    const ANDROID_LOG_WARN: c_int = 5;
    const ANDROID_LOG_ERROR: c_int = 6;

    pub(super) fn priority(level: Level) -> c_int {
        match level {
            Level::Error => ANDROID_LOG_ERROR,
            Level::Warn => ANDROID_LOG_WARN,
            Level::Info => ANDROID_LOG_INFO,
            Level::Debug => ANDROID_LOG_DEBUG,
            Level::Trace => ANDROID_LOG_VERBOSE,
        }
    }

    pub(super) fn write(level: Level, tag: &str, message: &str) {
        // Must not sit at module scope, where cbindgen would export it.
        #[link(name = "log")]
        unsafe extern "C" {
            fn __android_log_write(prio: c_int, tag: *const c_char, text: *const c_char) -> c_int;
        }

        let tag = to_cstring(tag);
        let message = to_cstring(message);
        // Safety: both strings are NUL-terminated and outlive the call.
        unsafe {
            __android_log_write(priority(level), tag.as_ptr(), message.as_ptr());
        }
    }
}

pub(crate) fn write_platform(record: &Record) {
    #[cfg(target_os = "android")]
    {
        logcat::write(record.level(), record.target(), &record.args().to_string());
    }

    #[cfg(not(target_os = "android"))]
    {
        eprintln!("{}", format_line(record));
    }
}

#[cfg(not(target_os = "android"))]
fn format_line(record: &Record) -> String {
    format!("{} {}: {}", record.level(), record.target(), record.args())
}
