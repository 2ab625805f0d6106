//! Routing entry points exported to the mobile app.
//!
//! Both entry points are placeholders until the routing engine is linked in:
//! they log what they received and answer with fixed responses. Returned
//! pointers reference static data owned by the library. Callers must not free
//! or modify them, and they remain valid for as long as the library is loaded.
//!
//! On Android the first call routes the debug records to logcat without any
//! logging setup from the app.

use std::ffi::CStr;
use std::os::raw::c_char;

use crate::ffi::read_optional_cstr;

/// Log target (and logcat tag) used by the routing entry points.
pub const LOG_TAG: &str = "ValhallaNative";

/// Response returned by [`initialize`].
pub const INIT_CONFIRMATION: &CStr = c"Valhalla Inicializado Correctamente (Mock)";

/// Response returned by [`compute_route`].
pub const ROUTE_SUCCESS: &CStr = c"{ \"trip\": { \"status\": \"success\" } }";

/// Prepares the routing engine from the configuration at `config_path`.
///
/// The path is only logged; it is never opened or validated.
pub fn initialize(config_path: &str) -> &'static CStr {
    #[cfg(target_os = "android")]
    crate::logging::install_platform_default();
    log::debug!(target: LOG_TAG, "initializing with config: {config_path}");
    INIT_CONFIRMATION
}

/// Computes a route starting at the given coordinates.
///
/// Coordinates are not range checked and do not affect the response.
pub fn compute_route(lat: f64, lon: f64) -> &'static CStr {
    #[cfg(target_os = "android")]
    crate::logging::install_platform_default();
    log::debug!(target: LOG_TAG, "computing route from: {lat:.6}, {lon:.6}");
    ROUTE_SUCCESS
}

/// Initializes the routing engine.
///
/// `config_path` may be null. The returned string is static and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn init_valhalla(config_path: *const c_char) -> *const c_char {
    let config_path = read_optional_cstr(config_path);
    initialize(config_path.as_deref().unwrap_or("<null>")).as_ptr()
}

/// Computes a route from `lat`/`lon`.
///
/// The returned string is static JSON and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn get_route(lat: f64, lon: f64) -> *const c_char {
    compute_route(lat, lon).as_ptr()
}
