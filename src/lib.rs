//! C FFI entry points for the offline navigation routing engine.
//!
//! The routing calls are mocks that answer with fixed responses until the
//! engine itself is linked in.

mod android;
mod bridge;
mod error;
mod ffi;
mod logging;

pub use bridge::{
    INIT_CONFIRMATION, LOG_TAG, ROUTE_SUCCESS, compute_route, get_route, init_valhalla, initialize,
};
pub use error::{BridgeError, valhalla_error_free, valhalla_error_message, valhalla_error_t};
pub use logging::{
    valhalla_log_callback_t, valhalla_log_config_init, valhalla_log_config_t, valhalla_log_init,
    valhalla_log_level_t, valhalla_log_record_t,
};
