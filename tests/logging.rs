//! Runs in its own process so the bridge logger is the only one installed.

use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::ptr;
use std::sync::Mutex;

use valhalla_bridge::{
    get_route, init_valhalla, valhalla_error_free, valhalla_error_message, valhalla_error_t,
    valhalla_log_config_init, valhalla_log_config_t, valhalla_log_init, valhalla_log_level_t,
    valhalla_log_record_t,
};

static RECORDS: Mutex<Vec<(valhalla_log_level_t, String, String)>> = Mutex::new(Vec::new());

fn text(value: *const c_char) -> String {
    unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned()
}

extern "C" fn collect(record: *const valhalla_log_record_t, user_data: *mut c_void) {
    assert_eq!(user_data as usize, 0xabc);
    let record = unsafe { &*record };
    RECORDS
        .lock()
        .unwrap()
        .push((record.level, text(record.target), text(record.message)));
}

fn config(filter: &'static CStr) -> valhalla_log_config_t {
    let mut config = valhalla_log_config_t {
        level: valhalla_log_level_t::VALHALLA_LOG_LEVEL_OFF,
        filter: ptr::null(),
        callback: None,
        user_data: ptr::null_mut(),
    };
    valhalla_log_config_init(&mut config);
    config.filter = filter.as_ptr();
    config.callback = Some(collect);
    config.user_data = 0xabc as *mut c_void;
    config
}

fn init(config: &valhalla_log_config_t) -> Result<(), String> {
    let mut error: *mut valhalla_error_t = ptr::null_mut();
    if valhalla_log_init(config, &mut error) {
        assert!(error.is_null());
        return Ok(());
    }
    let message = text(valhalla_error_message(error));
    valhalla_error_free(error);
    Err(message)
}

fn take_records() -> Vec<(valhalla_log_level_t, String, String)> {
    std::mem::take(&mut *RECORDS.lock().unwrap())
}

#[test]
fn routing_calls_log_through_callback() {
    init(&config(c"ValhallaNative=debug")).unwrap();

    get_route(40.4168, -3.7038);
    init_valhalla(c"/data/config.json".as_ptr());
    init_valhalla(ptr::null());

    let records = take_records();
    assert_eq!(
        records,
        vec![
            (
                valhalla_log_level_t::VALHALLA_LOG_LEVEL_DEBUG,
                "ValhallaNative".to_owned(),
                "computing route from: 40.416800, -3.703800".to_owned(),
            ),
            (
                valhalla_log_level_t::VALHALLA_LOG_LEVEL_DEBUG,
                "ValhallaNative".to_owned(),
                "initializing with config: /data/config.json".to_owned(),
            ),
            (
                valhalla_log_level_t::VALHALLA_LOG_LEVEL_DEBUG,
                "ValhallaNative".to_owned(),
                "initializing with config: <null>".to_owned(),
            ),
        ]
    );

    let path = b"/data/\xffconfig.json\0";
    assert_eq!(
        text(init_valhalla(path.as_ptr() as *const c_char)),
        "Valhalla Inicializado Correctamente (Mock)"
    );
    assert_eq!(
        take_records(),
        vec![(
            valhalla_log_level_t::VALHALLA_LOG_LEVEL_DEBUG,
            "ValhallaNative".to_owned(),
            "initializing with config: /data/\u{fffd}config.json".to_owned(),
        )]
    );

    // Reconfiguring replaces the active filter.
    init(&config(c"ValhallaNative=info")).unwrap();
    get_route(0.0, 0.0);
    assert!(take_records().is_empty());

    let err = init(&config(c"ValhallaNative=loud")).unwrap_err();
    assert_eq!(
        err,
        "invalid log filter `ValhallaNative=loud`: invalid level `loud`"
    );

    // A rejected configuration leaves the previous one in place.
    get_route(0.0, 0.0);
    assert!(take_records().is_empty());
}
