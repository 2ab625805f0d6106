use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;
use std::thread;

use valhalla_bridge::{get_route, init_valhalla};

const CONFIRMATION: &str = "Valhalla Inicializado Correctamente (Mock)";
const SUCCESS: &str = r#"{ "trip": { "status": "success" } }"#;

fn read(value: *const c_char) -> String {
    assert!(!value.is_null());
    unsafe { CStr::from_ptr(value) }.to_str().unwrap().to_owned()
}

#[test]
fn initialize_with_config_path() {
    assert_eq!(read(init_valhalla(c"/data/config.json".as_ptr())), CONFIRMATION);
}

#[test]
fn initialize_with_empty_or_missing_path() {
    assert_eq!(read(init_valhalla(c"".as_ptr())), CONFIRMATION);
    assert_eq!(read(init_valhalla(ptr::null())), CONFIRMATION);
}

#[test]
fn route_from_madrid() {
    assert_eq!(read(get_route(40.4168, -3.7038)), SUCCESS);
}

#[test]
fn route_with_out_of_range_latitude() {
    assert_eq!(read(get_route(999.0, 0.0)), SUCCESS);
    assert_eq!(read(get_route(-90.0, 180.0)), SUCCESS);
}

#[test]
fn concurrent_calls_match_sequential_results() {
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            thread::spawn(move || {
                for step in 0..200 {
                    let lat = f64::from(worker) * 10.0 - 40.0;
                    let lon = f64::from(step) - 100.0;
                    assert_eq!(read(get_route(lat, lon)), SUCCESS);
                    assert_eq!(read(init_valhalla(c"/data/config.json".as_ptr())), CONFIRMATION);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
