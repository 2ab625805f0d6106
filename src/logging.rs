//! Logging for the bridge.
//!
//! The bridge only logs under two targets: the `ValhallaNative` tag used by the routing
//! entry points, and the crate's own module paths. A filter therefore holds one level per
//! target rather than a general directive list. Directives naming any other target are
//! accepted and ignored, so a host-wide `RUST_LOG` can be reused as is.
//!
//! On Android the first routing call installs the logger with the defaults (DEBUG to
//! logcat). Elsewhere records are discarded until `valhalla_log_init` is called.

use std::os::raw::{c_char, c_void};
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, RwLock};

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::{Lazy, OnceCell};

use crate::android;
use crate::bridge::LOG_TAG;
use crate::error::{BridgeError, ErrorSlot, to_cstring, valhalla_error_t};
use crate::ffi::read_optional_cstr;

const CRATE_TARGET: &str = "valhalla_bridge";
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Debug;

static BRIDGE_LOGGER: Lazy<BridgeLogger> = Lazy::new(BridgeLogger::default);
/// Whether `log::set_logger` accepted the bridge logger.
static INSTALLED: OnceCell<bool> = OnceCell::new();
/// Set once the host has applied its own configuration.
static CONFIGURED: AtomicBool = AtomicBool::new(false);
#[cfg_attr(not(target_os = "android"), allow(dead_code))]
static PLATFORM_DEFAULT: Once = Once::new();

/// Log level values for bridge logging.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub enum valhalla_log_level_t {
    VALHALLA_LOG_LEVEL_OFF = 0,
    VALHALLA_LOG_LEVEL_ERROR = 1,
    VALHALLA_LOG_LEVEL_WARN = 2,
    VALHALLA_LOG_LEVEL_INFO = 3,
    VALHALLA_LOG_LEVEL_DEBUG = 4,
    VALHALLA_LOG_LEVEL_TRACE = 5,
}

impl From<valhalla_log_level_t> for LevelFilter {
    fn from(value: valhalla_log_level_t) -> Self {
        use valhalla_log_level_t::*;
        match value {
            VALHALLA_LOG_LEVEL_OFF => LevelFilter::Off,
            VALHALLA_LOG_LEVEL_ERROR => LevelFilter::Error,
            VALHALLA_LOG_LEVEL_WARN => LevelFilter::Warn,
            VALHALLA_LOG_LEVEL_INFO => LevelFilter::Info,
            VALHALLA_LOG_LEVEL_DEBUG => LevelFilter::Debug,
            VALHALLA_LOG_LEVEL_TRACE => LevelFilter::Trace,
        }
    }
}

impl From<Level> for valhalla_log_level_t {
    fn from(value: Level) -> Self {
        use valhalla_log_level_t::*;
        match value {
            Level::Error => VALHALLA_LOG_LEVEL_ERROR,
            Level::Warn => VALHALLA_LOG_LEVEL_WARN,
            Level::Info => VALHALLA_LOG_LEVEL_INFO,
            Level::Debug => VALHALLA_LOG_LEVEL_DEBUG,
            Level::Trace => VALHALLA_LOG_LEVEL_TRACE,
        }
    }
}

/// Structured log record delivered to a C callback.
///
/// String pointers are only valid for the duration of the callback and must not be retained.
/// `module_path` and `file` may be null when unavailable. `line` is 0 when unknown.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct valhalla_log_record_t {
    pub level: valhalla_log_level_t,
    pub target: *const c_char,
    pub message: *const c_char,
    pub module_path: *const c_char,
    pub file: *const c_char,
    pub line: u32,
}

/// Callback invoked for each log record emitted by the bridge.
///
/// The callback may be invoked from any thread that calls into the bridge.
#[allow(non_camel_case_types)]
pub type valhalla_log_callback_t =
    Option<extern "C" fn(record: *const valhalla_log_record_t, user_data: *mut c_void)>;

/// Configuration for initializing bridge logging.
///
/// `filter`, when non-null, is a comma-separated list of `level`, `target` or
/// `target=level` directives and overrides `level`. When `filter` is null the `RUST_LOG`
/// environment variable is used if set. Otherwise `level` applies to both bridge targets.
/// With a null `callback` records go to logcat on Android and to stderr elsewhere.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct valhalla_log_config_t {
    pub level: valhalla_log_level_t,
    pub filter: *const c_char,
    pub callback: valhalla_log_callback_t,
    pub user_data: *mut c_void,
}

/// Per-target levels for the two targets the bridge logs under.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct BridgeFilter {
    tag: LevelFilter,
    internal: LevelFilter,
}

impl BridgeFilter {
    fn uniform(level: LevelFilter) -> Self {
        Self {
            tag: level,
            internal: level,
        }
    }

    /// Parses a filter string. A bare level applies to every target without its own
    /// directive, regardless of order.
    fn parse(spec: &str) -> Result<Self, String> {
        let mut fallback = None;
        let mut tag = None;
        let mut internal = None;

        for directive in spec.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            let (target, level) = match directive.split_once('=') {
                Some((target, level)) => {
                    let target = target.trim();
                    if target.is_empty() {
                        return Err(format!("missing target in `{directive}`"));
                    }
                    (target, parse_level(target, level)?)
                }
                None => match parse_level(directive, directive) {
                    Ok(level) => {
                        fallback = Some(level);
                        continue;
                    }
                    Err(_) => (directive, LevelFilter::Trace),
                },
            };

            if target == LOG_TAG {
                tag = Some(level);
            } else if is_crate_target(target) {
                internal = Some(level);
            }
        }

        let fallback = fallback.unwrap_or(LevelFilter::Off);
        Ok(Self {
            tag: tag.unwrap_or(fallback),
            internal: internal.unwrap_or(fallback),
        })
    }

    fn level_for(&self, target: &str) -> LevelFilter {
        if target == LOG_TAG {
            self.tag
        } else if is_crate_target(target) {
            self.internal
        } else {
            LevelFilter::Off
        }
    }

    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level_for(metadata.target())
    }

    fn max_level(&self) -> LevelFilter {
        Ord::max(self.tag, self.internal)
    }
}

fn is_crate_target(target: &str) -> bool {
    target
        .strip_prefix(CRATE_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

fn parse_level(target: &str, value: &str) -> Result<LevelFilter, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Err(format!("missing log level for target `{target}`")),
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(format!("invalid level `{other}`")),
    }
}

/// Where enabled records are written.
#[derive(Clone, Copy)]
enum Sink {
    Platform,
    Callback {
        callback: extern "C" fn(*const valhalla_log_record_t, *mut c_void),
        user_data: usize,
    },
}

impl Sink {
    fn from_config(config: Option<&valhalla_log_config_t>) -> Self {
        match config.and_then(|config| config.callback.map(|callback| (config, callback))) {
            Some((config, callback)) => Sink::Callback {
                callback,
                user_data: config.user_data as usize,
            },
            None => Sink::Platform,
        }
    }

    fn emit(self, record: &Record) {
        match self {
            Sink::Platform => android::write_platform(record),
            Sink::Callback {
                callback,
                user_data,
            } => {
                let target = to_cstring(record.target());
                let message = to_cstring(&record.args().to_string());
                let module_path = record.module_path().map(to_cstring);
                let file = record.file().map(to_cstring);
                let c_record = valhalla_log_record_t {
                    level: record.level().into(),
                    target: target.as_ptr(),
                    message: message.as_ptr(),
                    module_path: module_path.as_deref().map_or(ptr::null(), |v| v.as_ptr()),
                    file: file.as_deref().map_or(ptr::null(), |v| v.as_ptr()),
                    line: record.line().unwrap_or(0),
                };
                callback(&c_record, user_data as *mut c_void);
            }
        }
    }
}

#[derive(Clone, Copy)]
struct Settings {
    filter: BridgeFilter,
    sink: Sink,
}

struct BridgeLogger {
    settings: RwLock<Settings>,
}

impl Default for BridgeLogger {
    fn default() -> Self {
        Self {
            settings: RwLock::new(Settings {
                filter: BridgeFilter::uniform(DEFAULT_LEVEL),
                sink: Sink::Platform,
            }),
        }
    }
}

impl BridgeLogger {
    fn settings(&self) -> Settings {
        *self.settings.read().unwrap_or_else(|err| err.into_inner())
    }

    fn replace(&self, settings: Settings) {
        *self.settings.write().unwrap_or_else(|err| err.into_inner()) = settings;
    }
}

impl Log for BridgeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.settings().filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        let settings = self.settings();
        if settings.filter.enabled(record.metadata()) {
            settings.sink.emit(record);
        }
    }

    fn flush(&self) {}
}

fn install() -> Result<(), BridgeError> {
    if *INSTALLED.get_or_init(|| log::set_logger(&*BRIDGE_LOGGER).is_ok()) {
        Ok(())
    } else {
        Err(BridgeError::LoggerTaken)
    }
}

/// Installs the logger with its default settings unless the host configured it already.
///
/// A logger installed by someone else wins; the bridge then stays silent.
#[cfg_attr(not(target_os = "android"), allow(dead_code))]
pub(crate) fn install_platform_default() {
    PLATFORM_DEFAULT.call_once(|| {
        if install().is_ok() && !CONFIGURED.load(Ordering::Acquire) {
            log::set_max_level(BRIDGE_LOGGER.settings().filter.max_level());
        }
    });
}

fn resolve_filter(
    config: Option<&valhalla_log_config_t>,
    env_filter: Option<String>,
) -> Result<BridgeFilter, BridgeError> {
    if let Some(filter) = config.and_then(|config| read_optional_cstr(config.filter)) {
        return BridgeFilter::parse(&filter)
            .map_err(|reason| BridgeError::InvalidLogFilter { filter, reason });
    }

    if let Some(filter) = env_filter {
        return BridgeFilter::parse(&filter)
            .map_err(|reason| BridgeError::InvalidEnvFilter { filter, reason });
    }

    let level = config.map_or(DEFAULT_LEVEL, |config| config.level.into());
    Ok(BridgeFilter::uniform(level))
}

/// Initializes default logging configuration values.
///
/// The defaults select DEBUG logging for the bridge targets and use no callback.
#[unsafe(no_mangle)]
pub extern "C" fn valhalla_log_config_init(config: *mut valhalla_log_config_t) {
    if config.is_null() {
        return;
    }
    // Safety: caller provided a writable config pointer.
    unsafe {
        config.write(valhalla_log_config_t {
            level: valhalla_log_level_t::VALHALLA_LOG_LEVEL_DEBUG,
            filter: ptr::null(),
            callback: None,
            user_data: ptr::null_mut(),
        });
    }
}

/// Initializes or reconfigures logging for the bridge.
///
/// If `config` is null, defaults are used. On failure the previous configuration stays
/// active and `out_error` receives an error to free with `valhalla_error_free`.
#[unsafe(no_mangle)]
pub extern "C" fn valhalla_log_init(
    config: *const valhalla_log_config_t,
    out_error: *mut *mut valhalla_error_t,
) -> bool {
    let errors = ErrorSlot::new(out_error);
    // Safety: caller provided either null or a valid config pointer.
    let config = unsafe { config.as_ref() };

    let settings = resolve_filter(config, std::env::var("RUST_LOG").ok()).and_then(|filter| {
        install()?;
        Ok(Settings {
            filter,
            sink: Sink::from_config(config),
        })
    });

    match settings {
        Ok(settings) => {
            CONFIGURED.store(true, Ordering::Release);
            BRIDGE_LOGGER.replace(settings);
            log::set_max_level(settings.filter.max_level());
            true
        }
        Err(err) => {
            errors.set(&err);
            false
        }
    }
}
