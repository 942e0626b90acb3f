//! melhap firmware — main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  MelAcDriver      HapStackSink     NvsAdapter    SysInfo       │
//! │  (HvacPort, FFI)  (Notifications)  (ConfigPort)  (uptime/heap) │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            AccessoryService (pure logic)               │    │
//! │  │  attribute db · bridge mappings · prefs                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The vendored HAP stack calls back into the exported `melhap_hap_*`
//! symbols below (characteristic reads/writes, identify, factory
//! reset); the vendored MEL-AC driver feeds the lock-free event queue.
//! The main loop drains that queue, forwards events to the service, and
//! drives the activity LED.

#![deny(unused_must_use)]

use std::ffi::CString;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use melhap::adapters::device_id;
use melhap::adapters::melac::MelAcDriver;
use melhap::adapters::nvs::NvsAdapter;
use melhap::adapters::sysinfo::SysInfo;
use melhap::app::ports::NotificationSink;
use melhap::app::service::{AccessoryService, LedFeedback};
use melhap::config::SystemConfig;
use melhap::drivers::blink::{BlinkEngine, Pattern};
use melhap::drivers::status_led::StatusLed;
use melhap::events::drain_events;
use melhap::hap::db::{ACCESSORY_AID, ACCESSORY_CATEGORY, CharacteristicId, Format};
use melhap::hap::{HapError, HapValue};

// ── Vendored HAP stack ────────────────────────────────────────
//
// The component owns transport, sessions, pairing and the attribute
// table (generated from the same IID layout as `hap::db`). It calls the
// exported `melhap_hap_*` functions for application reads and writes.

unsafe extern "C" {
    fn hap_bridge_start(
        category: u8,
        name: *const core::ffi::c_char,
        serial: *const core::ffi::c_char,
        fw_version: *const core::ffi::c_char,
    ) -> bool;
    fn hap_bridge_config_valid() -> bool;
    fn hap_bridge_raise_event(aid: u64, iid: u64);
}

/// Notification adapter over the vendored stack's raise-event call.
struct HapStackSink;

impl NotificationSink for HapStackSink {
    fn raise(
        &mut self,
        _service: melhap::hap::db::ServiceId,
        characteristic: CharacteristicId,
    ) {
        // SAFETY: raise-event is documented re-entrant-safe by the
        // component and the IID comes from the attribute database.
        unsafe { hap_bridge_raise_event(ACCESSORY_AID, characteristic.iid()) };
    }
}

// ── Shared runtime for the FFI callbacks ──────────────────────

struct Runtime {
    service: AccessoryService,
    hvac: MelAcDriver,
    nvs: NvsAdapter,
    sink: HapStackSink,
}

static RUNTIME: Mutex<Option<Runtime>> = Mutex::new(None);
static IDENTIFY_REQUESTED: AtomicBool = AtomicBool::new(false);
static FACTORY_RESET_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Status codes shared with the C side of the bridge.
const HAP_OK: i32 = 0;
const HAP_ERR_INVALID_STATE: i32 = 1;
const HAP_ERR_INVALID_VALUE: i32 = 2;

fn hap_error_code(err: HapError) -> i32 {
    match err {
        HapError::InvalidState => HAP_ERR_INVALID_STATE,
        HapError::InvalidValue | HapError::NotFound => HAP_ERR_INVALID_VALUE,
    }
}

/// Characteristic read callback for the vendored stack. Every value fits
/// in an f64; the C side knows the wire format from its own table.
#[unsafe(no_mangle)]
pub extern "C" fn melhap_hap_read(iid: u64, out: *mut f64) -> i32 {
    if out.is_null() {
        return HAP_ERR_INVALID_VALUE;
    }
    let Some(id) = CharacteristicId::from_iid(iid) else {
        return HAP_ERR_INVALID_VALUE;
    };
    let mut guard = match RUNTIME.lock() {
        Ok(g) => g,
        Err(_) => return HAP_ERR_INVALID_STATE,
    };
    let Some(rt) = guard.as_mut() else {
        return HAP_ERR_INVALID_STATE;
    };
    match rt.service.read(id, &rt.hvac) {
        Ok(value) => {
            let raw = match value {
                HapValue::Bool(b) => f64::from(u8::from(b)),
                HapValue::U8(v) => f64::from(v),
                HapValue::Int(v) => f64::from(v),
                HapValue::Float(v) => f64::from(v),
            };
            // SAFETY: `out` checked non-null; the stack passes a valid
            // pointer for the duration of the call.
            unsafe { *out = raw };
            HAP_OK
        }
        Err(e) => hap_error_code(e),
    }
}

/// Characteristic write callback for the vendored stack.
#[unsafe(no_mangle)]
pub extern "C" fn melhap_hap_write(iid: u64, raw: f64) -> i32 {
    let Some(id) = CharacteristicId::from_iid(iid) else {
        return HAP_ERR_INVALID_VALUE;
    };
    let value = match id.descriptor().format {
        Format::Bool => HapValue::Bool(raw != 0.0),
        Format::UInt8 => HapValue::U8(raw as u8),
        Format::Int => HapValue::Int(raw as i32),
        Format::Float => HapValue::Float(raw as f32),
    };
    let mut guard = match RUNTIME.lock() {
        Ok(g) => g,
        Err(_) => return HAP_ERR_INVALID_STATE,
    };
    let Some(rt) = guard.as_mut() else {
        return HAP_ERR_INVALID_STATE;
    };
    match rt
        .service
        .write(id, value, &mut rt.hvac, &rt.nvs, &mut rt.sink)
    {
        Ok(()) => HAP_OK,
        Err(e) => hap_error_code(e),
    }
}

/// Identify callback — flagged here, served by the main loop's LED.
#[unsafe(no_mangle)]
pub extern "C" fn melhap_hap_identify() {
    IDENTIFY_REQUESTED.store(true, Ordering::Relaxed);
}

/// Factory reset request from the stack (pairing wipe already done on
/// the C side; the app-side preference purge runs in the main loop).
#[unsafe(no_mangle)]
pub extern "C" fn melhap_hap_factory_reset() {
    FACTORY_RESET_REQUESTED.store(true, Ordering::Relaxed);
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("melhap v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();
    config.validate().map_err(|e| anyhow!("config: {}", e))?;

    // ── 2. Preferences from NVS (or defaults) ─────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            // Continue without persistence; NVS should self-heal on the
            // next reboot.
            warn!("NVS init failed ({}), preferences will not persist", e);
            NvsAdapter::default()
        }
    };
    let mut service = AccessoryService::new();
    service.load_prefs(&nvs);

    // ── 3. Activity LED ───────────────────────────────────────
    let peripherals = esp_idf_svc::hal::peripherals::Peripherals::take()
        .context("peripherals already taken")?;
    let led_pin = esp_idf_svc::hal::gpio::PinDriver::output(peripherals.pins.gpio2)
        .context("LED GPIO init")?;
    let mut led = StatusLed::new(led_pin, config.led_active_low);
    let mut blink = BlinkEngine::new();
    info!("activity LED on GPIO{}", config.led_gpio);

    // ── 4. Vendor driver (events first, then serial) ──────────
    let hvac = MelAcDriver::start(0).map_err(|e| anyhow!(e))?;

    // ── 5. Accessory identity ─────────────────────────────────
    let mac = device_id::read_mac();
    let name = device_id::accessory_name(&mac);
    info!("accessory: {} (host {})", name, device_id::hostname(&mac));

    let c_name = CString::new(name.as_str()).context("accessory name")?;
    let c_fw = CString::new(env!("CARGO_PKG_VERSION")).context("fw version")?;

    // ── 6. Publish the runtime, then start the stack ──────────
    //
    // Stack callbacks can fire as soon as hap_bridge_start returns, so
    // the runtime must be in place first.
    {
        let mut guard = RUNTIME.lock().expect("runtime lock");
        *guard = Some(Runtime {
            service,
            hvac,
            nvs,
            sink: HapStackSink,
        });
    }

    // SAFETY: the component copies the strings during start.
    let provisioned = unsafe { hap_bridge_config_valid() };
    if provisioned {
        let started = unsafe {
            hap_bridge_start(
                ACCESSORY_CATEGORY,
                c_name.as_ptr(),
                c_name.as_ptr(),
                c_fw.as_ptr(),
            )
        };
        if started {
            let mut guard = RUNTIME.lock().expect("runtime lock");
            if let Some(rt) = guard.as_mut() {
                rt.service.set_server_running(true);
            }
            info!("HAP server started");
        } else {
            warn!("HAP server failed to start");
        }
    } else {
        info!("=== Accessory is not provisioned");
    }

    // ── 7. Main loop ──────────────────────────────────────────
    let sysinfo = SysInfo::new();
    let mut next_heartbeat = u64::from(config.heartbeat_secs);
    let mut tick_tock = false;

    loop {
        let now_ms = sysinfo.uptime_ms();
        let mut feedback: Option<LedFeedback> = None;

        {
            let mut guard = RUNTIME.lock().expect("runtime lock");
            if let Some(rt) = guard.as_mut() {
                drain_events(|event| {
                    if let Some(fb) = rt.service.handle_event(event, &rt.hvac, &mut rt.sink) {
                        feedback = Some(fb);
                    }
                });

                if FACTORY_RESET_REQUESTED.swap(false, Ordering::Relaxed) {
                    rt.service.factory_reset(&mut rt.nvs);
                }
            }
        }

        if IDENTIFY_REQUESTED.swap(false, Ordering::Relaxed) {
            info!("identify requested");
            blink.start(Pattern::Identify, now_ms);
        } else if let Some(fb) = feedback {
            let duration = match fb {
                LedFeedback::Update => config.blink_update_ms,
                LedFeedback::Sync => config.blink_sync_ms,
                LedFeedback::Room => config.blink_room_ms,
            };
            blink.start(Pattern::Pulse(duration), now_ms);
        }
        led.set(blink.tick(now_ms));

        let uptime = sysinfo.uptime_secs();
        if uptime >= next_heartbeat {
            tick_tock = !tick_tock;
            info!(
                "{} uptime: {}s, heap: {} free ({} min)",
                if tick_tock { "Tick" } else { "Tock" },
                uptime,
                sysinfo.free_heap_bytes(),
                sysinfo.min_free_heap_bytes(),
            );
            next_heartbeat = uptime + u64::from(config.heartbeat_secs);
        }

        esp_idf_svc::hal::delay::FreeRtos::delay_ms(config.loop_interval_ms);
    }
}
