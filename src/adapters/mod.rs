//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements        | Connects to                    |
//! |--------------|-------------------|--------------------------------|
//! | `melac`      | HvacPort          | vendor CN105 driver (FFI)      |
//! | `nvs`        | ConfigPort        | NVS / in-memory store          |
//! |              | StoragePort       |                                |
//! | `log_sink`   | NotificationSink  | serial log output              |
//! | `sysinfo`    | —                 | uptime + heap counters         |
//! | `device_id`  | —                 | factory MAC → accessory name   |
//!
//! The HAP stack's notification surface is wired in the firmware binary,
//! where the raise-event FFI symbol lives.

pub mod device_id;
pub mod log_sink;
pub mod melac;
pub mod nvs;
pub mod sysinfo;
