//! Uptime and heap counters for the heartbeat log.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` and the
//!   ESP-IDF heap API.
//! - **host** — `std::time::Instant`; heap figures read as zero.

pub struct SysInfo {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SysInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysInfo {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Seconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_secs(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000
    }

    /// Seconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }

    /// Milliseconds since boot (monotonic). Drives the blink engine.
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since boot (monotonic). Drives the blink engine.
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Free internal heap in bytes (0 on host).
    #[cfg(target_os = "espidf")]
    pub fn free_heap_bytes(&self) -> u32 {
        unsafe { esp_idf_svc::sys::esp_get_free_heap_size() }
    }

    /// Free internal heap in bytes (0 on host).
    #[cfg(not(target_os = "espidf"))]
    pub fn free_heap_bytes(&self) -> u32 {
        0
    }

    /// Smallest free heap seen since boot (0 on host).
    #[cfg(target_os = "espidf")]
    pub fn min_free_heap_bytes(&self) -> u32 {
        unsafe { esp_idf_svc::sys::esp_get_minimum_free_heap_size() }
    }

    /// Smallest free heap seen since boot (0 on host).
    #[cfg(not(target_os = "espidf"))]
    pub fn min_free_heap_bytes(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let info = SysInfo::new();
        let a = info.uptime_ms();
        let b = info.uptime_ms();
        assert!(b >= a);
    }
}
