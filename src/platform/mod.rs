//! Platform abstraction layer
//!
//! Browser/native differences for storage access and run seeding.

/// Browser LocalStorage, if the page has one
#[cfg(target_arch = "wasm32")]
pub fn storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Milliseconds since the epoch (native)
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Milliseconds since the epoch (browser clock)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Seed for a fresh session when none was requested
pub fn clock_seed() -> u64 {
    now_ms() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_seed_moves_forward() {
        let a = clock_seed();
        let b = clock_seed();
        assert!(a > 0);
        assert!(b >= a);
    }
}
