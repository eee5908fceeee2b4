//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memopad_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe to validate core crate wiring independently from the HTTP
    // server runtime setup.
    println!("memopad_core ping={}", memopad_core::ping());
    println!("memopad_core version={}", memopad_core::core_version());
}
