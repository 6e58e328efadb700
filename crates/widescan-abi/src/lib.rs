#![feature(c_variadic)]
// All extern "C" ABI exports accept raw pointers from C callers under the
// usual unchecked C contract; per-function safety docs would be redundant
// boilerplate.
#![allow(clippy::missing_safety_doc)]
//! # widescan-abi
//!
//! ABI-compatible `extern "C"` boundary for the widescan engine.
//!
//! This crate produces a `cdylib` exposing the wide formatted-scan-from-
//! string surface under the legacy long-double convention: `swscanf` and
//! `vswscanf`, plus the `__nldbl_`-prefixed internal names old binaries
//! resolve. All four symbols delegate to one implementation.
//!
//! # Architecture
//!
//! ```text
//! C caller -> variadic entry -> va_list capture -> engine (widescan-core) -> typed stores -> return
//! ```
//!
//! The engine never sees a pointer; this crate extracts destination
//! addresses from the variadic list guided by the parsed format, runs the
//! scan, and stores each produced value with the narrowing its length
//! modifier dictates.

pub mod store;

// Exported #[no_mangle] symbols would shadow libc's swscanf family inside
// the unit-test binary; integration tests link the normally-built rlib.
#[cfg(not(test))]
pub mod wscanf_abi;
