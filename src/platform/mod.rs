//! Platform abstraction layer
//!
//! The browser host lives in `web`; native builds drive a `Session`
//! directly from the command-line runner.

#[cfg(target_arch = "wasm32")]
pub mod web;
