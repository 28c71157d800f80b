//! Host surfaces for the veneer runtime: an in-memory headless DOM for
//! tests and server-side hosting, and the real browser surface on
//! wasm32.

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::*;
