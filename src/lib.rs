//! Infinistream controller library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. Hardware access happens only through the port traits in
//! [`app::ports`]; the adapters in [`adapters`] are the thin I/O drivers
//! that implement them.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod mode;
pub mod relays;
pub mod sensors;

pub mod error;

pub mod adapters;
