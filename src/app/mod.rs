//! Application core: the port boundary and the per-tick control service.

pub mod events;
pub mod ports;
pub mod service;
