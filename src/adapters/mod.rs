//! Thin I/O drivers implementing the port traits in [`crate::app::ports`].
//!
//! | Adapter             | Ports                                   |
//! |---------------------|------------------------------------------|
//! | [`relay_board`]     | relay writes + board digital/analog reads |
//! | [`webhook`]         | status → wall display                    |
//! | [`log_sink`]        | status → log (plus fan-out)              |
//! | [`sim`]             | all hardware ports, in memory            |

pub mod log_sink;
pub mod relay_board;
pub mod sim;
pub mod webhook;
