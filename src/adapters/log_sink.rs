//! Log-based status sink adapter.
//!
//! Renders the per-tick status line through the `log` facade. A future
//! MQTT or display adapter implements the same trait; [`SinkFanout`]
//! broadcasts to however many are wired.

use log::info;

use crate::app::events::StatusReport;
use crate::app::ports::StatusSink;

/// Adapter that logs every [`StatusReport`].
pub struct LogStatusSink;

impl LogStatusSink {
    pub fn new() -> Self {
        Self
    }
}

impl StatusSink for LogStatusSink {
    fn publish(&mut self, report: &StatusReport) {
        info!(
            "STATUS | mode={} | flow_in={:.2} L/min | flow_out={:.2} L/min | turbidity={:.1} NTU",
            report.mode,
            report.snapshot.flow_in,
            report.snapshot.flow_out,
            report.snapshot.turbidity,
        );
    }
}

/// Broadcasts each report to several sinks in registration order.
pub struct SinkFanout {
    sinks: Vec<Box<dyn StatusSink>>,
}

impl SinkFanout {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn push(&mut self, sink: Box<dyn StatusSink>) {
        self.sinks.push(sink);
    }
}

impl StatusSink for SinkFanout {
    fn publish(&mut self, report: &StatusReport) {
        for sink in &mut self.sinks {
            sink.publish(report);
        }
    }
}
