//! Display webhook notifier.
//!
//! POSTs `{mode, turbidity}` to the wall display's `/shower-update`
//! endpoint after every tick. Strictly fire-and-forget: short timeouts,
//! no retries, failures logged and dropped — a slow or absent display
//! must never stall the control loop.

use std::time::Duration;

use log::warn;

use crate::app::events::StatusReport;
use crate::app::ports::StatusSink;

const HTTP_TIMEOUT: Duration = Duration::from_secs(2);

pub struct WebhookNotifier {
    agent: ureq::Agent,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(HTTP_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .build();
        Self {
            agent,
            url: url.into(),
        }
    }
}

impl StatusSink for WebhookNotifier {
    fn publish(&mut self, report: &StatusReport) {
        let payload = serde_json::json!({
            "mode": report.mode,
            "turbidity": report.snapshot.turbidity,
        });
        if let Err(e) = self.agent.post(&self.url).send_json(payload) {
            warn!("display webhook failed: {e}");
        }
    }
}
