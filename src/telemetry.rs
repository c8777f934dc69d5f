//! Fire-and-forget analytics events.
//!
//! Events land on the structured log under the `sellmate::analytics` target;
//! nothing here can fail from the caller's perspective.

use tracing::info;

pub fn track_event(name: &str, params: &[(&str, &str)]) {
    info!(target: "sellmate::analytics", event = name, params = ?params, "Analytics event");
}
