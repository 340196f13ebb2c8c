// ABOUTME: Parser for `system status` output.
// ABOUTME: Maps the status report's keywords to a service status.

use crate::model::SystemServiceStatus;

/// Read the service state from the status report. Anything unrecognized is stopped.
pub fn parse_system_status(output: &str) -> SystemServiceStatus {
    let text = output.to_lowercase();
    if text.contains("not running") || text.contains("stopped") {
        SystemServiceStatus::Stopped
    } else if text.contains("starting") {
        SystemServiceStatus::Starting
    } else if text.contains("running") {
        SystemServiceStatus::Running
    } else {
        SystemServiceStatus::Stopped
    }
}
