//! Single-line JSON log records on stderr, picked up by CloudWatch Logs.

use serde_json::{json, Value};

pub fn log_info(component: &str, event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": component,
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

pub fn log_error(component: &str, event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": component,
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
