use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const NOTIFICATION_SENT: &str = "Notification sent";
pub const UNHANDLED_EVENT: &str = "Unhandled event";

/// Lambda invocation result; `body` is a JSON-encoded object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn sent(event_name: &str, instance_ids: &[String]) -> Self {
        Self::from_payload(
            200,
            json!({
                "message": NOTIFICATION_SENT,
                "eventName": event_name,
                "instances": instance_ids,
            }),
        )
    }

    pub fn unhandled(event_name: &str) -> Self {
        Self::from_payload(
            400,
            json!({
                "message": UNHANDLED_EVENT,
                "eventName": event_name,
            }),
        )
    }

    pub fn failure(error: &str, event_name: Option<&str>) -> Self {
        let mut payload = Map::new();
        payload.insert("error".to_string(), Value::from(error));
        if let Some(event_name) = event_name {
            payload.insert("eventName".to_string(), Value::from(event_name));
        }
        Self::from_payload(500, Value::Object(payload))
    }

    fn from_payload(status_code: u16, payload: Value) -> Self {
        Self {
            status_code,
            body: payload.to_string(),
        }
    }
}
