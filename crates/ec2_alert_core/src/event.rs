use serde_json::Value;

use crate::error::EventError;
use crate::routing::InstanceListLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    IamUser,
    AssumedRole,
    Other,
}

/// The `detail.userIdentity` block of a CloudTrail-backed event.
///
/// Every field is optional; a block with unexpected types is kept with those
/// fields cleared rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityBlock {
    pub kind: Option<String>,
    pub user_name: Option<String>,
    pub principal_id: Option<String>,
}

impl IdentityBlock {
    pub fn from_value(value: &Value) -> Self {
        Self {
            kind: optional_str(value, "type"),
            user_name: optional_str(value, "userName"),
            principal_id: optional_str(value, "principalId"),
        }
    }

    pub fn identity_kind(&self) -> IdentityKind {
        match self.kind.as_deref() {
            Some("IAMUser") => IdentityKind::IamUser,
            Some("AssumedRole") => IdentityKind::AssumedRole,
            _ => IdentityKind::Other,
        }
    }
}

/// An EC2 lifecycle notification as delivered by EventBridge.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleEvent {
    pub region: String,
    pub account: String,
    /// Required only once the action is routed; see [`LifecycleEvent::required_time`].
    pub time: Option<String>,
    pub event_name: String,
    pub identity: Option<IdentityBlock>,
    detail: Value,
}

impl LifecycleEvent {
    pub fn from_value(event: &Value) -> Result<Self, EventError> {
        if !event.is_object() {
            return Err(EventError::NotAnObject);
        }

        let region = required_str(event, "region", "region")?;
        let account = required_str(event, "account", "account")?;
        let time = optional_str(event, "time");

        let detail = event
            .get("detail")
            .filter(|detail| detail.is_object())
            .ok_or_else(|| EventError::missing("detail"))?;
        let event_name = required_str(detail, "eventName", "detail.eventName")?;
        let identity = detail
            .get("userIdentity")
            .filter(|identity| identity.is_object())
            .map(IdentityBlock::from_value);

        Ok(Self {
            region,
            account,
            time,
            event_name,
            identity,
            detail: detail.clone(),
        })
    }

    pub fn required_time(&self) -> Result<&str, EventError> {
        self.time.as_deref().ok_or_else(|| EventError::missing("time"))
    }

    /// Instance ids listed at `location`, in payload order.
    pub fn instance_ids(&self, location: InstanceListLocation) -> Result<Vec<String>, EventError> {
        let path = location.path();
        let items = self
            .detail
            .get(location.container_key())
            .and_then(|container| container.get("instancesSet"))
            .and_then(|instances_set| instances_set.get("items"))
            .and_then(Value::as_array)
            .ok_or_else(|| EventError::missing(path))?;

        if items.is_empty() {
            return Err(EventError::EmptyInstanceList(path.to_string()));
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.get("instanceId")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| EventError::MissingInstanceId {
                        path: path.to_string(),
                        index,
                    })
            })
            .collect()
    }
}

fn required_str(value: &Value, key: &str, path: &str) -> Result<String, EventError> {
    match value.get(key) {
        None | Some(Value::Null) => Err(EventError::missing(path)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(EventError::NotAString(path.to_string())),
    }
}

fn optional_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn stop_event() -> Value {
        json!({
            "region": "eu-west-1",
            "account": "123456789012",
            "time": "2026-02-14T10:00:00Z",
            "detail": {
                "eventName": "StopInstances",
                "userIdentity": {"type": "IAMUser", "userName": "clouduser"},
                "requestParameters": {
                    "instancesSet": {
                        "items": [{"instanceId": "i-0b"}, {"instanceId": "i-0a"}]
                    }
                }
            }
        })
    }

    #[test]
    fn parses_required_fields_and_identity() {
        let event = LifecycleEvent::from_value(&stop_event()).expect("event should parse");

        assert_eq!(event.region, "eu-west-1");
        assert_eq!(event.account, "123456789012");
        assert_eq!(event.required_time(), Ok("2026-02-14T10:00:00Z"));
        assert_eq!(event.event_name, "StopInstances");
        let identity = event.identity.expect("identity should be present");
        assert_eq!(identity.identity_kind(), IdentityKind::IamUser);
        assert_eq!(identity.user_name.as_deref(), Some("clouduser"));
    }

    #[test]
    fn extracts_instance_ids_in_payload_order() {
        let event = LifecycleEvent::from_value(&stop_event()).expect("event should parse");
        let ids = event
            .instance_ids(InstanceListLocation::RequestParameters)
            .expect("ids should extract");
        assert_eq!(ids, vec!["i-0b".to_string(), "i-0a".to_string()]);
    }

    #[test]
    fn rejects_missing_region() {
        let mut payload = stop_event();
        payload
            .as_object_mut()
            .expect("fixture is an object")
            .remove("region");

        let error = LifecycleEvent::from_value(&payload).expect_err("region is required");
        assert_eq!(error, EventError::missing("region"));
    }

    #[test]
    fn missing_time_is_deferred_until_required() {
        let mut payload = stop_event();
        payload
            .as_object_mut()
            .expect("fixture is an object")
            .remove("time");

        let event = LifecycleEvent::from_value(&payload).expect("time is not needed to route");
        assert_eq!(event.event_name, "StopInstances");
        assert_eq!(event.required_time(), Err(EventError::missing("time")));
    }

    #[test]
    fn rejects_non_string_event_name() {
        let mut payload = stop_event();
        payload["detail"]["eventName"] = json!(42);

        let error = LifecycleEvent::from_value(&payload).expect_err("eventName must be a string");
        assert_eq!(error, EventError::NotAString("detail.eventName".to_string()));
    }

    #[test]
    fn rejects_non_object_payload() {
        let error = LifecycleEvent::from_value(&json!(["not", "an", "event"]))
            .expect_err("arrays are not events");
        assert_eq!(error, EventError::NotAnObject);
    }

    #[test]
    fn missing_identity_block_is_allowed() {
        let mut payload = stop_event();
        payload["detail"]
            .as_object_mut()
            .expect("detail is an object")
            .remove("userIdentity");

        let event = LifecycleEvent::from_value(&payload).expect("identity is optional");
        assert!(event.identity.is_none());
    }

    #[test]
    fn identity_fields_with_wrong_types_are_dropped() {
        let identity = IdentityBlock::from_value(&json!({"type": "IAMUser", "userName": 7}));
        assert_eq!(identity.identity_kind(), IdentityKind::IamUser);
        assert!(identity.user_name.is_none());
    }

    #[test]
    fn wrong_location_is_reported_as_missing() {
        let event = LifecycleEvent::from_value(&stop_event()).expect("event should parse");
        let error = event
            .instance_ids(InstanceListLocation::ResponseElements)
            .expect_err("stop events carry no response instance set");
        assert_eq!(
            error,
            EventError::missing("detail.responseElements.instancesSet.items")
        );
    }

    #[test]
    fn empty_instance_list_is_rejected() {
        let mut payload = stop_event();
        payload["detail"]["requestParameters"]["instancesSet"]["items"] = json!([]);

        let event = LifecycleEvent::from_value(&payload).expect("event should parse");
        let error = event
            .instance_ids(InstanceListLocation::RequestParameters)
            .expect_err("empty list should be rejected");
        assert!(matches!(error, EventError::EmptyInstanceList(_)));
    }

    #[test]
    fn item_without_instance_id_is_rejected() {
        let mut payload = stop_event();
        payload["detail"]["requestParameters"]["instancesSet"]["items"] =
            json!([{"instanceId": "i-0a"}, {"imageId": "ami-1"}]);

        let event = LifecycleEvent::from_value(&payload).expect("event should parse");
        let error = event
            .instance_ids(InstanceListLocation::RequestParameters)
            .expect_err("every item needs an instanceId");
        assert_eq!(
            error,
            EventError::MissingInstanceId {
                path: "detail.requestParameters.instancesSet.items".to_string(),
                index: 1,
            }
        );
    }
}
