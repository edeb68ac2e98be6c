use serde::{Deserialize, Serialize};

pub const NAME_TAG_KEY: &str = "Name";
pub const MISSING_NAME: &str = "No Name Tag";
pub const UNKNOWN_VALUE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTag {
    pub key: String,
    pub value: String,
}

/// Attributes the inventory reports for one instance, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub instance_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<InstanceTag>,
    pub instance_type: Option<String>,
    /// Only populated by EC2 for Windows instances.
    pub platform: Option<String>,
    pub platform_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceDescriptor {
    pub instance_id: String,
    pub name: String,
    pub instance_type: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstanceDescriptor {
    /// Normalizes `record` for `requested_id`; a record describing some other
    /// instance is rejected.
    pub fn from_record(requested_id: &str, record: &InstanceRecord) -> Result<Self, String> {
        if let Some(reported_id) = record.instance_id.as_deref() {
            if reported_id != requested_id {
                return Err(format!(
                    "inventory returned instance {reported_id} for {requested_id}"
                ));
            }
        }

        let name = record
            .tags
            .iter()
            .find(|tag| tag.key == NAME_TAG_KEY)
            .map(|tag| tag.value.clone())
            .unwrap_or_else(|| MISSING_NAME.to_string());

        Ok(Self {
            instance_id: requested_id.to_string(),
            name,
            instance_type: non_blank(record.instance_type.as_deref())
                .unwrap_or(UNKNOWN_VALUE)
                .to_string(),
            platform: non_blank(record.platform.as_deref())
                .or_else(|| non_blank(record.platform_details.as_deref()))
                .unwrap_or(UNKNOWN_VALUE)
                .to_string(),
            error: None,
        })
    }

    pub fn unavailable(instance_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            name: MISSING_NAME.to_string(),
            instance_type: UNKNOWN_VALUE.to_string(),
            platform: UNKNOWN_VALUE.to_string(),
            error: Some(error.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
