use thiserror::Error;

/// Reasons an inbound lifecycle event cannot be turned into a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Event payload must be a JSON object")]
    NotAnObject,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field {0} must be a string")]
    NotAString(String),

    #[error("Instance item {index} at {path} has no instanceId")]
    MissingInstanceId { path: String, index: usize },

    #[error("No instances listed at {0}")]
    EmptyInstanceList(String),
}

impl EventError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingField(path.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_path() {
        assert_eq!(
            EventError::missing("region").to_string(),
            "Missing required field: region"
        );
        assert_eq!(
            EventError::MissingInstanceId {
                path: "detail.requestParameters.instancesSet.items".to_string(),
                index: 2,
            }
            .to_string(),
            "Instance item 2 at detail.requestParameters.instancesSet.items has no instanceId"
        );
    }
}
