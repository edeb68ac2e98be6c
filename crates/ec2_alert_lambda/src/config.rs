pub const TOPIC_ARN_ENV: &str = "SNS_TOPIC_ARN";

/// Process-wide settings, read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertConfig {
    pub topic_arn: String,
}

impl AlertConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let topic_arn = lookup(TOPIC_ARN_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| format!("{TOPIC_ARN_ENV} must be configured"))?;

        Ok(Self { topic_arn })
    }
}
