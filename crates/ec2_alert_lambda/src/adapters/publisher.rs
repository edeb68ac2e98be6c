pub trait NotificationPublisher {
    fn publish(&self, topic_arn: &str, subject: &str, body: &str) -> Result<(), String>;
}
