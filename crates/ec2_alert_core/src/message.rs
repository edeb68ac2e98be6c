use crate::descriptor::InstanceDescriptor;

pub const SUBJECT_PREFIX: &str = "Alert: ";

/// Blank lines appended after the footer; mail clients subscribed to the
/// topic have always received the body with this padding.
const TRAILING_PADDING: &str = "\n\n\n\n\n\n\n\n\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFooter<'a> {
    pub actor: &'a str,
    pub account: &'a str,
    pub region: &'a str,
    /// Rendered verbatim, followed by ` UTC`.
    pub time: &'a str,
}

pub fn compose(
    subject_fragment: &str,
    descriptors: &[InstanceDescriptor],
    footer: &MessageFooter<'_>,
) -> NotificationMessage {
    let blocks: Vec<String> = descriptors.iter().map(render_instance_block).collect();

    let mut body = format!("{subject_fragment}\n\n");
    if !blocks.is_empty() {
        body.push_str(&blocks.join("\n\n"));
        body.push_str("\n\n");
    }
    body.push_str(&format!(
        "Initiated By: {}\nAWS Account: {}\nRegion: {}\nTime: {} UTC",
        footer.actor, footer.account, footer.region, footer.time
    ));
    body.push_str(TRAILING_PADDING);

    NotificationMessage {
        subject: format!("{SUBJECT_PREFIX}{subject_fragment}"),
        body,
    }
}

fn render_instance_block(descriptor: &InstanceDescriptor) -> String {
    if descriptor.is_degraded() {
        return format!("Instance: {} (details unavailable)", descriptor.instance_id);
    }

    format!(
        "Instance: {}\nName: {}\nType: {}\nPlatform: {}",
        descriptor.instance_id, descriptor.name, descriptor.instance_type, descriptor.platform
    )
}
