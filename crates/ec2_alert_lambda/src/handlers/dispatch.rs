use ec2_alert_core::actor::resolve_actor;
use ec2_alert_core::contract::InvocationResponse;
use ec2_alert_core::error::EventError;
use ec2_alert_core::event::LifecycleEvent;
use ec2_alert_core::message::{compose, MessageFooter};
use ec2_alert_core::routing::{route, ActionRoute, RouteDecision};
use serde_json::{json, Value};
use thiserror::Error;

use crate::adapters::inventory::InstanceInventory;
use crate::adapters::publisher::NotificationPublisher;
use crate::config::AlertConfig;
use crate::handlers::enrich::enrich_all;
use crate::logging::{log_error, log_info};

const COMPONENT: &str = "dispatcher";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Malformed(#[from] EventError),

    #[error("Failed to publish {event_name} notification: {message}")]
    PublishFailed { event_name: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub instance_ids: Vec<String>,
    pub degraded_lookups: usize,
}

/// Entry point for one lifecycle event. Every failure is folded into the
/// returned response; nothing is raised past this function.
pub fn handle_lifecycle_event(
    event: &Value,
    config: &AlertConfig,
    inventory: &dyn InstanceInventory,
    publisher: &dyn NotificationPublisher,
) -> InvocationResponse {
    log_info(COMPONENT, "event_received", event.clone());

    let lifecycle_event = match LifecycleEvent::from_value(event) {
        Ok(value) => value,
        Err(error) => {
            log_error(
                COMPONENT,
                "malformed_event",
                json!({ "error": error.to_string() }),
            );
            return InvocationResponse::failure(&error.to_string(), None);
        }
    };

    let action_route = match route(&lifecycle_event.event_name) {
        RouteDecision::Supported(value) => value,
        RouteDecision::Unsupported(event_name) => {
            log_info(
                COMPONENT,
                "unsupported_action",
                json!({ "event_name": event_name.clone() }),
            );
            return InvocationResponse::unhandled(&event_name);
        }
    };

    let event_name = lifecycle_event.event_name.as_str();
    match notify(&lifecycle_event, &action_route, config, inventory, publisher) {
        Ok(outcome) => {
            log_info(
                COMPONENT,
                "notification_published",
                json!({
                    "event_name": event_name,
                    "region": lifecycle_event.region.clone(),
                    "instance_count": outcome.instance_ids.len(),
                    "degraded_lookups": outcome.degraded_lookups,
                }),
            );
            InvocationResponse::sent(event_name, &outcome.instance_ids)
        }
        Err(error) => {
            log_error(
                COMPONENT,
                "notification_failed",
                json!({
                    "event_name": event_name,
                    "error": error.to_string(),
                }),
            );
            InvocationResponse::failure(&error.to_string(), Some(event_name))
        }
    }
}

/// Extracts, enriches, composes, and publishes the notification for a routed event.
pub fn notify(
    event: &LifecycleEvent,
    action_route: &ActionRoute,
    config: &AlertConfig,
    inventory: &dyn InstanceInventory,
    publisher: &dyn NotificationPublisher,
) -> Result<DispatchOutcome, DispatchError> {
    let time = event.required_time()?;
    let instance_ids = event.instance_ids(action_route.location)?;
    let descriptors = enrich_all(inventory, &instance_ids, &event.region);
    let actor = resolve_actor(event.identity.as_ref());

    let message = compose(
        action_route.subject_fragment,
        &descriptors,
        &MessageFooter {
            actor: &actor,
            account: &event.account,
            region: &event.region,
            time,
        },
    );

    publisher
        .publish(&config.topic_arn, &message.subject, &message.body)
        .map_err(|message| DispatchError::PublishFailed {
            event_name: event.event_name.clone(),
            message,
        })?;

    Ok(DispatchOutcome {
        degraded_lookups: descriptors
            .iter()
            .filter(|descriptor| descriptor.is_degraded())
            .count(),
        instance_ids,
    })
}
