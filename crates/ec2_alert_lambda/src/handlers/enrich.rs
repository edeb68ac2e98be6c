use ec2_alert_core::descriptor::InstanceDescriptor;
use serde_json::json;

use crate::adapters::inventory::InstanceInventory;
use crate::logging::log_error;

const COMPONENT: &str = "enricher";

/// Looks up one instance. Lookup failures come back as a degraded descriptor,
/// never as an error, so one bad id cannot sink the rest of the batch.
pub fn enrich(
    inventory: &dyn InstanceInventory,
    instance_id: &str,
    region: &str,
) -> InstanceDescriptor {
    let lookup = inventory
        .describe_instance(instance_id, region)
        .and_then(|record| {
            record.ok_or_else(|| format!("instance {instance_id} not found in {region}"))
        })
        .and_then(|record| InstanceDescriptor::from_record(instance_id, &record));

    match lookup {
        Ok(descriptor) => descriptor,
        Err(error) => {
            log_error(
                COMPONENT,
                "instance_lookup_failed",
                json!({
                    "instance_id": instance_id,
                    "region": region,
                    "error": error.clone(),
                }),
            );
            InstanceDescriptor::unavailable(instance_id, error)
        }
    }
}

/// One descriptor per id, in the order given.
pub fn enrich_all(
    inventory: &dyn InstanceInventory,
    instance_ids: &[String],
    region: &str,
) -> Vec<InstanceDescriptor> {
    instance_ids
        .iter()
        .map(|instance_id| enrich(inventory, instance_id, region))
        .collect()
}
