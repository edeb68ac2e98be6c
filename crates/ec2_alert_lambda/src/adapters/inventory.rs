use ec2_alert_core::descriptor::InstanceRecord;

/// Single-instance lookup against the compute inventory.
///
/// `Ok(None)` means the inventory answered but listed no such instance.
pub trait InstanceInventory {
    fn describe_instance(
        &self,
        instance_id: &str,
        region: &str,
    ) -> Result<Option<InstanceRecord>, String>;
}
