//! Runs the dispatcher locally against a recorded EventBridge payload.
//!
//! Lookups are answered from an optional JSON fixture (`{"i-...": InstanceRecord}`)
//! and the notification is printed instead of published.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use ec2_alert_core::descriptor::InstanceRecord;
use ec2_alert_lambda::adapters::inventory::InstanceInventory;
use ec2_alert_lambda::adapters::publisher::NotificationPublisher;
use ec2_alert_lambda::config::AlertConfig;
use ec2_alert_lambda::handlers::dispatch::handle_lifecycle_event;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "replay", about = "Replay a recorded EC2 lifecycle event offline")]
struct Cli {
    /// Recorded event payload (JSON)
    #[arg(long)]
    event: PathBuf,
    /// Instance records keyed by instance id (JSON object)
    #[arg(long)]
    inventory: Option<PathBuf>,
    /// Topic the notification would be published to
    #[arg(
        long,
        env = "SNS_TOPIC_ARN",
        default_value = "arn:aws:sns:local:000000000000:ec2-alerts-replay"
    )]
    topic_arn: String,
}

struct FixtureInventory {
    records: HashMap<String, InstanceRecord>,
}

impl InstanceInventory for FixtureInventory {
    fn describe_instance(
        &self,
        instance_id: &str,
        _region: &str,
    ) -> Result<Option<InstanceRecord>, String> {
        if self.records.is_empty() {
            return Err("offline replay: no inventory fixture loaded".to_string());
        }
        Ok(self.records.get(instance_id).cloned())
    }
}

struct StdoutPublisher;

impl NotificationPublisher for StdoutPublisher {
    fn publish(&self, topic_arn: &str, subject: &str, body: &str) -> Result<(), String> {
        println!("--- topic: {topic_arn}\n--- subject: {subject}\n{body}");
        Ok(())
    }
}

fn read_json(path: &Path) -> Result<Value, String> {
    let text = fs::read_to_string(path)
        .map_err(|error| format!("failed to read {}: {error}", path.display()))?;
    serde_json::from_str(&text)
        .map_err(|error| format!("invalid JSON in {}: {error}", path.display()))
}

fn load_inventory(path: Option<&Path>) -> Result<FixtureInventory, String> {
    let records = match path {
        Some(path) => serde_json::from_value(read_json(path)?)
            .map_err(|error| format!("invalid inventory fixture: {error}"))?,
        None => HashMap::new(),
    };
    Ok(FixtureInventory { records })
}

fn run(cli: Cli) -> Result<(), String> {
    let config = AlertConfig::from_lookup(|_| Some(cli.topic_arn.clone()))?;
    let event = read_json(&cli.event)?;
    let inventory = load_inventory(cli.inventory.as_deref())?;

    let response = handle_lifecycle_event(&event, &config, &inventory, &StdoutPublisher);
    let rendered = serde_json::to_string_pretty(&response)
        .map_err(|error| format!("failed to serialize response: {error}"))?;
    println!("--- response\n{rendered}");
    Ok(())
}

fn main() {
    if let Err(message) = run(Cli::parse()) {
        eprintln!("error: {message}");
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fixture_fails_every_lookup() {
        let inventory = FixtureInventory {
            records: HashMap::new(),
        };
        assert!(inventory.describe_instance("i-1", "us-east-1").is_err());
    }

    #[test]
    fn fixture_lookup_misses_map_to_none() {
        let inventory = FixtureInventory {
            records: HashMap::from([("i-1".to_string(), InstanceRecord::default())]),
        };
        assert_eq!(inventory.describe_instance("i-2", "us-east-1"), Ok(None));
        assert!(matches!(
            inventory.describe_instance("i-1", "us-east-1"),
            Ok(Some(_))
        ));
    }

    #[test]
    fn cli_accepts_event_and_inventory_paths() {
        let cli = Cli::try_parse_from([
            "replay",
            "--event",
            "event.json",
            "--inventory",
            "inventory.json",
            "--topic-arn",
            "arn:aws:sns:us-east-1:1:t",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.event, PathBuf::from("event.json"));
        assert_eq!(cli.inventory, Some(PathBuf::from("inventory.json")));
        assert_eq!(cli.topic_arn, "arn:aws:sns:us-east-1:1:t");
    }
}
