use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput;
use ec2_alert_core::contract::InvocationResponse;
use ec2_alert_core::descriptor::{InstanceRecord, InstanceTag};
use ec2_alert_lambda::adapters::inventory::InstanceInventory;
use ec2_alert_lambda::adapters::publisher::NotificationPublisher;
use ec2_alert_lambda::config::AlertConfig;
use ec2_alert_lambda::handlers::dispatch::handle_lifecycle_event;
use ec2_alert_lambda::logging::{log_error, log_info};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};

struct Ec2Inventory {
    sdk_config: aws_config::SdkConfig,
}

impl InstanceInventory for Ec2Inventory {
    fn describe_instance(
        &self,
        instance_id: &str,
        region: &str,
    ) -> Result<Option<InstanceRecord>, String> {
        let ec2_config = aws_sdk_ec2::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        let client = aws_sdk_ec2::Client::from_conf(ec2_config);
        let instance_id = instance_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .describe_instances()
                    .instance_ids(instance_id)
                    .send()
                    .await
                    .map(|output| first_instance_record(&output))
                    .map_err(|error| {
                        format!(
                            "failed to describe instance: {}",
                            aws_sdk_ec2::error::DisplayErrorContext(&error)
                        )
                    })
            })
        })
    }
}

struct SnsPublisher {
    sns_client: aws_sdk_sns::Client,
}

impl NotificationPublisher for SnsPublisher {
    fn publish(&self, topic_arn: &str, subject: &str, body: &str) -> Result<(), String> {
        let client = self.sns_client.clone();
        let topic_arn = topic_arn.to_string();
        let subject = subject.to_string();
        let body = body.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .publish()
                    .topic_arn(topic_arn)
                    .subject(subject)
                    .message(body)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!(
                            "failed to publish to sns: {}",
                            aws_sdk_sns::error::DisplayErrorContext(&error)
                        )
                    })
            })
        })
    }
}

struct RuntimeDependencies {
    config: AlertConfig,
    inventory: Ec2Inventory,
    publisher: SnsPublisher,
}

fn first_instance_record(output: &DescribeInstancesOutput) -> Option<InstanceRecord> {
    let instance = output.reservations().first()?.instances().first()?;

    Some(InstanceRecord {
        instance_id: instance.instance_id().map(str::to_string),
        tags: instance
            .tags()
            .iter()
            .filter_map(|tag| {
                Some(InstanceTag {
                    key: tag.key()?.to_string(),
                    value: tag.value().unwrap_or_default().to_string(),
                })
            })
            .collect(),
        instance_type: instance
            .instance_type()
            .map(|instance_type| instance_type.as_str().to_string()),
        platform: instance
            .platform()
            .map(|platform| platform.as_str().to_string()),
        platform_details: instance.platform_details().map(str::to_string),
    })
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<InvocationResponse, Error> {
    Ok(handle_lifecycle_event(
        &event.payload,
        &deps.config,
        &deps.inventory,
        &deps.publisher,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = AlertConfig::from_env().map_err(|message| {
        log_error("runtime", "startup_failed", json!({ "error": message.clone() }));
        Error::from(message)
    })?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        config,
        inventory: Ec2Inventory {
            sdk_config: aws_config.clone(),
        },
        publisher: SnsPublisher {
            sns_client: aws_sdk_sns::Client::new(&aws_config),
        },
    };
    log_info(
        "runtime",
        "runtime_started",
        json!({ "topic_arn": deps.config.topic_arn.clone() }),
    );

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, deps).await
    }))
    .await
}
