//! AWS-oriented adapters and handlers for EC2 lifecycle alerts.
//!
//! This crate owns runtime integration details (the Lambda dispatcher, the
//! inventory and publish adapter seams, configuration, and structured logging)
//! on top of the pure primitives in `ec2_alert_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
