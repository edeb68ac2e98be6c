//! Shared EC2 lifecycle alert primitives.
//!
//! This crate owns event parsing, action routing, actor resolution, instance
//! descriptor normalization, and message composition. It intentionally excludes
//! AWS SDK and Lambda runtime concerns, which live in `ec2_alert_lambda`.

pub mod actor;
pub mod contract;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod message;
pub mod routing;
