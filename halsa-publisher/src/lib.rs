//! # halsa-publisher
//!
//! Publishes health reports to a telemetry backend.
//!
//! A [`ReportPublisher`] turns each [`halsa_core::HealthReport`] into telemetry
//! records according to its [`EmissionMode`] and sends them through the
//! process-wide telemetry client held in a [`ClientSlot`].
//!
//! ### Key Submodules:
//! - `mode`: emission mode resolution and the success rule
//! - `mapping`: pure report → record mapping
//! - `client`: lazily created, process-wide telemetry client
//! - `publisher`: the publish entry point

pub mod client;
pub mod error;
pub mod host;
pub mod mapping;
pub mod mode;
pub mod publisher;

pub use client::{ClientSlot, ClientSource};
pub use error::PublishError;
pub use host::HostInfo;
pub use mapping::RecordMapper;
pub use mode::EmissionMode;
pub use publisher::{HealthCheckPublisher, ReportPublisher, ReportPublisherBuilder};
