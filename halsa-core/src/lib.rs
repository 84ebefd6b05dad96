//! # halsa-core
//!
//! Data model shared by every halsa crate: the health report produced by an
//! external health-check engine once per check cycle.
//!
//! ### Key Submodules:
//! - `report`: `HealthReport`, `HealthReportEntry` and the per-check diagnostics
//! - `status`: `HealthStatus` and its textual form
//! - `failure`: `FailureCause`, the rendered error attached to a failing check

pub mod error;
pub mod failure;
pub mod report;
pub mod status;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::failure::*;
    pub use crate::report::*;
    pub use crate::status::*;
}

pub use error::StatusParseError;
pub use indexmap::IndexMap;
pub use failure::FailureCause;
pub use report::{render_data_value, HealthReport, HealthReportEntry, NULL_PLACEHOLDER};
pub use status::HealthStatus;
