//! Metadata describing the publishing process.

use halsa_telemetry::Properties;
use once_cell::sync::Lazy;

pub const MACHINE_NAME_PROPERTY: &str = "MachineName";
pub const ASSEMBLY_PROPERTY: &str = "Assembly";

static DETECTED: Lazy<HostInfo> = Lazy::new(HostInfo::detect);

/// Machine name and executable identifier attached to every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub machine_name: String,
    pub assembly: String,
}

impl HostInfo {
    pub fn new(machine_name: impl Into<String>, assembly: impl Into<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
            assembly: assembly.into(),
        }
    }

    /// Host metadata of this process, detected once.
    pub fn current() -> Self {
        DETECTED.clone()
    }

    fn detect() -> Self {
        let machine_name = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let assembly = std::env::current_exe()
            .ok()
            .and_then(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        Self {
            machine_name,
            assembly,
        }
    }

    pub fn properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties.insert(MACHINE_NAME_PROPERTY.to_string(), self.machine_name.clone());
        properties.insert(ASSEMBLY_PROPERTY.to_string(), self.assembly.clone());
        properties
    }
}
