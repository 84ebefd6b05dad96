//! Failure causes attached to health report entries.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rendered form of the error that made a probe fail.
///
/// `Display` produces the text sent as exception payload or availability
/// message: `kind: message`, then one ` ---> cause` line per nested source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCause {
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub causes: Vec<String>,
}

impl FailureCause {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            causes: Vec::new(),
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Capture an error together with its `source()` chain.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: Error + 'static,
    {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(inner) = source {
            causes.push(inner.to_string());
            source = inner.source();
        }

        Self {
            kind: short_type_name::<E>().to_string(),
            message: err.to_string(),
            causes,
        }
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        for cause in &self.causes {
            write!(f, "\n ---> {}", cause)?;
        }
        Ok(())
    }
}
