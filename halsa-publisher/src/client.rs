//! Process-wide telemetry client.
//!
//! The client is built on first use and then shared by every publisher in the
//! process for its whole lifetime. [`ClientSlot`] guards construction so that
//! concurrent first publishes build exactly one client; later reads do not
//! lock.

use std::fmt;
use std::sync::Arc;

use halsa_config::ConnectionConfig;
use halsa_telemetry::{TelemetryClient, TelemetryConfiguration, TelemetryError};
use once_cell::sync::{Lazy, OnceCell};

static PROCESS_SLOT: Lazy<Arc<ClientSlot>> = Lazy::new(|| Arc::new(ClientSlot::new()));

pub struct ClientSlot {
    client: OnceCell<Arc<dyn TelemetryClient>>,
}

impl ClientSlot {
    pub const fn new() -> Self {
        Self {
            client: OnceCell::new(),
        }
    }

    /// The slot shared by the whole process.
    pub fn process() -> Arc<ClientSlot> {
        Arc::clone(&PROCESS_SLOT)
    }

    pub fn get(&self) -> Option<Arc<dyn TelemetryClient>> {
        self.client.get().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    /// Return the client, running `init` if none exists yet.
    ///
    /// Concurrent callers block until the winning `init` finishes. If `init`
    /// fails the slot stays empty and the next caller tries again.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<dyn TelemetryClient>, TelemetryError>
    where
        F: FnOnce() -> Result<Arc<dyn TelemetryClient>, TelemetryError>,
    {
        self.client.get_or_try_init(init).cloned()
    }
}

impl Default for ClientSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSlot")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Inputs for the client configuration, in priority order.
#[derive(Debug, Clone, Default)]
pub struct ClientSource {
    pub connection_string: Option<String>,
    pub instrumentation_key: Option<String>,
    pub configuration: Option<TelemetryConfiguration>,
}

impl ClientSource {
    pub fn from_connection(connection: &ConnectionConfig) -> Self {
        Self {
            connection_string: connection.connection_string().map(str::to_string),
            instrumentation_key: connection.instrumentation_key().map(str::to_string),
            configuration: None,
        }
    }

    /// Connection string, then instrumentation key, then the supplied
    /// configuration, then defaults. Blank strings are skipped.
    pub fn resolve(&self) -> Result<TelemetryConfiguration, TelemetryError> {
        if let Some(connection_string) = non_blank(&self.connection_string) {
            return TelemetryConfiguration::from_connection_string(connection_string);
        }
        if let Some(key) = non_blank(&self.instrumentation_key) {
            return Ok(TelemetryConfiguration::from_instrumentation_key(key.trim()));
        }
        Ok(self.configuration.clone().unwrap_or_default())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use halsa_telemetry::InMemoryClient;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    const KEY: &str = "11111111-2222-3333-4444-555555555555";

    #[test]
    fn connection_string_wins() {
        let source = ClientSource {
            connection_string: Some(format!("InstrumentationKey={KEY}")),
            instrumentation_key: Some("other".into()),
            configuration: Some(TelemetryConfiguration::from_instrumentation_key("third")),
        };
        let config = source.resolve().unwrap();
        assert_eq!(config.instrumentation_key.as_deref(), Some(KEY));
        assert!(config.connection_string.is_some());
    }

    #[test]
    fn instrumentation_key_beats_supplied_configuration() {
        let source = ClientSource {
            connection_string: Some("  ".into()),
            instrumentation_key: Some(KEY.into()),
            configuration: Some(TelemetryConfiguration::from_instrumentation_key("third")),
        };
        let config = source.resolve().unwrap();
        assert_eq!(config.instrumentation_key.as_deref(), Some(KEY));
        assert!(config.connection_string.is_none());
    }

    #[test]
    fn falls_back_to_supplied_then_default_configuration() {
        let supplied = TelemetryConfiguration::from_instrumentation_key("third");
        let source = ClientSource {
            configuration: Some(supplied.clone()),
            ..ClientSource::default()
        };
        assert_eq!(source.resolve().unwrap(), supplied);
        assert_eq!(
            ClientSource::default().resolve().unwrap(),
            TelemetryConfiguration::default()
        );
    }

    #[test]
    fn invalid_connection_string_is_an_error() {
        let source = ClientSource {
            connection_string: Some("garbage".into()),
            ..ClientSource::default()
        };
        assert!(matches!(
            source.resolve(),
            Err(TelemetryError::InvalidConnectionString(_))
        ));
    }

    #[test]
    fn failed_init_leaves_slot_empty() {
        let slot = ClientSlot::new();
        let err = slot
            .get_or_try_init(|| Err(TelemetryError::Rejected("offline".into())))
            .err();
        assert!(err.is_some());
        assert!(!slot.is_initialized());

        slot.get_or_try_init(|| Ok(Arc::new(InMemoryClient::default()) as Arc<dyn TelemetryClient>))
            .unwrap();
        assert!(slot.is_initialized());
    }

    #[test]
    fn concurrent_first_use_constructs_once() {
        let slot = Arc::new(ClientSlot::new());
        let constructions = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let slot = Arc::clone(&slot);
                let constructions = Arc::clone(&constructions);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    slot.get_or_try_init(|| {
                        constructions.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(20));
                        Ok(Arc::new(InMemoryClient::default()) as Arc<dyn TelemetryClient>)
                    })
                    .unwrap()
                })
            })
            .collect();

        let clients: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert!(clients.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn process_slot_is_shared() {
        assert!(Arc::ptr_eq(&ClientSlot::process(), &ClientSlot::process()));
    }
}
