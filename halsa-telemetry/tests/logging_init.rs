use halsa_telemetry::EventLogger;

#[test]
fn init_installs_subscriber_once() {
    assert!(EventLogger::init());
    assert!(!EventLogger::init());
    tracing::info!("subscriber installed");
}
