use billdesk_observability::{init, LogFormat, LogLevel, LoggingConfig, LoggingError};

#[test]
fn second_init_is_rejected() {
    init(&LoggingConfig::new(LogLevel::Info, LogFormat::Json)).unwrap();

    let err = init(&LoggingConfig::default()).unwrap_err();
    assert!(matches!(err, LoggingError::AlreadyInitialized(_)));

    tracing::info!("still logging through the first subscriber");
}
