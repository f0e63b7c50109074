use chart_helpers::logging::{Error, initialize_logging};
use tracing::{debug, error, info};

// Either run
//      cargo test --test logging -- --nocapture
// to see the ERROR and INFO messages, or
//      CHART_HELPERS_TEST_LOG=debug cargo test --test logging -- --nocapture
// to see them all.
#[test]
fn initialize_once() {
    initialize_logging("CHART_HELPERS_TEST_LOG", "chart-helpers").unwrap();

    error!("ERROR level messages should be seen.");
    info!("INFO level messages should also be seen by default.");
    debug!("DEBUG level messages should be seen only if you set the env var.");

    let err = initialize_logging("CHART_HELPERS_TEST_LOG", "chart-helpers").unwrap_err();
    assert!(matches!(err, Error::SetGlobalDefault { .. }));
}
