use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing for tests, once per process.
///
/// The level comes from `TEST_LOG` (`TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`)
/// and defaults to `WARN`.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("ERROR") => tracing::Level::ERROR,
            _ => tracing::Level::WARN,
        };

        // Another subscriber may already be installed by the test harness.
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}
