//! Logger setup.

use crate::core::EditorPreferences;

/// Install `env_logger` at the level from `preferences`. `RUST_LOG`
/// overrides it. Calling this more than once is harmless.
pub fn init(preferences: &EditorPreferences) {
    let result = env_logger::Builder::new()
        .filter_level(preferences.level_filter())
        .parse_default_env()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialised");
    }
}

/// Logger for tests: captured output, debug level.
pub fn init_for_tests() {
    let _ = env_logger::Builder::new()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}
