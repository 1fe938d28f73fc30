// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::{TracingConfig, try_create_layers};

/// Global default subscriber, which once set, can't be unset or changed.
///
/// Logging is **DISABLED** by **default**. Unless this is called with a level other than
/// [`tracing_core::LevelFilter::OFF`], the [`tracing::info!`], [`tracing::debug!`], etc.
/// macros used throughout the kernel produce no output.
///
/// # Errors
///
/// Returns an error if the log file can't be created or a global subscriber is already
/// installed.
pub fn try_initialize_logging_global(options: impl Into<TracingConfig>) -> miette::Result<()> {
    let it: TracingConfig = options.into();

    // Early return if the level filter is off.
    if matches!(it.get_level_filter(), tracing_core::LevelFilter::OFF) {
        return Ok(());
    }

    let layers = try_create_layers(&it)?;
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|err| miette::miette!("unable to install the global subscriber: {err}"))
}

/// Thread local subscriber, great for tests. Dropping the guard uninstalls it.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_initialize_logging_thread_local(
    options: impl Into<TracingConfig>,
) -> miette::Result<Option<tracing::dispatcher::DefaultGuard>> {
    let it: TracingConfig = options.into();

    if matches!(it.get_level_filter(), tracing_core::LevelFilter::OFF) {
        return Ok(None);
    }

    let layers = try_create_layers(&it)?;
    Ok(Some(tracing_subscriber::registry().with(layers).set_default()))
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tracing_core::LevelFilter;

    use super::*;
    use crate::{WriterConfig, try_create_temp_dir};

    #[test]
    fn test_off_installs_nothing() {
        let guard = try_initialize_logging_thread_local(LevelFilter::OFF).unwrap();
        assert!(guard.is_none());
    }

    #[test]
    #[serial]
    fn test_thread_local_writes_to_file() {
        let dir = try_create_temp_dir().unwrap();
        let file_path = dir.join("thread_local.log").to_str().unwrap().to_string();
        let config = TracingConfig {
            writer_config: WriterConfig::File(file_path.clone()),
            level_filter: LevelFilter::DEBUG,
        };
        let guard = try_initialize_logging_thread_local(config).unwrap();
        tracing::info!(message = "hello from the test");
        drop(guard);

        let content = std::fs::read_to_string(&file_path).unwrap();
        assert!(content.contains("hello from the test"));
    }
}
