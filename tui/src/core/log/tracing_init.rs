// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

use tracing_appender::rolling::RollingFileAppender;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, registry::LookupSpan};

use super::{TracingConfig, WriterConfig};

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Returns the layers. This does not initialize the tracing system; call `init` on a
/// registry that uses them.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Vec<Box<DynLayer<tracing_subscriber::Registry>>>> {
    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> =
        vec![Box::new(tracing_config.get_level_filter())];

    if let Some(layer) = try_create_file_layer(
        tracing_config.get_level_filter(),
        tracing_config.get_writer_config(),
    )? {
        return_it.push(layer);
    }

    Ok(return_it)
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let WriterConfig::File(log_file_path) = writer_config else {
        return Ok(None);
    };
    let file = try_create_file_appender(Path::new(&log_file_path))?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_writer(file)
        .with_filter(level_filter);
    Ok(Some(Box::new(fmt_layer)))
}

/// A file appender that never rolls over, so one run of the app writes one file.
fn try_create_file_appender(path: &Path) -> miette::Result<RollingFileAppender> {
    let folder = match path.parent() {
        Some(it) if it.as_os_str().is_empty() => Path::new("."),
        Some(it) => it,
        None => miette::bail!("log file {} has no parent folder", path.display()),
    };
    let Some(file_name) = path.file_name() else {
        miette::bail!("log file {} has no file name", path.display());
    };
    Ok(tracing_appender::rolling::never(folder, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::try_create_temp_dir;

    #[test]
    fn test_no_file_layer_without_a_file() {
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_file_layer(LevelFilter::DEBUG, WriterConfig::None).unwrap();
        assert!(layer.is_none());
    }

    #[test]
    fn test_try_create_file_layer() {
        let dir = try_create_temp_dir().unwrap();
        let file_path = dir.join("clex_log_file.log");
        let file_path = file_path.to_str().unwrap().to_string();

        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_file_layer(LevelFilter::DEBUG, WriterConfig::File(file_path.clone()))
                .unwrap();

        assert!(layer.is_some());
        assert!(Path::new(&file_path).exists());
    }

    #[test]
    fn test_try_create_layers() {
        let dir = try_create_temp_dir().unwrap();
        let file_path = dir.join("clex_log_file.log").to_str().unwrap().to_string();
        let tracing_config = TracingConfig {
            writer_config: WriterConfig::File(file_path),
            level_filter: LevelFilter::DEBUG,
        };
        assert_eq!(try_create_layers(&tracing_config).unwrap().len(), 2);
    }

    #[test]
    fn test_file_appender_needs_a_file_name() {
        assert!(try_create_file_appender(Path::new("/")).is_err());
    }
}
