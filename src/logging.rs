use std::fs::{self, File, OpenOptions};
use std::io;
use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

use crate::config::{LogFile, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global tracing subscriber.
///
/// Console output honours `RUST_LOG` over the configured level. Every entry in
/// `files` gets its own plain-text writer filtered at that file's level.
/// Calling this twice is harmless, the second subscriber is ignored.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
        .with_target(true)
        .with_file(config.src)
        .with_line_number(config.src)
        .with_filter(console_filter)
        .boxed()];

    for log_file in &config.files {
        layers.push(file_layer(log_file, config.src)?);
    }

    if let Err(e) = tracing_subscriber::registry().with(layers).try_init() {
        tracing::debug!("Tracing subscriber already installed: {}", e);
    }

    Ok(())
}

fn file_layer(log_file: &LogFile, src: bool) -> io::Result<BoxedLayer> {
    let filter = EnvFilter::try_new(&log_file.level).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid level for {}: {}", log_file.path.display(), e),
        )
    })?;

    Ok(fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_file(src)
        .with_line_number(src)
        .with_writer(Arc::new(open_append(log_file)?))
        .with_filter(filter)
        .boxed())
}

fn open_append(log_file: &LogFile) -> io::Result<File> {
    if let Some(dir) = log_file.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(&log_file.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str, level: &str) -> LogFile {
        LogFile {
            path: std::env::temp_dir()
                .join(format!("slotlist-logging-{}", uuid::Uuid::new_v4()))
                .join(name),
            level: level.to_string(),
        }
    }

    #[test]
    fn file_layer_creates_missing_directories() {
        let log_file = temp_log("api.log", "info");
        assert!(file_layer(&log_file, false).is_ok());
        assert!(log_file.path.exists());
        let _ = fs::remove_dir_all(log_file.path.parent().unwrap());
    }

    #[test]
    fn file_layer_rejects_bad_level() {
        let log_file = temp_log("bad.log", "slotlist=verbose");
        let err = file_layer(&log_file, false).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn events_reach_configured_files() {
        let info_file = temp_log("api.log", "info");
        let warn_file = temp_log("warn.log", "warn");
        let config = LoggingConfig {
            level: "info".to_string(),
            src: false,
            files: vec![info_file.clone(), warn_file.clone()],
        };
        init(&config).unwrap();

        tracing::info!("mission slot assigned");
        tracing::warn!("slot assignment conflict");

        let info = fs::read_to_string(&info_file.path).unwrap();
        assert!(info.contains("mission slot assigned"));
        assert!(info.contains("slot assignment conflict"));

        let warn = fs::read_to_string(&warn_file.path).unwrap();
        assert!(!warn.contains("mission slot assigned"));
        assert!(warn.contains("slot assignment conflict"));
        assert!(!warn.contains("\u{1b}["));

        for file in [info_file, warn_file] {
            let _ = fs::remove_dir_all(file.path.parent().unwrap());
        }
    }
}
