// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Logging setup: `tracing` + `tracing-subscriber` with an `EnvFilter`,
//! writing to a rolling file under the root by default or to the console
//! when `LOG_STORE=CONSOLE` (spec §6), the same `tracing-appender` +
//! `tracing-subscriber` pairing the reference daemon uses.

use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::env::LogStore;
use crate::error::DaemonError;

/// Either variant must be kept alive for the process's lifetime: dropping
/// the file guard stops the background flush thread, and dropping either
/// guard drops the associated subscriber's writer.
pub enum LogGuard {
    File(tracing_appender::non_blocking::WorkerGuard),
    Console,
}

pub fn setup(log_path: &Path, store: LogStore) -> Result<LogGuard, DaemonError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match store {
        LogStore::Console => {
            tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
            Ok(LogGuard::Console)
        }
        LogStore::File => {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file_name = log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("hearthd.log"));
            let appender = tracing_appender::rolling::never(log_path.parent().unwrap_or(Path::new(".")), file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();
            Ok(LogGuard::File(guard))
        }
    }
}
