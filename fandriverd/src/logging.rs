//! Tracing subscriber setup from the configuration's logging settings

use anyhow::{Context, Result};
use fandriver_core::{FanConfig, LogFormat};
use std::fs::{File, Metadata, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Initialize tracing subscriber for logging
///
/// `RUST_LOG` takes precedence over the configured level; `verbose` lowers
/// the fallback level to debug. Logs go to stderr unless `log_file` is set,
/// in which case they are appended to that file without colors.
pub fn init_tracing(config: &FanConfig, verbose: bool) -> Result<()> {
    let fallback = if verbose {
        "debug"
    } else {
        config.log_level.as_directive()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let (writer, ansi) = match &config.log_file {
        Some(path) => {
            let file = WatchedFile::open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")
}

/// Device and inode of an open file
type FileId = (u64, u64);

/// Append-only log file that follows log rotation
///
/// Before each write the path is checked. When the file behind it was moved
/// or deleted, it is reopened at the same path.
#[derive(Debug)]
pub struct WatchedFile {
    path: PathBuf,
    current: Mutex<OpenFile>,
}

#[derive(Debug)]
struct OpenFile {
    file: File,
    id: Option<FileId>,
}

impl WatchedFile {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let current = OpenFile::open(&path)?;
        Ok(Self {
            path,
            current: Mutex::new(current),
        })
    }

    fn lock(&self) -> MutexGuard<'_, OpenFile> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OpenFile {
    fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let id = file_id(&file.metadata()?);
        Ok(Self { file, id })
    }

    fn reopen_if_moved(&mut self, path: &Path) -> io::Result<()> {
        // Without file identities there is nothing to compare
        if self.id.is_none() {
            return Ok(());
        }

        let on_disk = std::fs::metadata(path).ok().and_then(|m| file_id(&m));
        if on_disk != self.id {
            *self = OpenFile::open(path)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn file_id(metadata: &Metadata) -> Option<FileId> {
    use std::os::unix::fs::MetadataExt;
    Some((metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn file_id(_metadata: &Metadata) -> Option<FileId> {
    None
}

impl io::Write for &WatchedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut current = self.lock();
        current.reopen_if_moved(&self.path)?;
        current.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().file.flush()
    }
}
