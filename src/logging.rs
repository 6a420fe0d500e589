//! Process-wide `tracing` subscriber setup for the binaries.
//!
//! Console output goes to stderr; file output goes to a size-rotated log file.
//! Each sink has its own level filter.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogConfig;

/// Append-only log file that rolls over once it would exceed `max_bytes`.
///
/// On rollover `name` becomes `name.1`, `name.1` becomes `name.2` and so on,
/// keeping at most `backups` old files.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    pub fn open(path: &Path, max_bytes: u64, backups: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            max_bytes,
            backups,
            file,
            written,
        })
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backups > 0 {
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn level_filter(name: &str, level: &str) -> Result<LevelFilter> {
    let level: Level = level
        .parse()
        .with_context(|| format!("invalid log level for '{name}': '{level}'"))?;
    Ok(LevelFilter::from_level(level))
}

/// Install the global subscriber. Call once, at process start.
pub fn init(config: &LogConfig) -> Result<()> {
    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(level_filter("consoleLevel", &config.console_level)?);

    let file = if config.file_enabled {
        let path = config.file_path();
        let writer = RotatingFile::open(&path, config.max_bytes, config.backups)
            .with_context(|| format!("failed to open log file: {}", path.display()))?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(writer))
                .with_filter(level_filter("fileLevel", &config.file_level)?),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}
