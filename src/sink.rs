// Output sinks: console stream and optional append-only file.
// Each sink serializes its writers so concurrent cycles never interleave mid-line.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Result, StatsError};

pub const CONSOLE_SINK: &str = "console";
pub const FILE_SINK: &str = "file";

/// Line-oriented writer around stdout (or any `Write` in tests).
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn write_line(&self, line: &str) -> Result<()> {
        let mut out = self.out.lock().map_err(|_| poisoned(CONSOLE_SINK))?;
        writeln!(out, "{line}")
            .and_then(|_| out.flush())
            .map_err(|source| StatsError::SinkWrite {
                sink: CONSOLE_SINK,
                source,
            })
    }
}

/// Append-only stats file. Opened per write in append mode.
pub struct FileSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSink {
    /// Create parent directories and truncate (or create) the file.
    pub fn initialize(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let init = |path: &Path| -> io::Result<()> {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            File::create(path)?;
            Ok(())
        };
        init(&path).map_err(|source| StatsError::OutputInit {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_line(&self, line: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| poisoned(FILE_SINK))?;
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .and_then(|mut file| {
                writeln!(file, "{line}")?;
                file.flush()
            })
            .map_err(|source| StatsError::SinkWrite {
                sink: FILE_SINK,
                source,
            })
    }
}

/// All destinations for a formatted stats line.
pub struct Sinks {
    console: Arc<ConsoleSink>,
    file: Option<FileSink>,
}

impl Sinks {
    pub fn new(console: Arc<ConsoleSink>, file: Option<FileSink>) -> Self {
        Self { console, file }
    }

    pub fn file(&self) -> Option<&FileSink> {
        self.file.as_ref()
    }

    /// Write to the console, then the file. A failure on one does not skip the other.
    pub fn emit(&self, line: &str) -> Vec<StatsError> {
        let mut failures = Vec::new();
        if let Err(e) = self.console.write_line(line) {
            failures.push(e);
        }
        if let Some(file) = &self.file
            && let Err(e) = file.append_line(line)
        {
            failures.push(e);
        }
        failures
    }
}

fn poisoned(sink: &'static str) -> StatsError {
    StatsError::SinkWrite {
        sink,
        source: io::Error::other("writer lock poisoned"),
    }
}
