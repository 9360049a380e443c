//! Size-triggered log file rotation.
//!
//! `app.log` rolls to `app.log.1`, existing backups shift up by one, and the
//! backup past `backup_count` is removed.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

const MIB: u64 = 1024 * 1024;

/// When a file rolls over and how many rolled files are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPolicy {
    /// Size cap in bytes; `0` disables rotation.
    pub max_bytes: u64,
    /// Rolled files kept; `0` also disables rotation.
    pub backup_count: usize,
}

impl RotationPolicy {
    pub const MAIN: Self = Self {
        max_bytes: 10 * MIB,
        backup_count: 5,
    };

    pub const ERRORS: Self = Self {
        max_bytes: 5 * MIB,
        backup_count: 3,
    };
}

/// Path of the `index`-th backup of `path` (`app.log` → `app.log.2`).
pub fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    len: u64,
}

impl RotatingFileWriter {
    /// Open `path` for appending, creating it if missing.
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            path,
            policy,
            file: Some(file),
            len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Bytes written to the live file so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one line, rolling the file over first if it would reach the cap.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let incoming = line.len() as u64 + 1;
        if self.should_roll_over(incoming) {
            self.roll_over()?;
        }

        let file = match &mut self.file {
            Some(file) => file,
            slot => slot.insert(open_append(&self.path)?),
        };
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        self.len += incoming;
        Ok(())
    }

    /// A zero cap or zero backup count disables rotation; the file keeps growing.
    fn should_roll_over(&self, incoming: u64) -> bool {
        self.policy.max_bytes > 0
            && self.policy.backup_count > 0
            && self.len > 0
            && self.len + incoming >= self.policy.max_bytes
    }

    fn roll_over(&mut self) -> io::Result<()> {
        // Close the live file before renaming it.
        self.file = None;

        for i in (1..self.policy.backup_count).rev() {
            let src = backup_path(&self.path, i);
            if !src.exists() {
                continue;
            }
            let dst = backup_path(&self.path, i + 1);
            remove_if_present(&dst);
            if let Err(e) = fs::rename(&src, &dst) {
                warn!("Failed to rotate log backup {}: {}", src.display(), e);
            }
        }

        let first = backup_path(&self.path, 1);
        remove_if_present(&first);
        match fs::rename(&self.path, &first) {
            Ok(()) => {
                self.file = Some(create_empty(&self.path)?);
                self.len = 0;
            }
            Err(e) => {
                // The live file still holds everything since the last rotation.
                warn!("Failed to rotate log file {}: {}", self.path.display(), e);
                let file = open_append(&self.path)?;
                self.len = file.metadata()?.len();
                self.file = Some(file);
            }
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Start a fresh live file after it was renamed to the first backup.
fn create_empty(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}

fn remove_if_present(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove old log backup {}: {}", path.display(), e);
        }
    }
}
