// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Append-only transaction log backing the ConfigTree.
//!
//! Every accepted mutation is appended as one line:
//!
//! ```text
//! <timestamp>\t<op>\t<path>\t<jsonValue?>\n
//! ```
//!
//! `op` is `s` (set) or `r` (remove); `r` lines omit the trailing value
//! field. Paths are the slash-joined, backslash-escaped form from
//! [`hearth_core::NodePath::encode`]. A truncated final line (a partial
//! write left by a kill -9) is tolerated and dropped; any other malformed
//! line is a [`ConfigError::CorruptEntry`].

use crate::tree::ConfigTree;
use crate::ConfigError;
use hearth_core::NodePath;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One operation recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TLogOp {
    Set,
    Remove,
}

impl TLogOp {
    fn as_char(self) -> char {
        match self {
            TLogOp::Set => 's',
            TLogOp::Remove => 'r',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(TLogOp::Set),
            'r' => Some(TLogOp::Remove),
            _ => None,
        }
    }
}

/// A single decoded line of the log.
#[derive(Debug, Clone, PartialEq)]
pub struct TLogEntry {
    pub timestamp: u64,
    pub op: TLogOp,
    pub path: NodePath,
    pub value: Option<Value>,
}

impl TLogEntry {
    fn encode(&self) -> Result<String, ConfigError> {
        let mut line = format!("{}\t{}\t{}", self.timestamp, self.op.as_char(), self.path.encode());
        if let Some(value) = &self.value {
            line.push('\t');
            line.push_str(&serde_json::to_string(value)?);
        }
        line.push('\n');
        Ok(line)
    }

    fn decode(line_no: usize, line: &str) -> Result<Self, ConfigError> {
        let mut fields = line.splitn(4, '\t');
        let timestamp = fields
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| ConfigError::CorruptEntry {
                line: line_no,
                message: "missing or non-numeric timestamp".into(),
            })?;
        let op = fields
            .next()
            .and_then(|s| s.chars().next())
            .and_then(TLogOp::from_char)
            .ok_or_else(|| ConfigError::CorruptEntry {
                line: line_no,
                message: "missing or unknown op".into(),
            })?;
        let path = fields
            .next()
            .ok_or_else(|| ConfigError::CorruptEntry { line: line_no, message: "missing path".into() })?;
        let path = NodePath::decode(path);
        let value = match (op, fields.next()) {
            (TLogOp::Set, Some(raw)) => Some(serde_json::from_str(raw).map_err(|e| {
                ConfigError::CorruptEntry { line: line_no, message: format!("bad json value: {e}") }
            })?),
            (TLogOp::Set, None) => {
                return Err(ConfigError::CorruptEntry {
                    line: line_no,
                    message: "set entry missing value".into(),
                })
            }
            (TLogOp::Remove, _) => None,
        };
        Ok(TLogEntry { timestamp, op, path, value })
    }
}

/// Append-only log file mirroring every ConfigTree mutation.
pub struct TLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl TLog {
    /// Open (creating if absent) the log at `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, writer: BufWriter::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a `set` entry and flush (each accepted mutation must survive a
    /// crash immediately after it is applied).
    pub fn append_set(&mut self, timestamp: u64, path: &NodePath, value: &Value) -> Result<(), ConfigError> {
        self.append(&TLogEntry {
            timestamp,
            op: TLogOp::Set,
            path: path.clone(),
            value: Some(value.clone()),
        })
    }

    /// Append a `remove` entry and flush.
    pub fn append_remove(&mut self, timestamp: u64, path: &NodePath) -> Result<(), ConfigError> {
        self.append(&TLogEntry { timestamp, op: TLogOp::Remove, path: path.clone(), value: None })
    }

    fn append(&mut self, entry: &TLogEntry) -> Result<(), ConfigError> {
        let line = entry.encode()?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Read every well-formed entry from `path`, in file order. A truncated
    /// final line (no trailing `\n`) is silently dropped; any other
    /// malformed line is reported via `on_corrupt` and skipped rather than
    /// aborting the whole replay: a damaged entry must not block recovery
    /// of everything that came before or after it.
    pub fn replay(
        path: impl AsRef<Path>,
        mut on_corrupt: impl FnMut(usize, &ConfigError),
    ) -> Result<Vec<TLogEntry>, ConfigError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        for (idx, raw_line) in reader.lines().enumerate() {
            let line = raw_line?;
            if line.is_empty() {
                continue;
            }
            match TLogEntry::decode(idx + 1, &line) {
                Ok(entry) => entries.push(entry),
                Err(err) => on_corrupt(idx + 1, &err),
            }
        }
        Ok(entries)
    }

    /// Replay `path` into `tree`, applying each `set`/`remove` as if it had
    /// just been accepted live. Out-of-order or duplicate timestamps are
    /// handled the same way live traffic is: the tree's own
    /// monotonic-modtime check decides whether an entry wins.
    pub fn replay_into(path: impl AsRef<Path>, tree: &ConfigTree) -> Result<usize, ConfigError> {
        let mut corrupt = 0usize;
        let entries = Self::replay(path, |line, err| {
            corrupt += 1;
            tracing::warn!(line, error = %err, "skipping corrupt tlog entry during replay");
        })?;
        let mut applied = 0usize;
        for entry in &entries {
            match entry.op {
                TLogOp::Set => {
                    if tree.set_value(&entry.path, entry.value.clone().unwrap_or(Value::Null), entry.timestamp, false) {
                        applied += 1;
                    }
                }
                TLogOp::Remove => {
                    if tree.remove(&entry.path, entry.timestamp) {
                        applied += 1;
                    }
                }
            }
        }
        Ok(applied)
    }

    /// Write a fresh log containing exactly the tree's current leaves, each
    /// stamped with its own modtime. Used to compact a log that has grown
    /// past the point where replaying it is cheaper than a snapshot (spec
    /// §6: "periodic compaction"). The caller is responsible for atomically
    /// swapping this file in for the old log (rename over, after an optional
    /// `.bak` of the corrupt/previous file).
    pub fn dump_tlog(path: impl AsRef<Path>, tree: &ConfigTree) -> Result<(), ConfigError> {
        let file = OpenOptions::new().create(true).write(true).truncate(true).open(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        for (path, value, modtime) in tree.leaves() {
            let entry = TLogEntry { timestamp: modtime, op: TLogOp::Set, path, value: Some(value) };
            writer.write_all(entry.encode()?.as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Replay `path` into `tree`, but instead of applying each entry's own
    /// timestamp, optionally force acceptance regardless of the node's
    /// current modtime, and optionally skip paths a `predicate` rejects.
    /// Used by the activator's rollback path (spec §4.2): `force_timestamp`
    /// lets a pre-deployment snapshot win over whatever partially-applied
    /// state a failed deployment left behind, and `predicate` excludes
    /// private runtime state that should survive the rollback untouched.
    pub fn merge_tlog_into_config(
        path: impl AsRef<Path>,
        tree: &ConfigTree,
        force_timestamp: bool,
        predicate: Option<&dyn Fn(&NodePath) -> bool>,
    ) -> Result<usize, ConfigError> {
        let mut corrupt = 0usize;
        let entries = Self::replay(path, |line, err| {
            corrupt += 1;
            tracing::warn!(line, error = %err, "skipping corrupt tlog entry during merge");
        })?;
        let mut applied = 0usize;
        for entry in &entries {
            if let Some(predicate) = predicate {
                if !predicate(&entry.path) {
                    continue;
                }
            }
            let accepted = match entry.op {
                TLogOp::Set => tree.set_value(
                    &entry.path,
                    entry.value.clone().unwrap_or(Value::Null),
                    entry.timestamp,
                    force_timestamp,
                ),
                TLogOp::Remove => tree.remove(&entry.path, entry.timestamp),
            };
            if accepted {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Stream every already-appended entry to `sink`, in file order, for a
    /// peer process to reconstruct an equivalent tree (spec §4.2
    /// `mirrorTo`). Unlike [`Self::replay_into`], this does not touch a
    /// [`ConfigTree`] at all — the receiving end decides how to apply what
    /// it receives.
    pub fn mirror_to(path: impl AsRef<Path>, mut sink: impl FnMut(&TLogEntry)) -> Result<usize, ConfigError> {
        let mut sent = 0usize;
        let entries = Self::replay(path, |line, err| {
            tracing::warn!(line, error = %err, "skipping corrupt tlog entry during mirror");
        })?;
        for entry in &entries {
            sink(entry);
            sent += 1;
        }
        Ok(sent)
    }

    /// Move the current log aside as `<path>.bak.<timestamp>` so a fresh
    /// one can be started after corruption is detected.
    pub fn quarantine(path: impl AsRef<Path>, timestamp: u64) -> Result<PathBuf, ConfigError> {
        let path = path.as_ref();
        let backup = path.with_extension(format!("bak.{timestamp}"));
        std::fs::rename(path, &backup)?;
        Ok(backup)
    }

    /// zstd-compress a quarantined or compacted log and remove the
    /// uncompressed copy. Older archived logs are kept around for forensics
    /// but should not cost disk space indefinitely on a constrained device.
    pub fn archive_compressed(path: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
        let path = path.as_ref();
        let archived = {
            let mut p = path.as_os_str().to_owned();
            p.push(".zst");
            PathBuf::from(p)
        };
        let mut input = File::open(path)?;
        let output = File::create(&archived)?;
        zstd::stream::copy_encode(&mut input, output, 0)?;
        std::fs::remove_file(path)?;
        Ok(archived)
    }
}

#[cfg(test)]
#[path = "tlog_tests.rs"]
mod tests;
