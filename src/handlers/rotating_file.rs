//! Size and count limited rotating file writer
//!
//! Files are named from a pattern. Placeholders:
//!
//! - `%t` the system temporary directory
//! - `%u` a unique number, incremented while another writer holds the lock
//! - `%g` the generation number, `0` being the active file
//! - `%%` a literal percent sign
//!
//! The active file is guarded by an exclusive advisory lock on a `.lck`
//! companion file, released when the writer is closed or dropped.

use crate::core::error::{LoggerError, Result};
use crate::core::report::report_to_stderr;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Pattern used when none is given.
pub const DEFAULT_FILE_PATTERN: &str = "./default_logfile%u.log";

/// Unique numbers tried before giving up on acquiring a lock.
pub const MAX_UNIQUE_ATTEMPTS: u32 = 100;

const LOCK_EXTENSION: &str = "lck";

/// Where and how a [`RotatingFileWriter`] writes.
///
/// # Examples
///
/// ```
/// use rust_global_logger::handlers::FileTarget;
///
/// // Keep five 1 MiB generations: app.0.log (active) through app.4.log
/// let target = FileTarget::new("logs/app.%g.log")
///     .with_limit(1024 * 1024)
///     .with_count(5)
///     .with_append(true);
///
/// assert_eq!(target.generation_count(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTarget {
    pub pattern: String,
    /// Bytes after which the active file is rotated; `None` or `0` never rotates
    pub limit: Option<u64>,
    /// Number of generations kept; `None` keeps a single file
    pub count: Option<usize>,
    /// Continue an existing active file instead of rotating it away on open
    pub append: bool,
}

impl Default for FileTarget {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_FILE_PATTERN.to_string(),
            limit: None,
            count: None,
            append: false,
        }
    }
}

impl FileTarget {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn generation_count(&self) -> usize {
        self.count.unwrap_or(1).max(1)
    }

    /// Effective size limit, `None` when rotation is disabled
    pub fn size_limit(&self) -> Option<u64> {
        self.limit.filter(|&limit| limit > 0)
    }

    /// Path of generation `generation` under unique number `unique`.
    ///
    /// A pattern without `%g` gets `.%g` appended when more than one
    /// generation is kept. A pattern without `%u` gets `.<unique>` appended
    /// once the unique number is non zero.
    pub fn expand(&self, generation: usize, unique: u32) -> Result<PathBuf> {
        let mut pattern = self.pattern.clone();
        if pattern.is_empty() {
            return Err(LoggerError::config("file_target", "pattern must not be empty"));
        }
        if self.generation_count() > 1 && !has_placeholder(&pattern, 'g') {
            pattern.push_str(".%g");
        }

        let mut out = String::with_capacity(pattern.len() + 8);
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('t') => {
                    chars.next();
                    out.push_str(&std::env::temp_dir().to_string_lossy());
                }
                Some('u') => {
                    chars.next();
                    out.push_str(&unique.to_string());
                }
                Some('g') => {
                    chars.next();
                    out.push_str(&generation.to_string());
                }
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                _ => out.push('%'),
            }
        }

        if unique > 0 && !has_placeholder(&pattern, 'u') {
            out.push('.');
            out.push_str(&unique.to_string());
        }
        Ok(PathBuf::from(out))
    }
}

/// Whether `pattern` contains `%<placeholder>`, ignoring escaped `%%`.
fn has_placeholder(pattern: &str, placeholder: char) -> bool {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some(next) if next == placeholder => return true,
                _ => {}
            }
        }
    }
    false
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(LOCK_EXTENSION);
    PathBuf::from(name)
}

/// Rotating file writer with exclusive locking.
///
/// # Examples
///
/// ```no_run
/// use rust_global_logger::handlers::{FileTarget, RotatingFileWriter};
///
/// let mut writer = RotatingFileWriter::open(FileTarget::new("logs/app%u.log")).unwrap();
/// writer.write_record("hello\n").unwrap();
/// writer.close();
/// ```
pub struct RotatingFileWriter {
    target: FileTarget,
    unique: u32,
    /// Generation paths, index 0 being the active file
    generations: Vec<PathBuf>,
    lock: Option<(File, PathBuf)>,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileWriter {
    /// Lock and open the active file of `target`.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is invalid, no unique number could be
    /// locked within [`MAX_UNIQUE_ATTEMPTS`], or the file cannot be opened
    pub fn open(target: FileTarget) -> Result<Self> {
        let (unique, generations, lock) = Self::acquire(&target)?;

        let mut writer = Self {
            target,
            unique,
            generations,
            lock: Some(lock),
            writer: None,
            current_size: 0,
        };

        if writer.target.append {
            let (file, size) = Self::open_active(&writer.generations[0], true)?;
            writer.writer = Some(BufWriter::new(file));
            writer.current_size = size;
        } else {
            writer.rotate()?;
        }
        Ok(writer)
    }

    /// Find the first unique number whose lock file is free.
    fn acquire(target: &FileTarget) -> Result<(u32, Vec<PathBuf>, (File, PathBuf))> {
        for unique in 0..MAX_UNIQUE_ATTEMPTS {
            let generations = (0..target.generation_count())
                .map(|generation| target.expand(generation, unique))
                .collect::<Result<Vec<_>>>()?;
            let active = &generations[0];

            if let Some(parent) = active.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "create log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }

            let lock_path = lock_path_for(active);
            let lock_file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)
                .map_err(|e| {
                    LoggerError::file_handler(
                        lock_path.display().to_string(),
                        format!("Failed to open lock file: {}", e),
                    )
                })?;

            match lock_file.try_lock_exclusive() {
                Ok(()) => return Ok((unique, generations, (lock_file, lock_path))),
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => continue,
                Err(e) => {
                    return Err(LoggerError::file_handler(
                        lock_path.display().to_string(),
                        format!("Failed to lock: {}", e),
                    ))
                }
            }
        }

        Err(LoggerError::file_lock(target.pattern.clone()))
    }

    fn open_active(path: &Path, append: bool) -> Result<(File, u64)> {
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let file = options.open(path).map_err(|e| {
            LoggerError::file_handler(path.display().to_string(), format!("Failed to open: {}", e))
        })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_handler(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        Ok((file, size))
    }

    /// Shift every generation up by one and start a fresh active file.
    ///
    /// The oldest generation is overwritten.
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.path().display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        for i in (0..self.generations.len().saturating_sub(1)).rev() {
            let old_path = &self.generations[i];
            let new_path = &self.generations[i + 1];
            if !old_path.exists() {
                continue;
            }
            if fs::rename(old_path, new_path).is_err() {
                // Some platforms refuse to rename over an existing file
                if new_path.exists() {
                    let _ = fs::remove_file(new_path);
                }
                fs::rename(old_path, new_path).map_err(|e| {
                    LoggerError::file_rotation(
                        old_path.display().to_string(),
                        format!("Failed to rotate generation {}: {}", i, e),
                    )
                })?;
            }
        }

        let (file, _) = Self::open_active(&self.generations[0], false)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;
        Ok(())
    }

    /// Write one formatted record and rotate once the size limit is reached.
    pub fn write_record(&mut self, text: &str) -> Result<()> {
        let path = &self.generations[0];
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::file_handler(
                    path.display().to_string(),
                    format!("Failed to write log record: {}", e),
                )
            })?;
        self.current_size += text.len() as u64;

        if let Some(limit) = self.target.size_limit() {
            if self.current_size >= limit {
                if let Err(e) = self.rotate() {
                    report_to_stderr(
                        "LOGGER ERROR",
                        &format!("Log rotation failed: {}. Continuing with current file.", e),
                    );
                    if self.writer.is_none() {
                        let (file, _) = Self::open_active(&self.generations[0], true)?;
                        self.writer = Some(BufWriter::new(file));
                    }
                    // Let the file grow past the limit instead of retrying on every record
                    self.current_size = 0;
                }
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_handler(
                    self.generations[0].display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    /// Flush, then release the file and its lock.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
        if let Some((file, path)) = self.lock.take() {
            let _ = fs2::FileExt::unlock(&file);
            drop(file);
            let _ = fs::remove_file(path);
        }
    }

    /// The active file.
    pub fn path(&self) -> &Path {
        &self.generations[0]
    }

    pub fn generations(&self) -> &[PathBuf] {
        &self.generations
    }

    pub fn unique(&self) -> u32 {
        self.unique
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    pub fn target(&self) -> &FileTarget {
        &self.target
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("path", &self.path())
            .field("unique", &self.unique)
            .field("current_size", &self.current_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pattern_in(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_expand_placeholders() {
        let target = FileTarget::new("logs/app-%u-%g%%.log");
        assert_eq!(target.expand(2, 3).unwrap(), PathBuf::from("logs/app-3-2%.log"));

        let temp = FileTarget::new("%t/app.log");
        assert!(temp.expand(0, 0).unwrap().starts_with(std::env::temp_dir()));
    }

    #[test]
    fn test_expand_appends_missing_placeholders() {
        let target = FileTarget::new("app.log").with_count(3);
        assert_eq!(target.expand(1, 0).unwrap(), PathBuf::from("app.log.1"));
        assert_eq!(target.expand(1, 2).unwrap(), PathBuf::from("app.log.1.2"));

        let single = FileTarget::new("app%%g.log");
        assert_eq!(single.expand(0, 0).unwrap(), PathBuf::from("app%g.log"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(FileTarget::new("").expand(0, 0).is_err());
    }

    #[test]
    fn test_write_and_append() {
        let dir = TempDir::new().unwrap();
        let target = FileTarget::new(pattern_in(&dir, "app%u.log")).with_append(true);

        let mut writer = RotatingFileWriter::open(target.clone()).unwrap();
        writer.write_record("first\n").unwrap();
        let path = writer.path().to_path_buf();
        writer.close();

        let mut writer = RotatingFileWriter::open(target).unwrap();
        writer.write_record("second\n").unwrap();
        writer.close();

        assert_eq!(fs::read_to_string(path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_open_without_append_rotates_previous_file() {
        let dir = TempDir::new().unwrap();
        let target = FileTarget::new(pattern_in(&dir, "app.%g.log")).with_count(2);

        let mut writer = RotatingFileWriter::open(target.clone()).unwrap();
        writer.write_record("old\n").unwrap();
        writer.close();

        let mut writer = RotatingFileWriter::open(target).unwrap();
        writer.write_record("new\n").unwrap();
        let generations = writer.generations().to_vec();
        writer.close();

        assert_eq!(fs::read_to_string(&generations[0]).unwrap(), "new\n");
        assert_eq!(fs::read_to_string(&generations[1]).unwrap(), "old\n");
    }

    #[test]
    fn test_size_rotation_keeps_count_generations() {
        let dir = TempDir::new().unwrap();
        let target = FileTarget::new(pattern_in(&dir, "app.%g.log"))
            .with_limit(10)
            .with_count(3);

        let mut writer = RotatingFileWriter::open(target).unwrap();
        for line in ["aaaaaaaaa\n", "bbbbbbbbb\n", "ccccccccc\n", "ddddddddd\n"] {
            writer.write_record(line).unwrap();
        }
        let generations = writer.generations().to_vec();
        writer.close();

        assert_eq!(fs::read_to_string(&generations[0]).unwrap(), "");
        assert_eq!(fs::read_to_string(&generations[1]).unwrap(), "ddddddddd\n");
        assert_eq!(fs::read_to_string(&generations[2]).unwrap(), "ccccccccc\n");
        assert!(!dir.path().join("app.3.log").exists());
    }

    #[test]
    fn test_failed_rotation_keeps_writing() {
        let dir = TempDir::new().unwrap();
        let target = FileTarget::new(pattern_in(&dir, "app.%g.log"))
            .with_limit(10)
            .with_count(2)
            .with_append(true);

        // A non-empty directory where the first backup belongs blocks the shift
        let blocker = dir.path().join("app.1.log");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let mut writer = RotatingFileWriter::open(target).unwrap();
        assert!(writer.write_record("aaaaaaaaa\n").is_ok());
        assert!(writer.write_record("bbbbbbbbb\n").is_ok());
        let active = writer.path().to_path_buf();
        writer.close();

        assert_eq!(fs::read_to_string(active).unwrap(), "aaaaaaaaa\nbbbbbbbbb\n");
        assert!(blocker.join("keep").exists());
    }

    #[test]
    fn test_locked_file_increments_unique() {
        let dir = TempDir::new().unwrap();
        let target = FileTarget::new(pattern_in(&dir, "app%u.log"));

        let first = RotatingFileWriter::open(target.clone()).unwrap();
        let second = RotatingFileWriter::open(target).unwrap();

        assert_eq!(first.unique(), 0);
        assert_eq!(second.unique(), 1);
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_close_removes_lock_file() {
        let dir = TempDir::new().unwrap();
        let writer = RotatingFileWriter::open(FileTarget::new(pattern_in(&dir, "app.log"))).unwrap();
        let lock = lock_path_for(writer.path());
        assert!(lock.exists());

        writer.close();
        assert!(!lock.exists());
    }
}
