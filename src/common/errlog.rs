use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::errors::SweepError;

/// A single recoverable failure, as written to the error log.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub time: DateTime<Local>,
    pub target: PathBuf,
    pub detail: String,
}

impl ErrorRecord {
    pub fn new(target: &Path, detail: &str) -> Self {
        Self {
            time: Local::now(),
            target: target.to_path_buf(),
            detail: detail.to_string(),
        }
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "time: {}", self.time.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "target path: {}", self.target.display())?;
        writeln!(f, "error detail: {}", self.detail)
    }
}

/// Destination for recoverable failures.
///
/// Every failure the engine swallows ends up here. `record` returns where
/// the record was stored so callers can point the user at it.
pub trait ErrorSink {
    fn record(&self, target: &Path, message: &str) -> Result<PathBuf, SweepError>;
}

/// Record a failure and mirror it to tracing. A sink that cannot write is
/// itself only reported through tracing.
pub fn report(sink: &dyn ErrorSink, target: &Path, message: &str) -> Option<PathBuf> {
    tracing::warn!(path = %target.display(), "{}", message);
    match sink.record(target, message) {
        Ok(location) => Some(location),
        Err(e) => {
            tracing::error!("{}", e);
            None
        }
    }
}

/// Writes timestamped text records into a log directory.
///
/// Records that land in the same second share a file and are appended.
#[derive(Debug, Clone)]
pub struct FileErrorLog {
    dir: PathBuf,
}

impl FileErrorLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, time: &DateTime<Local>) -> PathBuf {
        self.dir.join(format!(
            "karafo-error-{}.txt",
            time.format("%Y-%m-%d_%H-%M-%S")
        ))
    }
}

impl ErrorSink for FileErrorLog {
    fn record(&self, target: &Path, message: &str) -> Result<PathBuf, SweepError> {
        let record = ErrorRecord::new(target, message);
        let out_path = self.file_for(&record.time);

        std::fs::create_dir_all(&self.dir).map_err(|source| SweepError::LogWrite {
            path: self.dir.clone(),
            source,
        })?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&out_path)
            .map_err(|source| SweepError::LogWrite {
                path: out_path.clone(),
                source,
            })?;
        writeln!(file, "{}", record).map_err(|source| SweepError::LogWrite {
            path: out_path.clone(),
            source,
        })?;

        Ok(out_path)
    }
}

/// Keeps records in memory. Useful for embedding callers and tests.
#[derive(Debug, Default)]
pub struct MemoryErrorLog {
    records: Mutex<Vec<ErrorRecord>>,
}

impl MemoryErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ErrorRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorSink for MemoryErrorLog {
    fn record(&self, target: &Path, message: &str) -> Result<PathBuf, SweepError> {
        let mut records = match self.records.lock() {
            Ok(r) => r,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push(ErrorRecord::new(target, message));
        Ok(PathBuf::from(format!("memory:{}", records.len() - 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_format_has_all_fields() {
        let record = ErrorRecord::new(Path::new("/tmp/a"), "NotFound: gone");
        let text = record.to_string();
        assert!(text.starts_with("time: "));
        assert!(text.contains("target path: /tmp/a"));
        assert!(text.contains("error detail: NotFound: gone"));
    }

    #[test]
    fn test_file_log_writes_record() {
        let tmp = tempfile::TempDir::new().unwrap();
        let log = FileErrorLog::new(tmp.path().join("logs"));

        let location = log.record(Path::new("/x/y"), "PermissionDenied: no").unwrap();
        let contents = std::fs::read_to_string(&location).unwrap();

        assert!(location.starts_with(tmp.path().join("logs")));
        assert!(contents.contains("target path: /x/y"));
        assert!(contents.contains("error detail: PermissionDenied: no"));
    }

    #[test]
    fn test_memory_log_collects() {
        let log = MemoryErrorLog::new();
        assert!(log.is_empty());
        report(&log, Path::new("/a"), "one");
        report(&log, Path::new("/b"), "two");
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[1].target, PathBuf::from("/b"));
    }
}
