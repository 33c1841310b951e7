use std::path::PathBuf;

/// Typed errors for karafo operations.
/// We use `anyhow` at the top level for CLI error handling,
/// but the engine keeps failures precise so they can be logged per path.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// File system operation failed
    #[error("{}: {source}", io_kind_name(.source))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an error record failed
    #[error("failed to write error log '{}': {source}", .path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SweepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SweepError::Io {
            path: path.into(),
            source,
        }
    }

    /// The path the failure is about
    pub fn path(&self) -> &std::path::Path {
        match self {
            SweepError::Io { path, .. } | SweepError::LogWrite { path, .. } => path,
        }
    }
}

/// Render an I/O error as `"<Kind>: <message>"`, the shape used in error records.
pub fn describe_io(err: &std::io::Error) -> String {
    format!("{}: {}", io_kind_name(err), err)
}

fn io_kind_name(err: &std::io::Error) -> String {
    format!("{:?}", err.kind())
}
