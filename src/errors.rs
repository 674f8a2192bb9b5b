use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DropError>;

#[derive(Error, Debug)]
pub enum DropError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Error occurred while reading {path}: {source}")]
    EntryRead {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{} of the dropped entries could not be read: {}", .failures.len(), summary(.failures))]
    AggregateDrop { failures: Vec<DropError> },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DropError {
    pub(crate) fn entry_read(path: impl Into<String>, source: io::Error) -> Self {
        Self::EntryRead {
            path: path.into(),
            source,
        }
    }

    /// Path of the entry that failed, if the error is tied to one
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::EntryRead { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DropError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

fn summary(failures: &[DropError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_read_names_the_path() {
        let err = DropError::entry_read(
            "/photos/a.jpg",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.path(), Some("/photos/a.jpg"));
        assert_eq!(
            err.to_string(),
            "Error occurred while reading /photos/a.jpg: denied"
        );
    }

    #[test]
    fn aggregate_lists_every_failure() {
        let err = DropError::AggregateDrop {
            failures: vec![
                DropError::entry_read("/a", io::Error::other("first")),
                DropError::entry_read("/b", io::Error::other("second")),
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("2 of the dropped entries"));
        assert!(message.contains("/a: first"));
        assert!(message.contains("/b: second"));
        assert_eq!(err.path(), None);
    }
}
