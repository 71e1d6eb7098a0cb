use std::path::PathBuf;

/// Errors raised around the mind-map core: reading documents, loading
/// configuration and watching files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no markdown documents found in {}", .0.display())]
    NoDocuments(PathBuf),

    #[error("unknown document '{0}'")]
    UnknownDocument(String),

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid keybinding '{key}' for {action}: {message}")]
    Keybinding {
        key: String,
        action: String,
        message: String,
    },

    #[error("file watcher: {0}")]
    Watch(#[from] notify::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
