use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid file extension pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("failed to start file watcher: {0}")]
    Watcher(#[source] notify::Error),

    #[error("failed to watch {}: {source}", root.display())]
    Watch {
        root: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("namespace scan worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
