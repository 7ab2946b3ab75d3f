/// Failure moving bytes between the learner and the store.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("io error on {key}: {source}")]
    Io {
        key: String,
        source: std::io::Error,
    },
    #[error("remote store error on {key}: {message}")]
    Remote { key: String, message: String },
    #[error("failed to decompress {key}: {source}")]
    Decompress {
        key: String,
        source: std::io::Error,
    },
    #[error("invalid store url: {0}")]
    Url(String),
}

impl TransferError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(key.to_string()),
            _ => Self::Io {
                key: key.to_string(),
                source,
            },
        }
    }
    pub(crate) fn remote(key: &str, message: impl std::fmt::Debug) -> Self {
        Self::Remote {
            key: key.to_string(),
            message: format!("{:?}", message),
        }
    }
}
