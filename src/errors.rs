use std::path::PathBuf;

/// Result type with [`Error`] as the default error.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A corpus line that cannot be turned into a token.
    #[error("{}:{line}: {message}", path.display())]
    InvalidFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A training token without the gold tag the tables are counted from.
    #[error("sentence #{sentence}, token #{token}: missing gold tag")]
    MissingTag { sentence: usize, token: usize },

    /// Training input without a single token to count.
    #[error("corpus has no tokens")]
    EmptyCorpus,

    /// The model (or the classifier behind it) could not be built.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// A classifier evaluation failed in the middle of decoding.
    #[error("classifier failed: {0}")]
    Classifier(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_format<P, S>(path: P, line: usize, message: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self::InvalidFormat {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
