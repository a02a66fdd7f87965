use miette::Diagnostic;
use thiserror::Error;

/// Main error type for hmic operations
#[derive(Error, Diagnostic, Debug)]
pub enum HmicError {
    #[error("IO error: {0}")]
    #[diagnostic(code(hmic::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(hmic::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Encode error: {message}")]
    #[diagnostic(code(hmic::encode))]
    Encode {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Media error: {message}")]
    #[diagnostic(code(hmic::media))]
    Media {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(hmic::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation failed: {message}")]
    #[diagnostic(code(hmic::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("JSON error: {0}")]
    #[diagnostic(code(hmic::json))]
    Json(#[from] serde_json::Error),

    #[error("Operation cancelled")]
    #[diagnostic(code(hmic::cancelled))]
    Cancelled,
}

impl HmicError {
    /// Wrap an I/O failure with the path it happened on.
    pub fn io(path: impl Into<std::path::PathBuf>, context: &str, err: std::io::Error) -> Self {
        HmicError::Io {
            path: path.into(),
            message: format!("{}: {}", context, err),
        }
    }
}

pub type Result<T> = std::result::Result<T, HmicError>;
