use thiserror::Error;

use mamematic_dat::DatError;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The `--directory` argument could not be entered
    #[error("Cannot change to directory {path}")]
    Directory {
        path: String,
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Catalog read/write error
    #[error(transparent)]
    Dat(#[from] DatError),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Render an error with its chain of causes, outermost first.
///
/// Causes already spelled out by the outer message are not repeated.
pub(crate) fn report(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
