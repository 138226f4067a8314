//! Errors surfaced by the command-line caller.

use std::path::PathBuf;

use duckrest_core::{DuckRestError, ErrorInfo};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// A client call failed.
    #[error(transparent)]
    Client(#[from] DuckRestError),

    /// A script statement failed; later statements were not run.
    #[error("Statement {index} failed: {source}")]
    Statement {
        /// 1-based position of the statement in the script.
        index: usize,
        #[source]
        source: DuckRestError,
    },

    /// The script file could not be read.
    #[error("Failed to read script {}: {source}", .path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The script could not be split into statements.
    #[error("Invalid script {}: {message}", .path.display())]
    ScriptSyntax { path: PathBuf, message: &'static str },

    /// Writing results to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Convert to the error document printed on stderr.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::Client(e) => e.to_error_info(),
            Self::Statement { index, source } => {
                let mut info = source.to_error_info();
                info.message = format!("Statement {index} failed: {}", info.message);
                info
            }
            Self::Script { path, source } => ErrorInfo {
                error_type: "Script Error".to_string(),
                message: self.to_string(),
                hint: Some("Check that the script path exists and is readable".to_string()),
                technical_detail: Some(format!("Path: {}\n{source}", path.display())),
            },
            Self::ScriptSyntax { path, .. } => ErrorInfo {
                error_type: "Script Error".to_string(),
                message: self.to_string(),
                hint: Some("Close every quoted string and block comment".to_string()),
                technical_detail: Some(format!("Path: {}", path.display())),
            },
            Self::Output(source) => ErrorInfo {
                error_type: "Output Error".to_string(),
                message: self.to_string(),
                hint: None,
                technical_detail: Some(source.to_string()),
            },
        }
    }
}
