//! Error types for vidcarve-assets.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Errors raised while loading asset archives or reading their objects.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The external dumper is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// The external dumper ran but reported failure.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// The dumper output could not be understood.
    #[error("failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },

    /// A single object could not be deserialized.
    #[error("object {index} unreadable: {message}")]
    ObjectRead { index: usize, message: String },

    /// A resource file referenced by an object could not be read.
    #[error("resource {} unreadable: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an object read error.
    pub fn object_read(index: usize, message: impl Into<String>) -> Self {
        Self::ObjectRead {
            index,
            message: message.into(),
        }
    }
}
