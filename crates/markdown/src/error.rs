use mdxc_core::{CompileError, SourceLocation};
use thiserror::Error;

/// Errors raised while compiling MDX text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MdxError {
    /// markdown-rs rejected the document.
    #[error("Parse error at {location}: {message}")]
    Parse {
        /// Parser message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// The embedded lowering rejected an ESM block or expression.
    #[error("Could not lower embedded code at {location}: {message}")]
    Lowering {
        /// Lowering message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// YAML frontmatter could not be turned into an export.
    #[error("Frontmatter error at {location}: {message}")]
    Frontmatter {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// The core pipeline failed.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl MdxError {
    /// Location of the failure, when known.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            MdxError::Parse { location, .. }
            | MdxError::Lowering { location, .. }
            | MdxError::Frontmatter { location, .. } => Some(location),
            MdxError::Compile(error) => error.location(),
        }
    }
}
