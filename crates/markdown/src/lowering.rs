//! Hook for turning embedded JavaScript source into code-tree nodes.
//!
//! markdown-rs only finds where ESM blocks and `{expressions}` start and end;
//! it does not parse JavaScript. Callers plug in a JavaScript parser here.

use mdxc_core::estree::{Expression, Statement};
use mdxc_core::unist::Position;
use thiserror::Error;

/// Error raised by an [`EmbeddedLowering`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoweringError {
    /// Human readable reason.
    pub message: String,
}

impl LoweringError {
    /// Creates an error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Lowers embedded JavaScript source text into code-tree nodes.
///
/// `position` is where the source starts in the document; implementations
/// use it to put spans on the nodes they produce.
pub trait EmbeddedLowering: Sync {
    /// An ESM block: `import`/`export` statements.
    fn lower_esm(
        &self,
        source: &str,
        position: Option<Position>,
    ) -> Result<Vec<Statement>, LoweringError>;

    /// The inside of `{…}` in content or as an attribute value.
    ///
    /// Returns `None` for braces holding only whitespace or comments.
    fn lower_expression(
        &self,
        source: &str,
        position: Option<Position>,
    ) -> Result<Option<Expression>, LoweringError>;

    /// The inside of an attribute `{…props}`, returning the spread argument.
    fn lower_spread(
        &self,
        source: &str,
        position: Option<Position>,
    ) -> Result<Expression, LoweringError>;
}

/// Lowering for documents without embedded JavaScript.
///
/// Empty braces are accepted; anything else is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmbeddedCode;

impl EmbeddedLowering for NoEmbeddedCode {
    fn lower_esm(
        &self,
        _source: &str,
        _position: Option<Position>,
    ) -> Result<Vec<Statement>, LoweringError> {
        Err(LoweringError::new(
            "Cannot handle import/export without an embedded lowering",
        ))
    }

    fn lower_expression(
        &self,
        source: &str,
        _position: Option<Position>,
    ) -> Result<Option<Expression>, LoweringError> {
        if source.trim().is_empty() {
            Ok(None)
        } else {
            Err(LoweringError::new(
                "Cannot handle expressions without an embedded lowering",
            ))
        }
    }

    fn lower_spread(
        &self,
        _source: &str,
        _position: Option<Position>,
    ) -> Result<Expression, LoweringError> {
        Err(LoweringError::new(
            "Cannot handle attribute spreads without an embedded lowering",
        ))
    }
}
