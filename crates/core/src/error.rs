use std::collections::HashSet;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Create a source location with file information
    pub fn with_file(file: String, line: usize, column: usize) -> Self {
        Self {
            file: Some(file),
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Formats an optional location, `?` when the node carried no position.
fn at(location: &Option<SourceLocation>) -> String {
    match location {
        Some(location) => location.to_string(),
        None => "?".to_string(),
    }
}

/// Fatal errors that abort a compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A second layout (`export default`, or a re-export as `default`).
    #[error("Cannot specify multiple layouts (previous: {})", at(.previous))]
    MultipleLayouts {
        /// Where the second layout was found.
        location: Option<SourceLocation>,
        /// Where the first layout was found.
        previous: Option<SourceLocation>,
    },
    /// An import in `function-body` output without dynamic import rewriting.
    #[error(
        "Cannot use import statements in function-body at {}, unless `useDynamicImport` is on",
        at(.location)
    )]
    ImportInFunctionBody {
        /// Where the import was found.
        location: Option<SourceLocation>,
    },
    /// A re-export in `function-body` output without dynamic import rewriting.
    #[error(
        "Cannot use export statements with a source in function-body at {}, unless `useDynamicImport` is on",
        at(.location)
    )]
    ExportInFunctionBody {
        /// Where the export was found.
        location: Option<SourceLocation>,
    },
    /// Classic runtime asked to import the pragma without a pragma.
    #[error("Missing `pragma` in classic runtime with `pragmaImportSource`")]
    MissingPragma,
    /// Automatic runtime without a source to import `jsx-runtime` from.
    #[error("Missing `jsxImportSource` in automatic runtime")]
    MissingJsxImportSource,
    /// A relative module specifier needs resolving but no base URL was given.
    #[error("Cannot resolve relative specifier `{specifier}` without `baseUrl`")]
    MissingBaseUrl {
        /// The specifier that needed resolving.
        specifier: String,
    },
    /// The configured base URL could not be parsed or joined.
    #[error("Invalid `baseUrl` `{base_url}` for specifier `{specifier}`: {message}")]
    InvalidBaseUrl {
        /// The configured base URL.
        base_url: String,
        /// The specifier being resolved.
        specifier: String,
        /// Parser message.
        message: String,
    },
}

impl CompileError {
    /// Location of the offending node, when known.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            CompileError::MultipleLayouts { location, .. }
            | CompileError::ImportInFunctionBody { location }
            | CompileError::ExportInFunctionBody { location } => location.as_ref(),
            _ => None,
        }
    }
}

/// Non-fatal message attached to a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Source location, when known
    pub location: Option<SourceLocation>,
    /// Warning message
    pub message: String,
    /// Origin of the warning (e.g. `mdxc:document`)
    pub source: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {} ({})", location, self.message, self.source),
            None => write!(f, "{} ({})", self.message, self.source),
        }
    }
}

/// Warnings collected during one compilation session.
///
/// Warnings are surfaced to the caller, never interpreted by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Collected warnings, in the order they were raised
    pub warnings: Vec<Warning>,
    issued: HashSet<String>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning
    pub fn warn(
        &mut self,
        source: impl Into<String>,
        message: impl Into<String>,
        location: Option<SourceLocation>,
    ) {
        self.warnings.push(Warning {
            location,
            message: message.into(),
            source: source.into(),
        });
    }

    /// Add a warning unless one with the same `key` was already issued this session
    pub fn warn_once(
        &mut self,
        key: &str,
        source: impl Into<String>,
        message: impl Into<String>,
        location: Option<SourceLocation>,
    ) {
        if self.issued.insert(key.to_string()) {
            self.warn(source, message, location);
        }
    }

    /// Appends warnings gathered elsewhere (e.g. by a front end)
    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
        self.issued.extend(other.issued);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}
