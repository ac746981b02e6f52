#![deny(missing_docs)]
//! MDX text front end for mdxc.
//!
//! Parses MDX with markdown-rs, converts the mdast into the element tree the
//! core compiler consumes, and hands embedded JavaScript to a caller-supplied
//! [`EmbeddedLowering`].

/// Parallel compilation of many documents.
pub mod batch;
/// Front end errors.
pub mod error;
/// YAML frontmatter exports.
pub mod frontmatter;
/// Embedded JavaScript lowering hook.
pub mod lowering;
/// markdown-rs parsing.
pub mod parse;
/// mdast to element tree conversion.
pub mod to_hast;

pub use error::MdxError;
pub use lowering::{EmbeddedLowering, LoweringError, NoEmbeddedCode};
pub use mdxc_core::{CompileOutput, Options};
pub use parse::ParseOptions;

use mdxc_core::Diagnostics;
use serde::Deserialize;

/// Front end settings, separate from the core [`Options`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkdownOptions {
    /// Which constructs the parser recognizes.
    pub parse: ParseOptions,
    /// Export YAML frontmatter under this name (e.g. `frontmatter`);
    /// frontmatter is dropped when unset.
    pub frontmatter_export: Option<String>,
}

/// Compiles MDX text with default front end settings.
pub fn compile(
    source: &str,
    lowering: &dyn EmbeddedLowering,
    options: &Options,
) -> Result<CompileOutput, MdxError> {
    compile_with(source, lowering, options, &MarkdownOptions::default())
}

/// Compiles MDX text.
///
/// # Example
///
/// ```
/// use mdxc_markdown::{MarkdownOptions, NoEmbeddedCode, Options, compile_with};
///
/// let output = compile_with(
///     "# Hello",
///     &NoEmbeddedCode,
///     &Options::default(),
///     &MarkdownOptions::default(),
/// )
/// .unwrap();
/// assert!(output.code.contains("_jsx(_components.h1, {children: \"Hello\"})"));
/// ```
pub fn compile_with(
    source: &str,
    lowering: &dyn EmbeddedLowering,
    options: &Options,
    markdown: &MarkdownOptions,
) -> Result<CompileOutput, MdxError> {
    let file = options.filepath.as_deref();
    let mdast = parse::parse_mdast(source, &markdown.parse, file)?;

    let mut diagnostics = Diagnostics::new();
    let tree = to_hast::to_hast(
        mdast,
        lowering,
        markdown.frontmatter_export.as_deref(),
        file,
        &mut diagnostics,
    )?;

    Ok(mdxc_core::compile_tree_with_source(
        tree,
        options,
        Some(source),
        diagnostics,
    )?)
}
