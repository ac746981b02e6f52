#![deny(missing_docs)]
//! mdxc core: compiles an MDX element tree into a JavaScript module.
//!
//! Stages run strictly in order, each consuming the previous one's tree:
//! [`normalize`], [`lower`], [`document`], [`resolve`], [`build_jsx`], and
//! [`serialize`].

/// JSX to runtime function calls.
pub mod build_jsx;
/// Canonical module shape: layout, content function, exports.
pub mod document;
/// Core error and diagnostic types.
pub mod error;
/// Code tree types.
pub mod estree;
/// Element tree types.
pub mod hast;
/// JavaScript identifier checks.
pub mod identifier;
/// Element tree to code tree.
pub mod lower;
/// Paragraph unwrapping and JSX provenance.
pub mod normalize;
/// Compilation options.
pub mod options;
/// JSX name resolution through the components registry.
pub mod resolve;
/// Code generation.
pub mod serialize;
/// Source Map v3 output.
pub mod source_map;
/// Source positions.
pub mod unist;
/// Mutable code tree traversal.
pub mod visit;

pub use error::{CompileError, Diagnostics, SourceLocation, Warning};
pub use options::{JsxRuntime, Options, OutputFormat};
pub use source_map::SourceMap;

/// Output of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Generated JavaScript.
    pub code: String,
    /// Source map, when [`Options::source_map`] is set.
    pub map: Option<SourceMap>,
    /// Warnings raised along the way.
    pub diagnostics: Diagnostics,
}

/// Compiles an element tree.
///
/// # Example
///
/// ```
/// use mdxc_core::hast::Node;
/// use mdxc_core::{Options, compile_tree};
///
/// let tree = Node::root(vec![Node::element("h1", vec![Node::text("Hello")])]);
/// let output = compile_tree(tree, &Options::default()).unwrap();
///
/// assert!(output.code.contains("_components.h1"));
/// assert!(output.code.ends_with("export default MDXContent;\n"));
/// ```
pub fn compile_tree(tree: hast::Node, options: &Options) -> Result<CompileOutput, CompileError> {
    compile_tree_with_source(tree, options, None, Diagnostics::new())
}

/// Compiles an element tree, embedding `source` in the source map and
/// continuing the `diagnostics` session started by a front end.
pub fn compile_tree_with_source(
    mut tree: hast::Node,
    options: &Options,
    source: Option<&str>,
    mut diagnostics: Diagnostics,
) -> Result<CompileOutput, CompileError> {
    normalize::normalize(&mut tree);
    let mut program = lower::to_program(tree);
    document::assemble(&mut program, options, &mut diagnostics)?;
    resolve::resolve(&mut program, options);
    if options.jsx {
        log::debug!("Keeping JSX in output");
    } else {
        build_jsx::build_jsx(&mut program, options);
    }

    let serialized = serialize::serialize(&program, options, source);
    Ok(CompileOutput {
        code: serialized.code,
        map: serialized.map,
        diagnostics,
    })
}
