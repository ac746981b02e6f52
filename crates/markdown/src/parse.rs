//! markdown-rs parsing.

use crate::MdxError;
use markdown::mdast::Node;
use markdown::message::{Message, Place};
use mdxc_core::SourceLocation;
use serde::Deserialize;

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Enable MDX constructs (JSX, ESM, expressions).
    pub mdx: bool,
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Enable YAML frontmatter parsing.
    pub frontmatter: bool,
    /// Enable indented code blocks.
    pub code_indented: bool,
}

impl ParseOptions {
    /// Plain markdown (`.md`): no MDX constructs.
    pub const fn markdown() -> Self {
        Self {
            mdx: false,
            gfm: true,
            frontmatter: true,
            code_indented: true,
        }
    }

    /// MDX defaults (JSX/ESM/expression enabled).
    pub const fn mdx() -> Self {
        Self {
            mdx: true,
            gfm: true,
            frontmatter: true,
            code_indented: false,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: self.frontmatter,
            code_indented: self.code_indented,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.mdx {
            // HTML is replaced by JSX in MDX.
            constructs.html_flow = false;
            constructs.html_text = false;
            constructs.mdx_esm = true;
            constructs.mdx_expression_flow = true;
            constructs.mdx_expression_text = true;
            constructs.mdx_jsx_flow = true;
            constructs.mdx_jsx_text = true;
        }

        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::mdx()
    }
}

/// Parse MDX text into an mdast tree.
pub fn parse_mdast(
    input: &str,
    options: &ParseOptions,
    file: Option<&str>,
) -> Result<Node, MdxError> {
    log::debug!("Parsing {} bytes (mdx: {})", input.len(), options.mdx);
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| MdxError::Parse {
        message: err.to_string(),
        location: message_location(&err, file),
    })
}

fn message_location(message: &Message, file: Option<&str>) -> SourceLocation {
    let (line, column) = match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => (point.line, point.column),
            Place::Position(position) => (position.start.line, position.start.column),
        },
        None => (1, 1),
    };
    match file {
        Some(file) => SourceLocation::with_file(file.to_string(), line, column),
        None => SourceLocation::new(line, column),
    }
}
