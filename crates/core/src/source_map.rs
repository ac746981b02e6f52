//! Source Map v3 generation.

use serde::{Deserialize, Serialize};

use crate::unist::Point;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// A Source Map v3 document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    /// Always `3`.
    pub version: u8,
    /// Generated file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Original file names.
    pub sources: Vec<String>,
    /// Original file contents, parallel to `sources`.
    #[serde(default)]
    pub sources_content: Vec<Option<String>>,
    /// Symbol names referenced by mappings.
    pub names: Vec<String>,
    /// Base64 VLQ encoded mappings.
    pub mappings: String,
}

impl SourceMap {
    /// Serializes the map to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mapping {
    generated_line: usize,
    generated_column: usize,
    original_line: usize,
    original_column: usize,
    name: Option<usize>,
}

/// Collects mappings while code is generated.
///
/// Generated positions are 0-based lines and UTF-16 columns; original
/// positions are the 1-based points carried by the trees.
#[derive(Debug, Clone, Default)]
pub struct SourceMapBuilder {
    source: String,
    mappings: Vec<Mapping>,
    names: Vec<String>,
}

impl SourceMapBuilder {
    /// Builder for a map pointing back at `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Records that `generated` came from `original`.
    pub fn add(
        &mut self,
        generated_line: usize,
        generated_column: usize,
        original: Point,
        name: Option<&str>,
    ) {
        let name = name.map(|name| match self.names.iter().position(|known| known == name) {
            Some(index) => index,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        });
        let mapping = Mapping {
            generated_line,
            generated_column,
            original_line: original.line.saturating_sub(1),
            original_column: original.column.saturating_sub(1),
            name,
        };
        if let Some(last) = self.mappings.last()
            && last.generated_line == generated_line
            && last.generated_column == generated_column
        {
            return;
        }
        self.mappings.push(mapping);
    }

    /// Number of recorded mappings.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Finishes the map.
    pub fn build(self, source_content: Option<String>) -> SourceMap {
        let mut mappings = String::new();
        let mut line = 0;
        let mut previous_column = 0i64;
        let mut previous_original_line = 0i64;
        let mut previous_original_column = 0i64;
        let mut previous_name = 0i64;
        let mut first_in_line = true;

        for mapping in &self.mappings {
            while line < mapping.generated_line {
                mappings.push(';');
                line += 1;
                previous_column = 0;
                first_in_line = true;
            }
            if !first_in_line {
                mappings.push(',');
            }
            first_in_line = false;

            encode_vlq(&mut mappings, mapping.generated_column as i64 - previous_column);
            previous_column = mapping.generated_column as i64;
            encode_vlq(&mut mappings, 0);
            encode_vlq(
                &mut mappings,
                mapping.original_line as i64 - previous_original_line,
            );
            previous_original_line = mapping.original_line as i64;
            encode_vlq(
                &mut mappings,
                mapping.original_column as i64 - previous_original_column,
            );
            previous_original_column = mapping.original_column as i64;
            if let Some(name) = mapping.name {
                encode_vlq(&mut mappings, name as i64 - previous_name);
                previous_name = name as i64;
            }
        }

        SourceMap {
            version: 3,
            file: None,
            sources: vec![self.source],
            sources_content: vec![source_content],
            names: self.names,
            mappings,
        }
    }
}

/// Appends `value` as a Base64 VLQ.
pub fn encode_vlq(out: &mut String, value: i64) {
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };
    loop {
        let mut digit = vlq & 0b11111;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b100000;
        }
        out.push(BASE64[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}
