//! Compilation options.

use serde::Deserialize;

/// Shape of the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// A module with import/export statements and a default export.
    #[default]
    #[serde(alias = "module")]
    Program,
    /// The body of a function, returning an object of exports.
    #[serde(alias = "inline-body")]
    FunctionBody,
}

/// JSX runtime convention used for pragmas and markup lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsxRuntime {
    /// `jsx`/`jsxs` calls imported from `<importSource>/jsx-runtime`.
    #[default]
    Automatic,
    /// Calls to a configured pragma such as `React.createElement`.
    Classic,
}

/// Configuration consumed by every stage of one compilation.
///
/// Resolved once and shared by reference; no stage mutates it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Module or function-body output.
    pub output_format: OutputFormat,
    /// Rewrite imports and re-exports into awaited dynamic imports in function-body output.
    pub use_dynamic_import: bool,
    /// URL that relative and root-relative module specifiers resolve against.
    pub base_url: Option<String>,
    /// JSX runtime convention.
    pub jsx_runtime: JsxRuntime,
    /// Package providing `jsx-runtime` in the automatic runtime.
    pub jsx_import_source: Option<String>,
    /// Element factory in the classic runtime.
    pub pragma: Option<String>,
    /// Fragment component in the classic runtime.
    pub pragma_frag: Option<String>,
    /// Package to import the pragma's root identifier from in the classic runtime.
    pub pragma_import_source: Option<String>,
    /// Package exporting `useMDXComponents`, merged into every components registry.
    pub provider_import_source: Option<String>,
    /// Bind runtime helpers from `arguments[0]` instead of importing them.
    pub sandboxed: bool,
    /// Keep JSX in the output instead of lowering it to function calls.
    pub jsx: bool,
    /// Generate a source map alongside the code.
    pub source_map: bool,
    /// Path of the document, used in diagnostics and source maps.
    pub filepath: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Program,
            use_dynamic_import: false,
            base_url: None,
            jsx_runtime: JsxRuntime::Automatic,
            jsx_import_source: Some("react".to_string()),
            pragma: Some("React.createElement".to_string()),
            pragma_frag: Some("React.Fragment".to_string()),
            pragma_import_source: None,
            provider_import_source: None,
            sandboxed: false,
            jsx: false,
            source_map: false,
            filepath: None,
        }
    }
}

impl Options {
    /// Options producing a function body for `new Function` style evaluation.
    pub fn function_body() -> Self {
        Self {
            output_format: OutputFormat::FunctionBody,
            ..Self::default()
        }
    }

    /// Whether runtime helpers come from `arguments[0]` rather than imports.
    pub fn binds_from_arguments(&self) -> bool {
        self.sandboxed || self.output_format == OutputFormat::FunctionBody
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.output_format, OutputFormat::Program);
        assert_eq!(options.jsx_runtime, JsxRuntime::Automatic);
        assert_eq!(options.jsx_import_source.as_deref(), Some("react"));
        assert!(!options.binds_from_arguments());
        assert!(Options::function_body().binds_from_arguments());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: Options = serde_json::from_str(
            r#"{
                "outputFormat": "inline-body",
                "useDynamicImport": true,
                "baseUrl": "https://example.com/docs/",
                "jsxRuntime": "classic",
                "pragma": null,
                "providerImportSource": "@mdx-js/react"
            }"#,
        )
        .expect("options should deserialize");

        assert_eq!(options.output_format, OutputFormat::FunctionBody);
        assert!(options.use_dynamic_import);
        assert_eq!(options.jsx_runtime, JsxRuntime::Classic);
        assert_eq!(options.pragma, None);
        assert_eq!(options.pragma_frag.as_deref(), Some("React.Fragment"));
        assert_eq!(
            options.provider_import_source.as_deref(),
            Some("@mdx-js/react")
        );
    }

    #[test]
    fn test_deserialize_module_alias() {
        let options: Options =
            serde_json::from_str(r#"{"outputFormat": "module"}"#).expect("deserialize");
        assert_eq!(options.output_format, OutputFormat::Program);
    }
}
