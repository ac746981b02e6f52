//! Batch processing types and utilities for parallel compilation.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::Deserialize;

use crate::{CompileOutput, EmbeddedLowering, MarkdownOptions, Options, compile_with};

/// Input for batch processing - represents a single file to compile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInput {
    /// File identifier (typically the file path).
    pub id: String,
    /// MDX source content.
    pub source: String,
    /// Optional filepath override for diagnostics and source maps.
    #[serde(default)]
    pub filepath: Option<String>,
}

/// Result for a single file in a batch.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// File identifier matching the input.
    pub id: String,
    /// Compilation result (present on success).
    pub result: Option<CompileOutput>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStats {
    /// Total number of files submitted.
    pub total: u32,
    /// Number of successfully compiled files.
    pub succeeded: u32,
    /// Number of failed compilations.
    pub failed: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to rayon's global pool.
    pub max_threads: Option<usize>,
    /// Whether to continue processing after an error. Defaults to true.
    pub continue_on_error: Option<bool>,
    /// Compiler options shared by every file; `filepath` is set per file.
    pub options: Options,
    /// Front end settings shared by every file.
    pub markdown: MarkdownOptions,
}

/// Result of batch processing containing all results and statistics.
#[derive(Debug, Clone)]
pub struct BatchProcessingResult {
    /// Individual results, in input order.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Compiles many independent documents in parallel.
///
/// With `continue_on_error` off, files are compiled one after another and
/// processing stops after the first failure.
pub fn compile_batch(
    inputs: Vec<BatchInput>,
    lowering: &dyn EmbeddedLowering,
    options: &BatchOptions,
) -> BatchProcessingResult {
    let start = Instant::now();
    let continue_on_error = options.continue_on_error.unwrap_or(true);

    let pool = options.max_threads.and_then(|max_threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads)
            .build()
            .map_err(|err| log::warn!("Falling back to the global thread pool: {err}"))
            .ok()
    });

    let total = inputs.len() as u32;
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let filepath = input.filepath.clone().unwrap_or_else(|| input.id.clone());
        let file_options = Options {
            filepath: Some(filepath),
            ..options.options.clone()
        };
        match compile_with(&input.source, lowering, &file_options, &options.markdown) {
            Ok(result) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: Some(result),
                    error: None,
                }
            }
            Err(e) => {
                log::debug!("Failed to compile {}: {e}", input.id);
                failed.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        match &pool {
            Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = process_input(input);
            let had_error = result.error.is_some();
            results.push(result);
            if had_error {
                break;
            }
        }
        results
    };

    let elapsed = start.elapsed();
    log::debug!(
        "Compiled {} of {} documents in {:?}",
        succeeded.load(Ordering::Relaxed),
        total,
        elapsed
    );

    BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoEmbeddedCode;

    fn input(id: &str, source: &str) -> BatchInput {
        BatchInput {
            id: id.to_string(),
            source: source.to_string(),
            filepath: None,
        }
    }

    #[test]
    fn test_results_keep_input_order() {
        let inputs = (0..8)
            .map(|index| input(&format!("doc-{index}.mdx"), &format!("# Doc {index}")))
            .collect();
        let options = BatchOptions {
            max_threads: Some(2),
            ..BatchOptions::default()
        };
        let batch = compile_batch(inputs, &NoEmbeddedCode, &options);

        assert_eq!(batch.stats.total, 8);
        assert_eq!(batch.stats.succeeded, 8);
        assert_eq!(batch.stats.failed, 0);
        for (index, result) in batch.results.iter().enumerate() {
            assert_eq!(result.id, format!("doc-{index}.mdx"));
            let output = result.result.as_ref().expect("compiled");
            assert!(output.code.contains(&format!("\"Doc {index}\"")));
        }
    }

    #[test]
    fn test_failures_are_reported_per_file() {
        let inputs = vec![
            input("good.mdx", "# Good"),
            input("bad.mdx", "{value}"),
            input("also-good.mdx", "text"),
        ];
        let batch = compile_batch(inputs, &NoEmbeddedCode, &BatchOptions::default());

        assert_eq!(batch.stats.succeeded, 2);
        assert_eq!(batch.stats.failed, 1);
        let error = batch.results[1].error.as_deref().expect("error");
        assert!(error.starts_with("Could not lower embedded code at bad.mdx:1:1"));
    }

    #[test]
    fn test_stop_on_first_error() {
        let inputs = vec![
            input("bad.mdx", "{value}"),
            input("good.mdx", "# Good"),
        ];
        let options = BatchOptions {
            continue_on_error: Some(false),
            ..BatchOptions::default()
        };
        let batch = compile_batch(inputs, &NoEmbeddedCode, &options);

        assert_eq!(batch.results.len(), 1);
        assert_eq!(batch.stats.total, 2);
        assert_eq!(batch.stats.failed, 1);
        assert_eq!(batch.stats.succeeded, 0);
    }
}
