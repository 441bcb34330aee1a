//! The CO compiler facade.
//!
//! Wires the pipeline together: tokenize and parse into the raw tree,
//! analyse into the typed tree, and — when no error-severity issue was
//! produced — emit the C translation unit. Re-exports the pieces a library
//! consumer needs to inspect results.

pub use co_backend::BackendError;
pub use co_core::{Issue, Locale, RenderedIssue, Severity};

use bumpalo::Bump;

/// The outcome of one compilation.
pub struct CompileOutput {
    /// The emitted translation unit; `None` when errors or an internal
    /// failure prevented emission.
    pub c_source: Option<String>,
    /// Every diagnostic, in deterministic pipeline order.
    pub issues: Vec<Issue>,
    /// An internal code-generation error (exit code 2), if any.
    pub internal_error: Option<BackendError>,
}

impl CompileOutput {
    /// Whether any error-severity issue was produced.
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    /// The process exit code the CLI reports: 0 success, 1 user errors,
    /// 2 internal errors.
    pub fn exit_code(&self) -> i32 {
        if self.internal_error.is_some() {
            2
        } else if self.has_errors() {
            1
        } else {
            0
        }
    }
}

/// Compile CO source text to C.
pub fn compile_to_c(source: &str) -> CompileOutput {
    let arena = Bump::new();
    let (program, mut issues) = co_parser::parse(&arena, source);
    tracing::debug!(issues = issues.len(), "parsing finished");

    let (analysis, analysis_issues) = co_compiler::analyze(&program);
    issues.extend(analysis_issues);

    let has_errors = issues
        .iter()
        .any(|issue| issue.severity == Severity::Error);
    if has_errors {
        return CompileOutput {
            c_source: None,
            issues,
            internal_error: None,
        };
    }

    match co_backend::process(&analysis) {
        Ok(c_source) => CompileOutput {
            c_source: Some(c_source),
            issues,
            internal_error: None,
        },
        Err(error) => {
            tracing::error!(%error, "code generation failed");
            CompileOutput {
                c_source: None,
                issues,
                internal_error: Some(error),
            }
        }
    }
}
