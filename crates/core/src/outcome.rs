//! Validation outcome and accumulator types.
//!
//! Every entity validator builds its result through an [`Accumulator`] owned
//! by the current call, then seals it into a [`ValidationOutcome`]. There is
//! no instance-held mutable state; a fresh accumulator per invocation is the
//! whole concurrency story of this crate.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

/// Issue code used when a validation pass itself fails unexpectedly.
pub const CODE_VALIDATION_ERROR: &str = "validation_error";

/// Field name used for issues that are not tied to a specific field.
pub const FIELD_GENERAL: &str = "general";

/// Severity of a single validation issue.
///
/// `Info` issues are advisory and travel in the `warnings` list; only `Error`
/// issues make an outcome invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single validation error, warning, or advisory notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub code: String,
    pub message: String,
    pub field: String,
    pub severity: Severity,
}

/// Issue counts attached to every outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_issues: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

/// Aggregated result of one validation pass over one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub has_warnings: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub summary: ValidationSummary,
}

impl ValidationOutcome {
    /// Returns `true` if any error or warning carries the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().chain(self.warnings.iter()).any(|i| i.code == code)
    }

    /// Returns `true` if any error carries the given code.
    pub fn has_error_code(&self, code: &str) -> bool {
        self.errors.iter().any(|i| i.code == code)
    }
}

/// Options accepted by entity validators.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Enables additional premium/quality checks (loudness standards, Dolby
    /// Atmos deliverables).
    pub strict: bool,
}

/// Mutable issue collector for a single validation pass.
///
/// Rules push issues as they find them; nothing short-circuits, so one pass
/// surfaces the complete set of problems.
#[derive(Debug, Default)]
pub struct Accumulator {
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, code: &str, field: &str, message: impl Into<String>) {
        self.errors.push(Issue {
            code: code.to_string(),
            message: message.into(),
            field: field.to_string(),
            severity: Severity::Error,
        });
    }

    pub fn warning(&mut self, code: &str, field: &str, message: impl Into<String>) {
        self.warnings.push(Issue {
            code: code.to_string(),
            message: message.into(),
            field: field.to_string(),
            severity: Severity::Warning,
        });
    }

    pub fn info(&mut self, code: &str, field: &str, message: impl Into<String>) {
        self.warnings.push(Issue {
            code: code.to_string(),
            message: message.into(),
            field: field.to_string(),
            severity: Severity::Info,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Seal the accumulator into an outcome.
    pub fn finish(self) -> ValidationOutcome {
        let error_count = self.errors.len();
        let warning_count = self.warnings.len();
        ValidationOutcome {
            is_valid: error_count == 0,
            has_warnings: warning_count > 0,
            errors: self.errors,
            warnings: self.warnings,
            summary: ValidationSummary {
                total_issues: error_count + warning_count,
                error_count,
                warning_count,
            },
        }
    }
}

/// Run a validation pass fail-closed.
///
/// A panic inside the pass (malformed input hitting an unexpected edge) is
/// converted into a single generic `validation_error` entry so callers always
/// receive a well-formed outcome, never an unwinding panic.
pub fn run_guarded<F>(f: F) -> ValidationOutcome
where
    F: FnOnce(&mut Accumulator),
{
    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut acc = Accumulator::new();
        f(&mut acc);
        acc
    }));

    match result {
        Ok(acc) => acc.finish(),
        Err(_) => {
            tracing::warn!("validation pass panicked; returning fail-closed outcome");
            let mut acc = Accumulator::new();
            acc.error(
                CODE_VALIDATION_ERROR,
                FIELD_GENERAL,
                "Validation could not be completed due to an internal error",
            );
            acc.finish()
        }
    }
}
