//! Configuration validation for search runs.
//!
//! Checks an [`EngineConfig`] before any worker is spawned. Detects:
//! - Zero worker threads
//! - Empty population
//! - No survivors, or more survivors than population
//! - Zero queue capacity
//!
//! Every problem is reported, not just the first.

use std::fmt;

use crate::search::EngineConfig;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `threads_count` is zero.
    NoThreads,
    /// `population_size` is zero.
    EmptyPopulation,
    /// `best_per_thread` is zero.
    NoSurvivors,
    /// `best_per_thread` exceeds `population_size`.
    SurvivorsExceedPopulation,
    /// The requested queue capacity is zero.
    ZeroCapacity,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates an engine configuration.
///
/// Checks:
/// 1. At least one worker thread
/// 2. Non-empty population
/// 3. At least one survivor, and no more survivors than population
/// 4. Non-zero requested queue capacity
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &EngineConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.threads_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoThreads,
            "threads_count must be at least 1",
        ));
    }

    if config.population_size == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyPopulation,
            "population_size must be at least 1",
        ));
    }

    if config.best_per_thread == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoSurvivors,
            "best_per_thread must be at least 1",
        ));
    } else if config.best_per_thread > config.population_size {
        errors.push(ValidationError::new(
            ValidationErrorKind::SurvivorsExceedPopulation,
            format!(
                "best_per_thread ({}) exceeds population_size ({})",
                config.best_per_thread, config.population_size
            ),
        ));
    }

    // Derived capacity is already zero when threads or population are.
    if config.queue_capacity == Some(0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroCapacity,
            "queue_capacity must be at least 1",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
