//! Tensor validation.
//!
//! Checks run on assembled and scaled tensors before they are handed to a
//! model:
//!
//! 1. **Finite values**: no NaN/Inf anywhere
//! 2. **Padding**: rows past each sample's length are all zero (raw tensors only;
//!    scaling moves padding away from zero)
//! 3. **Alignment**: label count equals the tensor's sample count
//! 4. **Class coverage**: every class present (warning only)
//!
//! # Usage
//!
//! ```
//! use ndarray::Array3;
//! use skillshot_loader::validation::TensorValidator;
//!
//! let tensor = Array3::<f64>::zeros((2, 3, 4));
//! let result = TensorValidator::new().validate_raw(&tensor, &[3, 0]);
//! assert!(result.is_valid());
//! ```

use crate::labeling::{SkillshotLabel, NUM_CLASSES};
use ndarray::{s, Array3};
use std::fmt;

/// Validation result for a single check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    /// Data is valid
    Valid,
    /// Data has minor issues (warnings)
    Warning(String),
    /// Data has serious issues (errors)
    Error(String),
}

impl ValidationLevel {
    /// Check if this result indicates valid data.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationLevel::Valid)
    }

    /// Check if this result is a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationLevel::Warning(_))
    }

    /// Check if this result is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, ValidationLevel::Error(_))
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Valid => write!(f, "Valid"),
            ValidationLevel::Warning(msg) => write!(f, "Warning: {msg}"),
            ValidationLevel::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Aggregated validation result.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    results: Vec<(String, ValidationLevel)>,
}

impl ValidationResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation result.
    pub fn add(&mut self, check_name: &str, level: ValidationLevel) {
        self.results.push((check_name.to_string(), level));
    }

    /// Append all checks from another result.
    pub fn merge(&mut self, other: ValidationResult) {
        self.results.extend(other.results);
    }

    /// Check if all validations passed (no errors or warnings).
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, level)| level.is_valid())
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_error())
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_warning())
    }

    /// Get all warnings as `check: message`.
    pub fn warnings(&self) -> Vec<String> {
        self.collect_messages(ValidationLevel::is_warning)
    }

    /// Get all errors as `check: message`.
    pub fn errors(&self) -> Vec<String> {
        self.collect_messages(ValidationLevel::is_error)
    }

    fn collect_messages(&self, keep: fn(&ValidationLevel) -> bool) -> Vec<String> {
        self.results
            .iter()
            .filter(|(_, level)| keep(level))
            .map(|(name, level)| match level {
                ValidationLevel::Warning(msg) | ValidationLevel::Error(msg) => {
                    format!("{name}: {msg}")
                }
                ValidationLevel::Valid => name.clone(),
            })
            .collect()
    }

    /// Get all results.
    pub fn all_results(&self) -> &[(String, ValidationLevel)] {
        &self.results
    }

    /// Get the number of checks performed.
    pub fn check_count(&self) -> usize {
        self.results.len()
    }

    /// Get the number of passed checks.
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, l)| l.is_valid()).count()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = self.passed_count();
        let total = self.check_count();
        writeln!(f, "Validation: {passed}/{total} checks passed")?;

        for (name, level) in &self.results {
            if !level.is_valid() {
                writeln!(f, "  - {name}: {level}")?;
            }
        }

        Ok(())
    }
}

/// Checks design tensors for the properties downstream models rely on.
#[derive(Debug, Clone)]
pub struct TensorValidator {
    /// Report at most this many offending positions per check
    max_reported: usize,
}

impl Default for TensorValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl TensorValidator {
    /// Create a validator.
    pub fn new() -> Self {
        Self { max_reported: 5 }
    }

    /// NaN/Inf check.
    pub fn validate_finite(&self, tensor: &Array3<f64>) -> ValidationResult {
        let mut result = ValidationResult::new();

        let bad: Vec<(usize, usize, usize)> = tensor
            .indexed_iter()
            .filter(|(_, v)| !v.is_finite())
            .map(|(idx, _)| idx)
            .collect();

        if bad.is_empty() {
            result.add("finite_values", ValidationLevel::Valid);
        } else {
            let shown: Vec<_> = bad.iter().take(self.max_reported.max(1)).collect();
            result.add(
                "finite_values",
                ValidationLevel::Error(format!(
                    "{} non-finite values, first at {:?}",
                    bad.len(),
                    shown
                )),
            );
        }

        result
    }

    /// Trailing-zero padding check for a raw (unscaled) tensor.
    pub fn validate_padding(&self, tensor: &Array3<f64>, lengths: &[usize]) -> ValidationResult {
        let mut result = ValidationResult::new();
        let (n, max_timesteps, _) = tensor.dim();

        if lengths.len() != n {
            result.add(
                "padding",
                ValidationLevel::Error(format!("{} lengths for {n} samples", lengths.len())),
            );
            return result;
        }

        let dirty: Vec<usize> = lengths
            .iter()
            .enumerate()
            .filter(|&(i, &len)| {
                len > max_timesteps || tensor.slice(s![i, len.., ..]).iter().any(|&v| v != 0.0)
            })
            .map(|(i, _)| i)
            .take(self.max_reported.max(1))
            .collect();

        if dirty.is_empty() {
            result.add("padding", ValidationLevel::Valid);
        } else {
            result.add(
                "padding",
                ValidationLevel::Error(format!("non-zero padding in samples {dirty:?}")),
            );
        }

        result
    }

    /// Label/tensor alignment and class coverage.
    pub fn validate_labels(
        &self,
        tensor: &Array3<f64>,
        labels: &[SkillshotLabel],
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        if labels.len() == tensor.dim().0 {
            result.add("alignment", ValidationLevel::Valid);
        } else {
            result.add(
                "alignment",
                ValidationLevel::Error(format!(
                    "{} labels for {} samples",
                    labels.len(),
                    tensor.dim().0
                )),
            );
        }

        let missing: Vec<&str> = SkillshotLabel::ALL
            .iter()
            .filter(|class| !labels.contains(*class))
            .map(SkillshotLabel::name)
            .collect();

        if missing.is_empty() {
            result.add("class_coverage", ValidationLevel::Valid);
        } else {
            result.add(
                "class_coverage",
                ValidationLevel::Warning(format!(
                    "{}/{NUM_CLASSES} classes absent: {}",
                    missing.len(),
                    missing.join(", ")
                )),
            );
        }

        result
    }

    /// Finite and padding checks for a freshly assembled tensor.
    pub fn validate_raw(&self, tensor: &Array3<f64>, lengths: &[usize]) -> ValidationResult {
        let mut result = self.validate_finite(tensor);
        result.merge(self.validate_padding(tensor, lengths));
        result
    }
}
