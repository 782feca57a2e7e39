//! Per-row validation applied before a submission reaches the optimizer.
//!
//! Every row accumulates its own independent set of field errors and all rows
//! are reported at once, never fail-fast. Missing fields and unparsable dates
//! surface earlier, as deserialization errors at the transport boundary.

use crate::types::{BoqElement, KitError};
use std::collections::BTreeMap;

/// Field-level errors for a single BoQ row. An empty map means the row passed.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

/// Checks one row against the submission invariants.
pub fn validate_element(element: &BoqElement) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if element.element_id.trim().is_empty() {
        errors.insert("element_id", "Required");
    }
    if !(element.length.is_finite() && element.length > 0.0) {
        errors.insert("length", "Must be > 0");
    }
    if !(element.width.is_finite() && element.width > 0.0) {
        errors.insert("width", "Must be > 0");
    }
    if element.quantity == 0 {
        errors.insert("quantity", "Must be > 0");
    }
    if element.end_date <= element.start_date {
        errors.insert("end_date", "Must be after start date");
    }

    errors
}

/// Validates every row independently; the result is parallel to the input.
/// A submission with any non-empty entry must not reach the optimizer.
pub fn validate_elements(elements: &[BoqElement]) -> Vec<FieldErrors> {
    elements.iter().map(validate_element).collect()
}

/// True if any row in the report carries at least one field error.
pub fn has_errors(report: &[FieldErrors]) -> bool {
    report.iter().any(|row| !row.is_empty())
}

/// Collapses a report into a single [`KitError::Validation`], with
/// `row N field: message` entries joined by `; `.
pub fn validation_error(report: &[FieldErrors]) -> KitError {
    let mut parts = Vec::new();
    for (row, errors) in report.iter().enumerate() {
        for (field, message) in errors {
            parts.push(format!("row {} {}: {}", row + 1, field, message));
        }
    }
    KitError::Validation(parts.join("; "))
}
