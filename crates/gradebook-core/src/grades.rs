//! # Grade Parser
//!
//! Finds grade tokens in OCR text and averages them.
//!
//! A token is a maximal run of non-whitespace characters. It counts as a grade
//! when removing at most one `.` leaves a non-empty string of ASCII digits, so
//! `"12"`, `"12.5"`, `"12."` and `".5"` qualify while `"-3"`, `"1.2.3"`,
//! `"12/20"` and `"."` do not.
//!
//! There is no range check: `"999"` is a grade like any other. Text without a
//! single grade token averages to the sentinel `0.0`.

/// Check whether a whitespace-separated token is a non-negative decimal.
#[must_use]
pub fn is_grade_token(token: &str) -> bool {
    let stripped = token.replacen('.', "", 1);
    !stripped.is_empty() && stripped.bytes().all(|b| b.is_ascii_digit())
}

/// Collect every grade token in `text`, in order of appearance.
#[must_use]
pub fn extract_grades(text: &str) -> Vec<f64> {
    text.split_whitespace()
        .filter(|token| is_grade_token(token))
        .filter_map(|token| token.parse::<f64>().ok())
        .collect()
}

/// Arithmetic mean of `values`, or `0.0` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Average of the grade tokens in `text`, or `0.0` when there are none.
#[must_use]
pub fn average_from_text(text: &str) -> f64 {
    mean(&extract_grades(text))
}

// =============================================================================
// TESTS
// =============================================================================
