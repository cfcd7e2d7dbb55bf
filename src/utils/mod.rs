//! Password hashing, mock-data generation and the shared write gate.

pub mod gate;
pub mod mocking;
pub mod password;

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
