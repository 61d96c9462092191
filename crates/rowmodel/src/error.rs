//! Error types for rowmodel.
//!
//! The failure surface is deliberately small. Accessor dispatch is the only
//! recoverable failure; out-of-range indices are the caller's contract and
//! panic exactly as the underlying `Vec` would, and equality-based lookups
//! that miss are silent no-ops.

use std::fmt;

/// A cell accessor failed to produce a value.
///
/// Produced by fallible accessors registered via
/// [`SchemaBuilder::try_column`](crate::SchemaBuilder::try_column). How a
/// model presents the failure is decided by its
/// [`DispatchPolicy`](crate::DispatchPolicy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessError {
    /// Display name of the column whose accessor failed.
    pub column: String,
    /// Human-readable failure description.
    pub reason: String,
}

impl AccessError {
    /// Creates a new access error for the named column.
    pub fn new(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column `{}`: {}", self.column, self.reason)
    }
}

impl std::error::Error for AccessError {}
