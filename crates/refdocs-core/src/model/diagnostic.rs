use std::fmt;

use serde::Serialize;

/// A degraded condition found while building the model. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No entry in the friendly-name table.
    Unclassified { operation_id: String },
    /// A friendly name that no category slot declares.
    UnmatchedFriendlyName {
        operation_id: String,
        friendly_name: String,
    },
    /// Two spec entries shared an id; the later one replaced the earlier.
    DuplicateOperationId { operation_id: String },
    /// Classification was asked to place an operation that already has a slot.
    AlreadyClassified { operation_id: String },
    /// A definition name that could not be resolved, tolerated under `allow_errors`.
    UnresolvedName { reference: String, reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Unclassified { operation_id } => {
                write!(f, "no friendly name found for {operation_id}")
            }
            Diagnostic::UnmatchedFriendlyName {
                operation_id,
                friendly_name,
            } => write!(
                f,
                "friendly name '{friendly_name}' of {operation_id} matches no category slot"
            ),
            Diagnostic::DuplicateOperationId { operation_id } => {
                write!(f, "duplicate operation id {operation_id}, later entry kept")
            }
            Diagnostic::AlreadyClassified { operation_id } => {
                write!(f, "{operation_id} is already classified")
            }
            Diagnostic::UnresolvedName { reference, reason } => {
                write!(f, "skipped {reference}: {reason}")
            }
        }
    }
}
