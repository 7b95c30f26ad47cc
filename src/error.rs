//! Errors surfaced by [`Tree`][crate::tree::Tree] operations.
//!
//! Looking up or deleting a value that isn't in the tree is not an error.
//! Only values that can't be ordered against the tree and node references
//! that don't belong to the tree are.

use thiserror::Error;

/// The ways a tree operation can fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// A value could not be ordered against a value in the tree (or against
    /// itself, like `f64::NAN`).
    #[error("value is not comparable with the values in the tree")]
    Incomparable,

    /// A node passed in by the caller is not part of this tree.
    #[error("node does not belong to this tree")]
    InvalidReference,
}

/// Shorthand for results of tree operations.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;
