//! Errors raised by selection operations.

use crate::selection::SelectableElement;
use thiserror::Error;

/// Selection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// An entry no longer resolves in the current outline.
    #[error("Stale selection reference: {element}")]
    StaleReference { element: SelectableElement },
    /// Grow or shrink on a layer without contours.
    #[error("Layer has no contours")]
    EmptyTopology,
    /// A control identifier that no handler is registered for.
    #[error("Unknown control: {0}")]
    UnknownControl(String),
}

/// Result type for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;
