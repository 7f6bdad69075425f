//! Error types.
//!
//! None of these are fatal. Event-driven entry points log them and leave the
//! grid untouched; direct callers get them back for inspection.

use thiserror::Error;

use crate::reorder::Axis;

/// Errors raised by a [`ReorderCoordinator`](crate::ReorderCoordinator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// A gesture started while another one on the same axis is still active.
    #[error("a {0} drag is already in progress")]
    GestureInProgress(Axis),

    /// A drop or cancel arrived without a gesture start.
    #[error("no {0} drag in progress")]
    NotDragging(Axis),

    /// The gesture layer reported positions outside the backing sequence.
    #[error("drop {from} -> {to} is out of range for {len} {axis} items")]
    IndexOutOfRange {
        axis: Axis,
        from: usize,
        to: usize,
        len: usize,
    },

    /// The item may not be moved on this axis.
    #[error("{0} is not reorderable")]
    NotReorderable(Axis),

    /// The dragged item is not part of the rendered order.
    #[error("item is not rendered on the {0} axis")]
    UnknownItem(Axis),

    /// The owning grid no longer exists.
    #[error("grid has been dropped")]
    GridDropped,
}

/// Errors raised while resizing a column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResizeError {
    /// No column at this position.
    #[error("no column at index {0}")]
    NoSuchColumn(usize),

    /// Resizing is disabled for this column.
    #[error("column '{0}' is not resizable")]
    NotResizable(String),

    /// The column already has an active resize session.
    #[error("a resize session is already active")]
    SessionActive,

    /// The owning grid no longer exists, or the column was never attached.
    #[error("column is not attached to a grid")]
    GridDropped,
}
