//! Headless layout and reorder engine for interactive data grids.
//!
//! - [`GridController`] owns columns, rows and the width slots.
//! - [`ColumnWidthModel`] keeps one percentage slot per column and applies
//!   resize deltas.
//! - [`ReorderCoordinator`] turns drag gestures into moves of the backing
//!   sequences.
//! - [`GridContext`] lets any descendant read the grid's flags and widths.

pub mod broker;
pub mod column;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod header;
pub mod render;
pub mod reorder;
pub mod row;
pub mod scheduler;
pub mod width;

pub use broker::{ConfigBroker, GridContext};
pub use column::{Align, Column, NodeKey, RenderFn};
pub use config::{Capability, GridConfig, GridFlags};
pub use error::{ReorderError, ResizeError};
pub use events::{DragEvent, DragHub, EventHub, PointerEvent, PointerHub, Subscription};
pub use grid::{GridController, LayoutFrame};
pub use header::ColumnHeader;
pub use render::{
    CellContainer, CellContent, HostElement, MountFn, RenderResult, Renderer, resolve_cell,
};
pub use reorder::{Axis, GestureOutcome, GesturePhase, ReorderCoordinator};
pub use row::Row;
pub use scheduler::{RefreshScheduler, WakeupReceiver, WakeupSender};
pub use width::{ColumnWidthModel, LayoutDirective, percent_to_pixels, pixels_to_percent};
