//! Shared grid configuration.
//!
//! [`ConfigBroker`] holds what every column may read: the capability flags
//! and the published width slots. Descendants reach it through a
//! [`GridContext`], a weak back-reference handed out by the grid. The grid
//! owns its columns; a context never keeps a grid alive.

use std::sync::{Arc, RwLock, Weak};

use log::warn;

use crate::column::Column;
use crate::config::{Capability, GridFlags};
use crate::error::ResizeError;
use crate::grid::GridShared;

/// Flags and width slots shared with every column of one grid.
#[derive(Debug)]
pub struct ConfigBroker {
    flags: RwLock<GridFlags>,
    widths: RwLock<Arc<[f64]>>,
}

impl ConfigBroker {
    pub(crate) fn new(flags: GridFlags) -> Self {
        Self {
            flags: RwLock::new(flags),
            widths: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// Current capability flags.
    pub fn flags(&self) -> GridFlags {
        self.flags
            .read()
            .map(|g| *g)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }

    pub(crate) fn set_flag(&self, capability: Capability, value: bool) -> bool {
        if let Ok(mut guard) = self.flags.write() {
            let changed = guard.get(capability) != value;
            guard.set(capability, value);
            return changed;
        }
        false
    }

    /// Last published width slots.
    ///
    /// Slots are replaced as a whole, so a reader never sees a mix of two
    /// publications.
    pub fn widths(&self) -> Arc<[f64]> {
        self.widths
            .read()
            .map(|g| Arc::clone(&*g))
            .unwrap_or_else(|_| Arc::from(Vec::new()))
    }

    pub(crate) fn publish_widths(&self, widths: &[f64]) {
        if let Ok(mut guard) = self.widths.write() {
            *guard = Arc::from(widths);
        }
    }
}

/// A descendant's handle to its grid.
///
/// A detached context (never attached, or outliving its grid) answers every
/// read with a neutral default and logs a warning.
#[derive(Debug, Clone, Default)]
pub struct GridContext {
    grid: Weak<GridShared>,
}

impl GridContext {
    pub(crate) fn new(grid: Weak<GridShared>) -> Self {
        Self { grid }
    }

    /// A context with no grid behind it.
    pub fn detached() -> Self {
        Self::default()
    }

    /// True while the owning grid is alive.
    pub fn is_attached(&self) -> bool {
        self.grid.strong_count() > 0
    }

    pub(crate) fn grid(&self) -> Option<Arc<GridShared>> {
        let grid = self.grid.upgrade();
        if grid.is_none() {
            warn!("Column used outside of a grid, falling back to defaults");
        }
        grid
    }

    /// Grid capability flags, or the defaults when detached.
    pub fn flags(&self) -> GridFlags {
        self.grid()
            .map(|g| g.broker.flags())
            .unwrap_or_default()
    }

    /// Effective capability of `column`: its override, else the grid flag.
    pub fn capability(&self, column: &Column, capability: Capability) -> bool {
        column.capability(capability, &self.flags())
    }

    /// All published width slots. Empty when detached.
    pub fn widths(&self) -> Arc<[f64]> {
        self.grid()
            .map(|g| g.broker.widths())
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Width slot at `index` in percent. `0.0` when detached or out of range.
    pub fn column_width(&self, index: usize) -> f64 {
        self.widths().get(index).copied().unwrap_or(0.0)
    }

    /// Rendered grid width in pixels. `0.0` when detached.
    pub fn grid_width_px(&self) -> f64 {
        self.grid().map(|g| g.grid_width_px()).unwrap_or(0.0)
    }

    /// Column at `index`, if attached and in range.
    pub fn column(&self, index: usize) -> Option<Column> {
        self.grid().and_then(|g| g.column(index))
    }

    /// Ask the grid to re-layout on its next flush.
    pub fn request_layout(&self) {
        if let Some(grid) = self.grid() {
            grid.scheduler.mark_dirty();
        }
    }

    /// Delegate a resize of the column at `index` to the grid.
    pub fn resize_column(
        &self,
        index: usize,
        start_width_px: f64,
        delta_px: f64,
    ) -> Result<f64, ResizeError> {
        let grid = self.grid().ok_or(ResizeError::GridDropped)?;
        grid.resize_column(index, start_width_px, delta_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_context_reads_neutral_defaults() {
        let cx = GridContext::detached();
        assert!(!cx.is_attached());
        assert_eq!(cx.column_width(0), 0.0);
        assert_eq!(cx.grid_width_px(), 0.0);
        assert!(cx.widths().is_empty());
        assert_eq!(cx.flags(), GridFlags::default());
        assert!(cx.column(0).is_none());
        cx.request_layout();
        assert_eq!(
            cx.resize_column(0, 100.0, 10.0),
            Err(ResizeError::GridDropped)
        );
    }

    #[test]
    fn broker_replaces_widths_wholesale() {
        let broker = ConfigBroker::new(GridFlags::default());
        let before = broker.widths();
        broker.publish_widths(&[10.0, 20.0]);
        assert!(before.is_empty(), "earlier snapshot is unaffected");
        assert_eq!(&*broker.widths(), &[10.0, 20.0]);
    }

    #[test]
    fn set_flag_reports_changes() {
        let broker = ConfigBroker::new(GridFlags::default());
        assert!(broker.set_flag(Capability::Sortable, true));
        assert!(!broker.set_flag(Capability::Sortable, true));
        assert!(broker.flags().sortable);
    }
}
