//! Grid controller - the composition root.
//!
//! The controller owns the backing `columns` and `rows`, the width model
//! and, while reordering is enabled, one [`ReorderCoordinator`] per axis.
//! Descendants get a [`GridContext`] to read shared state back.
//!
//! State changes never re-layout synchronously. They mark the grid dirty and
//! the host calls [`GridController::flush`] on its next tick.

use std::sync::{Arc, RwLock};

use log::{debug, trace, warn};

use crate::broker::{ConfigBroker, GridContext};
use crate::column::{Column, NodeKey};
use crate::config::{Capability, GridConfig, GridFlags};
use crate::error::ResizeError;
use crate::events::DragHub;
use crate::render::{CellContent, Renderer, resolve_cell};
use crate::reorder::{Axis, ReorderCoordinator};
use crate::row::Row;
use crate::scheduler::{RefreshScheduler, WakeupSender};
use crate::width::{ColumnWidthModel, LayoutDirective};

/// Mutable grid state, guarded by [`GridShared::state`].
#[derive(Debug)]
pub(crate) struct GridState {
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: Vec<Row>,
    pub(crate) widths: ColumnWidthModel,
    pub(crate) grid_width_px: f64,
    /// On-screen order of column nodes. May diverge from `columns` while a
    /// gesture is active.
    pub(crate) rendered_columns: Vec<NodeKey>,
    /// On-screen order of row nodes.
    pub(crate) rendered_rows: Vec<NodeKey>,
    pub(crate) revision: u64,
}

impl GridState {
    fn new(config: &GridConfig) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            widths: ColumnWidthModel::new(config),
            grid_width_px: 0.0,
            rendered_columns: Vec::new(),
            rendered_rows: Vec::new(),
            revision: 0,
        }
    }

    pub(crate) fn rendered(&self, axis: Axis) -> &[NodeKey] {
        match axis {
            Axis::Columns => &self.rendered_columns,
            Axis::Rows => &self.rendered_rows,
        }
    }

    pub(crate) fn rendered_mut(&mut self, axis: Axis) -> &mut Vec<NodeKey> {
        match axis {
            Axis::Columns => &mut self.rendered_columns,
            Axis::Rows => &mut self.rendered_rows,
        }
    }

    /// Length of the backing sequence of `axis`.
    pub(crate) fn len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Columns => self.columns.len(),
            Axis::Rows => self.rows.len(),
        }
    }

    fn render_orders(&mut self) {
        self.rendered_columns = self.columns.iter().map(Column::key).collect();
        self.rendered_rows = self.rows.iter().map(Row::key).collect();
    }
}

/// Everything a [`GridContext`] can reach.
#[derive(Debug)]
pub(crate) struct GridShared {
    pub(crate) config: GridConfig,
    pub(crate) broker: ConfigBroker,
    pub(crate) state: RwLock<GridState>,
    pub(crate) scheduler: RefreshScheduler,
}

impl GridShared {
    pub(crate) fn column(&self, index: usize) -> Option<Column> {
        self.state
            .read()
            .ok()
            .and_then(|g| g.columns.get(index).cloned())
    }

    pub(crate) fn grid_width_px(&self) -> f64 {
        self.state.read().map(|g| g.grid_width_px).unwrap_or(0.0)
    }

    pub(crate) fn resize_column(
        &self,
        index: usize,
        start_width_px: f64,
        delta_px: f64,
    ) -> Result<f64, ResizeError> {
        let flags = self.broker.flags();
        let mut guard = self.state.write().map_err(|_| ResizeError::GridDropped)?;
        let state = &mut *guard;

        let column = state
            .columns
            .get(index)
            .ok_or(ResizeError::NoSuchColumn(index))?;
        if !column.capability(Capability::Resizable, &flags) {
            return Err(ResizeError::NotResizable(column.label.clone()));
        }

        let percent = state
            .widths
            .resize(index, column, start_width_px, delta_px, state.grid_width_px)
            .ok_or(ResizeError::NoSuchColumn(index))?;
        self.broker.publish_widths(state.widths.widths());
        drop(guard);

        self.scheduler.mark_dirty();
        Ok(percent)
    }
}

/// One refresh worth of layout output.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutFrame {
    /// Increments once per flush that produced a frame.
    pub revision: u64,
    pub directive: LayoutDirective,
    pub widths: Vec<f64>,
    pub column_order: Vec<NodeKey>,
    pub row_order: Vec<NodeKey>,
}

/// The grid.
///
/// # Example
///
/// ```
/// use gridweave::{Column, GridConfig, GridController, Row};
///
/// let grid = GridController::new(GridConfig::default());
/// grid.set_grid_width(900.0);
/// grid.set_columns(vec![Column::new("a", "A"), Column::new("b", "B")]);
/// grid.set_rows(vec![Row::new().set("a", 1).set("b", 2)]);
///
/// let frame = grid.flush().expect("dirty after setting columns");
/// assert_eq!(frame.directive.as_str(), "49.00% 49.00%");
/// assert!(grid.flush().is_none());
/// ```
pub struct GridController {
    shared: Arc<GridShared>,
    drag_hub: Option<DragHub>,
    column_reorder: Option<ReorderCoordinator>,
    row_reorder: Option<ReorderCoordinator>,
}

impl GridController {
    /// Create a grid. Coordinators exist from the start if the config
    /// enables reordering, but listen to no gesture layer until
    /// [`with_drag_hub`](Self::with_drag_hub).
    pub fn new(config: GridConfig) -> Self {
        let shared = Arc::new(GridShared {
            broker: ConfigBroker::new(config.flags),
            state: RwLock::new(GridState::new(&config)),
            scheduler: RefreshScheduler::new(),
            config,
        });
        let mut grid = Self {
            shared,
            drag_hub: None,
            column_reorder: None,
            row_reorder: None,
        };
        grid.sync_coordinators();
        grid
    }

    /// Connect the gesture-detection layer. Existing coordinators are
    /// recreated so they listen to `hub`.
    pub fn with_drag_hub(mut self, hub: DragHub) -> Self {
        self.drag_hub = Some(hub);
        self.teardown_coordinators();
        self.sync_coordinators();
        self
    }

    /// Handle for descendants.
    pub fn context(&self) -> GridContext {
        GridContext::new(Arc::downgrade(&self.shared))
    }

    pub fn broker(&self) -> &ConfigBroker {
        &self.shared.broker
    }

    pub fn config(&self) -> &GridConfig {
        &self.shared.config
    }

    pub fn flags(&self) -> GridFlags {
        self.shared.broker.flags()
    }

    /// Change a capability flag for every column.
    ///
    /// Turning `Reorderable` off destroys both coordinators before returning;
    /// turning it on creates them.
    pub fn set_flag(&mut self, capability: Capability, value: bool) {
        if !self.shared.broker.set_flag(capability, value) {
            return;
        }
        debug!("Flag {capability:?} set to {value}");
        if capability == Capability::Reorderable {
            self.sync_coordinators();
        }
        self.shared.scheduler.mark_dirty();
    }

    // -------------------------------------------------------------------------
    // Backing sequences
    // -------------------------------------------------------------------------

    /// Replace all columns.
    ///
    /// Width slots are recomputed before anything is published when the
    /// column count changed.
    pub fn set_columns(&self, columns: Vec<Column>) {
        if let Ok(mut guard) = self.shared.state.write() {
            let state = &mut *guard;
            state.columns = columns;
            if state
                .widths
                .on_columns_changed(&state.columns, state.grid_width_px)
            {
                self.shared.broker.publish_widths(state.widths.widths());
            }
            self.shared.scheduler.mark_dirty();
        }
    }

    /// Replace all rows.
    pub fn set_rows(&self, rows: Vec<Row>) {
        if let Ok(mut guard) = self.shared.state.write() {
            guard.rows = rows;
            self.shared.scheduler.mark_dirty();
        }
    }

    pub fn columns(&self) -> Vec<Column> {
        self.shared
            .state
            .read()
            .map(|g| g.columns.clone())
            .unwrap_or_default()
    }

    pub fn rows(&self) -> Vec<Row> {
        self.shared
            .state
            .read()
            .map(|g| g.rows.clone())
            .unwrap_or_default()
    }

    pub fn column(&self, index: usize) -> Option<Column> {
        self.shared.column(index)
    }

    pub fn row(&self, index: usize) -> Option<Row> {
        self.shared
            .state
            .read()
            .ok()
            .and_then(|g| g.rows.get(index).cloned())
    }

    pub fn column_count(&self) -> usize {
        self.shared.state.read().map(|g| g.columns.len()).unwrap_or(0)
    }

    pub fn row_count(&self) -> usize {
        self.shared.state.read().map(|g| g.rows.len()).unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Widths
    // -------------------------------------------------------------------------

    /// Set the rendered grid width in pixels.
    ///
    /// Existing slots are percentages and stay as they are; the new width
    /// applies to later conversions. Negative or non-finite widths are
    /// stored as `0.0`.
    pub fn set_grid_width(&self, px: f64) {
        let px = if px.is_finite() && px >= 0.0 {
            px
        } else {
            warn!("Invalid grid width {px}, using 0");
            0.0
        };
        if let Ok(mut guard) = self.shared.state.write()
            && guard.grid_width_px != px
        {
            trace!("Grid width {} -> {px}", guard.grid_width_px);
            guard.grid_width_px = px;
            self.shared.scheduler.mark_dirty();
        }
    }

    pub fn grid_width(&self) -> f64 {
        self.shared.grid_width_px()
    }

    /// Published width slots.
    pub fn widths(&self) -> Arc<[f64]> {
        self.shared.broker.widths()
    }

    /// Resize the column at `index` from `start_width_px` by `delta_px`.
    pub fn resize_column(
        &self,
        index: usize,
        start_width_px: f64,
        delta_px: f64,
    ) -> Result<f64, ResizeError> {
        self.shared.resize_column(index, start_width_px, delta_px)
    }

    // -------------------------------------------------------------------------
    // Reordering
    // -------------------------------------------------------------------------

    /// Coordinator for `axis`, if reordering is enabled.
    pub fn coordinator(&self, axis: Axis) -> Option<&ReorderCoordinator> {
        match axis {
            Axis::Columns => self.column_reorder.as_ref(),
            Axis::Rows => self.row_reorder.as_ref(),
        }
    }

    /// Current on-screen order of `axis`.
    pub fn rendered_order(&self, axis: Axis) -> Vec<NodeKey> {
        self.shared
            .state
            .read()
            .map(|g| g.rendered(axis).to_vec())
            .unwrap_or_default()
    }

    /// Move a rendered node without touching the backing sequence.
    ///
    /// This is what a gesture layer does to the screen while dragging.
    /// Returns false if either position is out of range.
    pub fn move_rendered(&self, axis: Axis, from: usize, to: usize) -> bool {
        let Ok(mut guard) = self.shared.state.write() else {
            return false;
        };
        let order = guard.rendered_mut(axis);
        if from >= order.len() || to >= order.len() {
            return false;
        }
        let key = order.remove(from);
        order.insert(to, key);
        true
    }

    fn sync_coordinators(&mut self) {
        if self.flags().reorderable {
            let grid = Arc::downgrade(&self.shared);
            let hub = self.drag_hub.as_ref();
            if self.column_reorder.is_none() {
                self.column_reorder =
                    Some(ReorderCoordinator::new(Axis::Columns, grid.clone(), hub));
            }
            if self.row_reorder.is_none() {
                self.row_reorder = Some(ReorderCoordinator::new(Axis::Rows, grid, hub));
            }
        } else {
            self.teardown_coordinators();
        }
    }

    fn teardown_coordinators(&mut self) {
        for coordinator in [self.column_reorder.take(), self.row_reorder.take()]
            .into_iter()
            .flatten()
        {
            if coordinator.is_dragging() {
                warn!("Destroying {} coordinator mid-gesture", coordinator.axis());
            }
            drop(coordinator);
        }
    }

    // -------------------------------------------------------------------------
    // Refresh
    // -------------------------------------------------------------------------

    /// Install the wakeup sender the host listens on.
    pub fn install_wakeup(&self, sender: WakeupSender) {
        self.shared.scheduler.install(sender);
    }

    /// Request a refresh on the next flush.
    pub fn request_render(&self) {
        self.shared.scheduler.mark_dirty();
    }

    pub fn is_dirty(&self) -> bool {
        self.shared.scheduler.is_dirty()
    }

    /// Apply all pending changes and return the resulting layout.
    ///
    /// Returns `None` when nothing changed since the last flush. Rendered
    /// orders are rebuilt from the backing sequences.
    pub fn flush(&self) -> Option<LayoutFrame> {
        if !self.shared.scheduler.take_dirty() {
            return None;
        }
        let mut guard = self.shared.state.write().ok()?;
        let state = &mut *guard;

        if state
            .widths
            .on_columns_changed(&state.columns, state.grid_width_px)
        {
            self.shared.broker.publish_widths(state.widths.widths());
        }
        state.render_orders();
        state.revision += 1;

        let widths = self.shared.broker.widths();
        let frame = LayoutFrame {
            revision: state.revision,
            directive: LayoutDirective::from_widths(
                &widths,
                self.shared.config.directive_precision,
            ),
            widths: widths.to_vec(),
            column_order: state.rendered_columns.clone(),
            row_order: state.rendered_rows.clone(),
        };
        trace!("Flushed revision {}: {}", frame.revision, frame.directive);
        Some(frame)
    }

    // -------------------------------------------------------------------------
    // Cells
    // -------------------------------------------------------------------------

    /// Resolve the content of the cell at (`row_index`, `column_index`).
    pub fn cell(
        &self,
        row_index: usize,
        column_index: usize,
        renderer: Option<&dyn Renderer>,
    ) -> Option<CellContent> {
        let guard = self.shared.state.read().ok()?;
        let row = guard.rows.get(row_index)?;
        let column = guard.columns.get(column_index)?;
        Some(resolve_cell(row, row_index, column, renderer))
    }

    /// Tear down both coordinators. Called on drop.
    pub fn destroy(&mut self) {
        self.teardown_coordinators();
    }
}

impl Drop for GridController {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for GridController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridController")
            .field("columns", &self.column_count())
            .field("rows", &self.row_count())
            .field("flags", &self.flags())
            .field("column_reorder", &self.column_reorder)
            .field("row_reorder", &self.row_reorder)
            .finish()
    }
}
