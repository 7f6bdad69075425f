//! Drag-to-reorder coordination.
//!
//! One [`ReorderCoordinator`] exists per axis while reordering is enabled.
//! It follows a gesture from start to drop or cancel and commits the result
//! into the grid's backing sequence:
//!
//! ```text
//! Idle --start--> Dragging --drop_at--> (Dropped) --> Idle
//!                     \------cancel---> (Cancelled) --> Idle
//! ```
//!
//! While a gesture is active the gesture layer may already have moved the
//! dragged node in the rendered order. On drop the coordinator puts it back
//! after its recorded anchor and applies the move to the backing sequence
//! instead. The next flush re-renders the final order from there.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use log::{debug, warn};

use crate::column::NodeKey;
use crate::config::Capability;
use crate::error::ReorderError;
use crate::events::{DragEvent, DragHub, Subscription};
use crate::grid::{GridShared, GridState};

/// An orderable axis of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Columns,
    Rows,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Columns => f.write_str("column"),
            Axis::Rows => f.write_str("row"),
        }
    }
}

/// Gesture state of a coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging {
        /// The dragged node.
        item: NodeKey,
        /// Rendered sibling before `item` at gesture start; `None` if first.
        anchor: Option<NodeKey>,
    },
}

/// How a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Dropped { from: usize, to: usize },
    Cancelled,
}

#[derive(Debug)]
struct CoordinatorCore {
    axis: Axis,
    phase: GesturePhase,
    grid: Weak<GridShared>,
}

impl CoordinatorCore {
    fn start(&mut self, item: NodeKey) -> Result<(), ReorderError> {
        if let GesturePhase::Dragging { .. } = self.phase {
            return Err(ReorderError::GestureInProgress(self.axis));
        }
        let grid = self.grid.upgrade().ok_or(ReorderError::GridDropped)?;
        let state = grid.state.read().map_err(|_| ReorderError::GridDropped)?;

        let order = state.rendered(self.axis);
        let position = order
            .iter()
            .position(|key| *key == item)
            .ok_or(ReorderError::UnknownItem(self.axis))?;
        let anchor = position.checked_sub(1).map(|i| order[i]);

        if self.axis == Axis::Columns
            && let Some(column) = state.columns.iter().find(|c| c.key() == item)
            && !column.capability(Capability::Reorderable, &grid.broker.flags())
        {
            return Err(ReorderError::NotReorderable(self.axis));
        }

        debug!("{} drag started: {item} (anchor {anchor:?})", self.axis);
        self.phase = GesturePhase::Dragging { item, anchor };
        Ok(())
    }

    fn drop_at(&mut self, from: usize, to: usize) -> Result<GestureOutcome, ReorderError> {
        let GesturePhase::Dragging { item, anchor } = self.phase else {
            return Err(ReorderError::NotDragging(self.axis));
        };
        // The gesture is over whatever happens below.
        self.phase = GesturePhase::Idle;

        let grid = self.grid.upgrade().ok_or(ReorderError::GridDropped)?;
        let mut state = grid.state.write().map_err(|_| ReorderError::GridDropped)?;

        reanchor(state.rendered_mut(self.axis), item, anchor);

        let len = state.len(self.axis);
        if from >= len || to >= len {
            return Err(ReorderError::IndexOutOfRange {
                axis: self.axis,
                from,
                to,
                len,
            });
        }

        let flags = grid.broker.flags();
        if self.axis == Axis::Columns
            && !state.columns[from].capability(Capability::Reorderable, &flags)
        {
            return Err(ReorderError::NotReorderable(self.axis));
        }

        commit_move(&mut state, self.axis, from, to);
        drop(state);

        debug!("{} drop committed: {from} -> {to}", self.axis);
        grid.scheduler.mark_dirty();
        Ok(GestureOutcome::Dropped { from, to })
    }

    fn cancel(&mut self) -> Result<GestureOutcome, ReorderError> {
        let GesturePhase::Dragging { item, anchor } = self.phase else {
            return Err(ReorderError::NotDragging(self.axis));
        };
        self.phase = GesturePhase::Idle;

        if let Some(grid) = self.grid.upgrade()
            && let Ok(mut state) = grid.state.write()
        {
            reanchor(state.rendered_mut(self.axis), item, anchor);
        }
        debug!("{} drag cancelled", self.axis);
        Ok(GestureOutcome::Cancelled)
    }

    fn handle(&mut self, event: &DragEvent) {
        let result = match *event {
            DragEvent::Start { item, .. } => self.start(item).map(|_| None),
            DragEvent::End { from, to, .. } => self.drop_at(from, to).map(Some),
            DragEvent::Cancel { .. } => self.cancel().map(Some),
        };
        if let Err(e) = result {
            warn!("Ignoring {event:?}: {e}");
        }
    }
}

/// Drag state machine for one axis.
///
/// Dropping the coordinator releases its drag listener before returning.
pub struct ReorderCoordinator {
    axis: Axis,
    core: Arc<Mutex<CoordinatorCore>>,
    subscription: Option<Subscription>,
}

impl ReorderCoordinator {
    pub(crate) fn new(axis: Axis, grid: Weak<GridShared>, hub: Option<&DragHub>) -> Self {
        let core = Arc::new(Mutex::new(CoordinatorCore {
            axis,
            phase: GesturePhase::Idle,
            grid,
        }));

        let subscription = hub.map(|hub| {
            let core = Arc::downgrade(&core);
            hub.subscribe(move |event: &DragEvent| {
                if event.axis() != axis {
                    return;
                }
                if let Some(shared) = core.upgrade()
                    && let Ok(mut core) = shared.lock()
                {
                    core.handle(event);
                }
            })
        });

        debug!("{axis} reorder coordinator created");
        Self {
            axis,
            core,
            subscription,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Current gesture phase.
    pub fn phase(&self) -> GesturePhase {
        self.core.lock().map(|c| c.phase).unwrap_or_default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase(), GesturePhase::Dragging { .. })
    }

    /// Begin a gesture on `item`.
    ///
    /// Records the node rendered just before `item` as the anchor. A second
    /// start while dragging is rejected, as is a column whose `reorderable`
    /// override is off.
    pub fn start(&self, item: NodeKey) -> Result<(), ReorderError> {
        self.with_core(|core| core.start(item))
    }

    /// Finish the gesture with a drop from `from` to `to`.
    ///
    /// Re-anchors the dragged node, moves the backing element with a single
    /// remove + insert, clears the anchor and requests a re-render.
    /// Out-of-range positions end the gesture without touching the backing
    /// sequence.
    pub fn drop_at(&self, from: usize, to: usize) -> Result<GestureOutcome, ReorderError> {
        self.with_core(|core| core.drop_at(from, to))
    }

    /// Abandon the gesture. The backing sequence is untouched and the
    /// dragged node returns to its anchor.
    pub fn cancel(&self) -> Result<GestureOutcome, ReorderError> {
        self.with_core(|core| core.cancel())
    }

    /// True while the coordinator listens to a drag hub.
    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    fn with_core<T>(
        &self,
        f: impl FnOnce(&mut CoordinatorCore) -> Result<T, ReorderError>,
    ) -> Result<T, ReorderError> {
        let mut core = self.core.lock().map_err(|_| ReorderError::GridDropped)?;
        f(&mut core)
    }
}

impl Drop for ReorderCoordinator {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        debug!("{} reorder coordinator destroyed", self.axis);
    }
}

impl fmt::Debug for ReorderCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReorderCoordinator")
            .field("axis", &self.axis)
            .field("phase", &self.phase())
            .field("listening", &self.is_listening())
            .finish()
    }
}

/// Put `item` back immediately after `anchor` (or first if `None`).
fn reanchor(order: &mut Vec<NodeKey>, item: NodeKey, anchor: Option<NodeKey>) {
    let Some(current) = order.iter().position(|key| *key == item) else {
        return;
    };
    order.remove(current);
    let target = match anchor {
        Some(anchor) => order
            .iter()
            .position(|key| *key == anchor)
            .map_or(0, |i| i + 1),
        None => 0,
    };
    order.insert(target.min(order.len()), item);
}

/// Remove the element at `from` and insert it at `to`.
fn move_item<T>(seq: &mut Vec<T>, from: usize, to: usize) {
    let item = seq.remove(from);
    seq.insert(to, item);
}

fn commit_move(state: &mut GridState, axis: Axis, from: usize, to: usize) {
    match axis {
        Axis::Columns => move_item(&mut state.columns, from, to),
        Axis::Rows => move_item(&mut state.rows, from, to),
    }
}
