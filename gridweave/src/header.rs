//! Column header component.
//!
//! A header knows only its position and its [`GridContext`]. Width and
//! capabilities are read back from the grid; a pointer-drag resize holds two
//! window-level listeners for exactly as long as the drag lasts.

use std::sync::{Arc, Mutex};

use log::{debug, trace, warn};

use crate::broker::GridContext;
use crate::column::Column;
use crate::config::Capability;
use crate::error::ResizeError;
use crate::events::{PointerEvent, PointerHub, Subscription};
use crate::width::percent_to_pixels;

/// Listeners held by an active resize drag. Empty once the drag ended.
type SessionListeners = Arc<Mutex<Vec<Subscription>>>;

/// Header of the column at a given position.
#[derive(Debug)]
pub struct ColumnHeader {
    index: usize,
    context: GridContext,
    session: Option<SessionListeners>,
}

impl ColumnHeader {
    pub fn new(index: usize, context: GridContext) -> Self {
        Self {
            index,
            context,
            session: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move this header to another position.
    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn context(&self) -> &GridContext {
        &self.context
    }

    /// Column definition behind this header.
    pub fn column(&self) -> Option<Column> {
        self.context.column(self.index)
    }

    /// Current width in percent. `0.0` outside a grid.
    pub fn width_percent(&self) -> f64 {
        self.context.column_width(self.index)
    }

    /// Current width in pixels. `0.0` outside a grid.
    pub fn width_px(&self) -> f64 {
        percent_to_pixels(self.width_percent(), self.context.grid_width_px())
    }

    /// Effective capability of this column.
    pub fn capability(&self, capability: Capability) -> bool {
        self.column()
            .map(|c| self.context.capability(&c, capability))
            .unwrap_or(false)
    }

    /// True while a resize drag holds its listeners.
    pub fn is_resizing(&self) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.lock().ok().map(|l| !l.is_empty()))
            .unwrap_or(false)
    }

    /// Start a resize drag at `pointer_x`.
    ///
    /// Registers a pointer-move and a pointer-up listener on `hub`. Every
    /// move resizes the column by its distance from `pointer_x`; the up
    /// event applies the final delta and releases both listeners.
    pub fn begin_resize(&mut self, pointer_x: f64, hub: &PointerHub) -> Result<(), ResizeError> {
        if self.is_resizing() {
            return Err(ResizeError::SessionActive);
        }
        if !self.context.is_attached() {
            warn!("Resize requested on a header outside of a grid");
            return Err(ResizeError::GridDropped);
        }
        let column = self
            .column()
            .ok_or(ResizeError::NoSuchColumn(self.index))?;
        if !self.context.capability(&column, Capability::Resizable) {
            return Err(ResizeError::NotResizable(column.label));
        }

        let index = self.index;
        let start_width_px = self.width_px();
        let listeners: SessionListeners = Arc::new(Mutex::new(Vec::with_capacity(2)));

        let context = self.context.clone();
        let on_move = hub.subscribe(move |event| {
            if let PointerEvent::Move { x } = *event {
                trace!("Resize move: column {index}, x {x}");
                if let Err(e) = context.resize_column(index, start_width_px, x - pointer_x) {
                    warn!("Resize of column {index} failed: {e}");
                }
            }
        });

        let context = self.context.clone();
        let session = Arc::downgrade(&listeners);
        let on_up = hub.subscribe(move |event| {
            if let PointerEvent::Up { x } = *event {
                if let Err(e) = context.resize_column(index, start_width_px, x - pointer_x) {
                    warn!("Resize of column {index} failed: {e}");
                }
                if let Some(session) = session.upgrade()
                    && let Ok(mut listeners) = session.lock()
                {
                    listeners.clear();
                }
                debug!("Resize of column {index} finished");
            }
        });

        if let Ok(mut guard) = listeners.lock() {
            guard.push(on_move);
            guard.push(on_up);
        }
        debug!("Resize of column {index} started at {start_width_px}px");
        self.session = Some(listeners);
        Ok(())
    }

    /// Release the listeners of an active resize drag, if any.
    pub fn end_resize(&mut self) {
        if let Some(session) = self.session.take()
            && let Ok(mut listeners) = session.lock()
            && !listeners.is_empty()
        {
            debug!("Resize of column {} released early", self.index);
            listeners.clear();
        }
    }
}

impl Drop for ColumnHeader {
    fn drop(&mut self) {
        self.end_resize();
    }
}
