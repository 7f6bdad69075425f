//! Event hubs and gesture events.
//!
//! A hub stands in for a process-wide event target (the window, a gesture
//! library). Listeners are held only as long as the returned
//! [`Subscription`] lives; dropping it unregisters the listener.

use std::fmt;
use std::sync::{Arc, Mutex};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use log::trace;

use crate::column::NodeKey;
use crate::reorder::Axis;

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct HubInner<E> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

/// A listener registry for events of type `E`.
pub struct EventHub<E> {
    inner: Arc<Mutex<HubInner<E>>>,
}

impl<E: 'static> EventHub<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener. It stays registered until the subscription drops.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let Ok(mut guard) = self.inner.lock() else {
            return Subscription::detached();
        };
        let id = guard.next_id;
        guard.next_id += 1;
        guard.listeners.push((id, Arc::new(listener)));
        drop(guard);

        let weak = Arc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade()
                    && let Ok(mut guard) = inner.lock()
                {
                    guard.listeners.retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    /// Deliver `event` to every registered listener.
    ///
    /// The registry is not locked while listeners run, so a listener may
    /// subscribe or drop subscriptions. Returns the number of listeners
    /// invoked.
    pub fn dispatch(&self, event: &E) -> usize {
        let listeners: Vec<Listener<E>> = match self.inner.lock() {
            Ok(guard) => guard.listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(_) => return 0,
        };
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().map(|g| g.listeners.len()).unwrap_or(0)
    }
}

impl<E: 'static> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventHub<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.inner.lock().map(|g| g.listeners.len()).unwrap_or(0);
        f.debug_struct("EventHub").field("listeners", &count).finish()
    }
}

/// Guard for a registered listener.
#[must_use = "dropping a subscription unregisters the listener"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn detached() -> Self {
        Self { detach: None }
    }

    /// Unregister now. Same as dropping.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

/// Window-level pointer event, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f64 },
    Up { x: f64 },
}

impl PointerEvent {
    /// Map a terminal mouse event to a pointer event.
    ///
    /// Left-button drags become `Move`, left-button releases become `Up`.
    /// `cell_width_px` converts terminal columns to pixels.
    pub fn from_mouse(event: &MouseEvent, cell_width_px: f64) -> Option<Self> {
        let x = f64::from(event.column) * cell_width_px;
        let mapped = match event.kind {
            MouseEventKind::Drag(MouseButton::Left) => Some(Self::Move { x }),
            MouseEventKind::Up(MouseButton::Left) => Some(Self::Up { x }),
            _ => None,
        };
        trace!("Mapped mouse {:?} => {mapped:?}", event.kind);
        mapped
    }

    pub fn x(&self) -> f64 {
        match self {
            Self::Move { x } | Self::Up { x } => *x,
        }
    }
}

/// Drag lifecycle reported by the gesture-detection layer.
///
/// Positions are zero-based indices in the current visual order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Start { axis: Axis, item: NodeKey },
    End { axis: Axis, from: usize, to: usize },
    Cancel { axis: Axis },
}

impl DragEvent {
    pub fn axis(&self) -> Axis {
        match self {
            Self::Start { axis, .. } | Self::End { axis, .. } | Self::Cancel { axis } => *axis,
        }
    }
}

/// Hub for pointer events.
pub type PointerHub = EventHub<PointerEvent>;

/// Hub for drag lifecycle events.
pub type DragHub = EventHub<DragEvent>;
