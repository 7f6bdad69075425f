//! Column definitions.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::config::{Capability, GridFlags};
use crate::render::RenderResult;

/// Identity of a column or row node.
///
/// Assigned once at construction. Clones share the key, so a reordered item
/// keeps its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

impl NodeKey {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__node_{}", self.0)
    }
}

/// Horizontal alignment of cell content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Custom cell render callback: `(value, row_index) -> RenderResult`.
pub type RenderFn = Arc<dyn Fn(&Value, usize) -> RenderResult + Send + Sync>;

/// A single grid field.
///
/// # Example
///
/// ```
/// use gridweave::{Align, Column};
///
/// let price = Column::new("price", "Price")
///     .min_width(120.0)
///     .align(Align::Right)
///     .sortable(true);
///
/// assert_eq!(price.field, "price");
/// assert_eq!(price.min_width, Some(120.0));
/// ```
#[derive(Clone)]
pub struct Column {
    key: NodeKey,
    /// Row field this column displays. Need not be unique.
    pub field: String,
    /// Header text.
    pub label: String,
    /// Optional header tooltip.
    pub description: Option<String>,
    /// Minimum width in pixels.
    pub min_width: Option<f64>,
    /// Maximum width in pixels.
    pub max_width: Option<f64>,
    pub align: Align,
    pub editable: Option<bool>,
    pub filterable: Option<bool>,
    pub sortable: Option<bool>,
    pub hideable: Option<bool>,
    pub resizable: Option<bool>,
    pub reorderable: Option<bool>,
    /// Custom cell renderer. Without one the raw field value is shown.
    pub render: Option<RenderFn>,
}

impl Column {
    /// Create a column for `field` with a header label.
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: NodeKey::next(),
            field: field.into(),
            label: label.into(),
            description: None,
            min_width: None,
            max_width: None,
            align: Align::default(),
            editable: None,
            filterable: None,
            sortable: None,
            hideable: None,
            resizable: None,
            reorderable: None,
            render: None,
        }
    }

    /// Node identity of this column.
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn min_width(mut self, px: f64) -> Self {
        self.min_width = Some(px);
        self
    }

    pub fn max_width(mut self, px: f64) -> Self {
        self.max_width = Some(px);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn editable(mut self, value: bool) -> Self {
        self.editable = Some(value);
        self
    }

    pub fn filterable(mut self, value: bool) -> Self {
        self.filterable = Some(value);
        self
    }

    pub fn sortable(mut self, value: bool) -> Self {
        self.sortable = Some(value);
        self
    }

    pub fn hideable(mut self, value: bool) -> Self {
        self.hideable = Some(value);
        self
    }

    pub fn resizable(mut self, value: bool) -> Self {
        self.resizable = Some(value);
        self
    }

    pub fn reorderable(mut self, value: bool) -> Self {
        self.reorderable = Some(value);
        self
    }

    /// Set a custom cell renderer.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value, usize) -> RenderResult + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Column-level override for a capability, if any.
    pub fn capability_override(&self, capability: Capability) -> Option<bool> {
        match capability {
            Capability::Editable => self.editable,
            Capability::Filterable => self.filterable,
            Capability::Sortable => self.sortable,
            Capability::Hideable => self.hideable,
            Capability::Resizable => self.resizable,
            Capability::Reorderable => self.reorderable,
        }
    }

    /// Effective capability: the column override, else the grid flag.
    pub fn capability(&self, capability: Capability, flags: &GridFlags) -> bool {
        self.capability_override(capability)
            .unwrap_or_else(|| flags.get(capability))
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("field", &self.field)
            .field("label", &self.label)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("align", &self.align)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .finish_non_exhaustive()
    }
}
