//! Cell content resolution.
//!
//! The grid does not produce markup itself. It decides *what* a cell shows:
//! the raw field value, or the classified result of a column's render
//! callback. Actual drawing belongs to the host.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use log::warn;
use serde_json::Value;

use crate::column::Column;
use crate::row::Row;

/// Deferred content that must be mounted into a container by the host.
pub type MountFn = Arc<dyn Fn(&mut CellContainer) + Send + Sync>;

/// Result of a column render callback.
pub enum RenderResult {
    /// Already-renderable markup fragment.
    Markup(String),
    /// Plain text.
    Text(String),
    /// A host element.
    Element(HostElement),
    /// Content that needs the host [`Renderer`] to mount it.
    Mountable(MountFn),
    /// Anything else. Resolves to empty content.
    Unknown(Box<dyn Any + Send + Sync>),
}

impl RenderResult {
    pub fn markup(markup: impl Into<String>) -> Self {
        Self::Markup(markup.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn mountable<F>(mount: F) -> Self
    where
        F: Fn(&mut CellContainer) + Send + Sync + 'static,
    {
        Self::Mountable(Arc::new(mount))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Markup(_) => "markup",
            Self::Text(_) => "text",
            Self::Element(_) => "element",
            Self::Mountable(_) => "mountable",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Debug for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(m) => f.debug_tuple("Markup").field(m).finish(),
            Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Self::Element(e) => f.debug_tuple("Element").field(e).finish(),
            Self::Mountable(_) => f.write_str("Mountable(<fn>)"),
            Self::Unknown(_) => f.write_str("Unknown(<any>)"),
        }
    }
}

/// A host element returned by a render callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostElement {
    pub tag: String,
    pub text: String,
}

impl HostElement {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }
}

/// Container a [`MountFn`] writes into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellContainer {
    /// Id of the cell this container belongs to.
    pub id: String,
    nodes: Vec<String>,
}

impl CellContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
        }
    }

    /// Append a text node.
    pub fn append(&mut self, node: impl Into<String>) {
        self.nodes.push(node.into());
    }

    /// Mounted nodes in insertion order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Host callback that mounts [`RenderResult::Mountable`] content.
pub trait Renderer {
    fn mount(&self, content: &MountFn, container: &mut CellContainer);
}

impl<F> Renderer for F
where
    F: Fn(&MountFn, &mut CellContainer),
{
    fn mount(&self, content: &MountFn, container: &mut CellContainer) {
        self(content, container)
    }
}

/// What a cell shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellContent {
    #[default]
    Empty,
    /// Raw field value (no render callback).
    Value(Value),
    Markup(String),
    Text(String),
    Element(HostElement),
    Mounted(CellContainer),
}

impl CellContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Resolve the content of the cell at (`row`, `column`).
///
/// Missing fields resolve to `Value::Null`. Unknown render results and
/// mountable results without a `renderer` resolve to [`CellContent::Empty`].
pub fn resolve_cell(
    row: &Row,
    row_index: usize,
    column: &Column,
    renderer: Option<&dyn Renderer>,
) -> CellContent {
    let value = row.get(&column.field).cloned().unwrap_or(Value::Null);
    let Some(render) = &column.render else {
        return CellContent::Value(value);
    };

    let container_id = format!("{}:{}", row.key(), column.key());
    classify(render(&value, row_index), container_id, renderer)
}

fn classify(
    result: RenderResult,
    container_id: String,
    renderer: Option<&dyn Renderer>,
) -> CellContent {
    match result {
        RenderResult::Markup(markup) => CellContent::Markup(markup),
        RenderResult::Text(text) => CellContent::Text(text),
        RenderResult::Element(element) => CellContent::Element(element),
        RenderResult::Mountable(mount) => match renderer {
            Some(renderer) => {
                let mut container = CellContainer::new(container_id);
                renderer.mount(&mount, &mut container);
                CellContent::Mounted(container)
            }
            None => {
                warn!("Mountable content for {container_id} but no renderer installed");
                CellContent::Empty
            }
        },
        unknown @ RenderResult::Unknown(_) => {
            warn!(
                "Unrecognized {} render result for {container_id}, rendering empty",
                unknown.kind()
            );
            CellContent::Empty
        }
    }
}
