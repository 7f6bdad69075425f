//! Grid configuration types.

use serde::{Deserialize, Serialize};

/// A grid-scoped feature switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Editable,
    Filterable,
    Sortable,
    Hideable,
    Resizable,
    Reorderable,
}

/// Capability flags shared by every column of a grid.
///
/// Columns read these through their [`GridContext`](crate::GridContext) and
/// may override individual flags on the [`Column`](crate::Column) itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridFlags {
    pub editable: bool,
    pub filterable: bool,
    pub sortable: bool,
    pub hideable: bool,
    pub resizable: bool,
    pub reorderable: bool,
}

impl Default for GridFlags {
    fn default() -> Self {
        Self {
            editable: false,
            filterable: false,
            sortable: false,
            hideable: true,
            resizable: true,
            reorderable: true,
        }
    }
}

impl GridFlags {
    /// Read a single flag.
    pub fn get(&self, capability: Capability) -> bool {
        match capability {
            Capability::Editable => self.editable,
            Capability::Filterable => self.filterable,
            Capability::Sortable => self.sortable,
            Capability::Hideable => self.hideable,
            Capability::Resizable => self.resizable,
            Capability::Reorderable => self.reorderable,
        }
    }

    /// Write a single flag.
    pub fn set(&mut self, capability: Capability, value: bool) {
        let slot = match capability {
            Capability::Editable => &mut self.editable,
            Capability::Filterable => &mut self.filterable,
            Capability::Sortable => &mut self.sortable,
            Capability::Hideable => &mut self.hideable,
            Capability::Resizable => &mut self.resizable,
            Capability::Reorderable => &mut self.reorderable,
        };
        *slot = value;
    }

    /// Return a copy with one flag changed.
    pub fn with(mut self, capability: Capability, value: bool) -> Self {
        self.set(capability, value);
        self
    }
}

/// Per-grid configuration.
///
/// Fixed at construction time. Only the capability flags can change later,
/// through [`GridController::set_flag`](crate::GridController::set_flag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Initial capability flags.
    pub flags: GridFlags,

    /// Lower bound in pixels for a resized column without `min_width`.
    pub fallback_min_width_px: f64,

    /// Percent subtracted from each equal share, leaving room for borders
    /// and resize handles.
    pub border_deficit_percent: f64,

    /// Clamp interactive resizes to the column's `max_width`.
    pub enforce_max_width: bool,

    /// Decimal places used for the tokens of the layout directive.
    pub directive_precision: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            flags: GridFlags::default(),
            fallback_min_width_px: 60.0,
            border_deficit_percent: 1.0,
            enforce_max_width: false,
            directive_precision: 2,
        }
    }
}

impl GridConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial capability flags.
    pub fn flags(mut self, flags: GridFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set a single initial capability flag.
    pub fn flag(mut self, capability: Capability, value: bool) -> Self {
        self.flags.set(capability, value);
        self
    }

    /// Set the resize lower bound used when a column has no `min_width`.
    pub fn fallback_min_width(mut self, px: f64) -> Self {
        self.fallback_min_width_px = px;
        self
    }

    /// Set the per-column deficit of the default equal share.
    pub fn border_deficit(mut self, percent: f64) -> Self {
        self.border_deficit_percent = percent;
        self
    }

    /// Clamp interactive resizes to `max_width`.
    pub fn enforce_max_width(mut self) -> Self {
        self.enforce_max_width = true;
        self
    }

    /// Set the decimal places of layout directive tokens.
    pub fn directive_precision(mut self, digits: usize) -> Self {
        self.directive_precision = digits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_match_documented_defaults() {
        let flags = GridFlags::default();
        assert!(!flags.editable);
        assert!(!flags.filterable);
        assert!(!flags.sortable);
        assert!(flags.hideable);
        assert!(flags.resizable);
        assert!(flags.reorderable);
    }

    #[test]
    fn set_and_get_are_symmetric() {
        let mut flags = GridFlags::default();
        flags.set(Capability::Sortable, true);
        flags.set(Capability::Reorderable, false);
        assert!(flags.get(Capability::Sortable));
        assert!(!flags.get(Capability::Reorderable));
        assert!(flags.get(Capability::Resizable));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GridConfig =
            serde_json::from_str(r#"{ "flags": { "editable": true }, "enforce_max_width": true }"#)
                .unwrap();
        assert!(config.flags.editable);
        assert!(config.flags.reorderable);
        assert!(config.enforce_max_width);
        assert_eq!(config.fallback_min_width_px, 60.0);
        assert_eq!(config.directive_precision, 2);
    }
}
