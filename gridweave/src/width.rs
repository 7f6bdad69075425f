//! Column width model.
//!
//! Widths are stored as percentages of the grid's rendered width, one slot
//! per column position. Slots are positional: a column reorder permutes the
//! columns but never the slots.

use std::fmt;

use log::{debug, trace};

use crate::column::Column;
use crate::config::GridConfig;

/// Convert pixels to a percentage of `grid_width_px`.
///
/// A zero, negative or non-finite grid width yields `0.0`, never NaN or
/// infinity.
pub fn pixels_to_percent(px: f64, grid_width_px: f64) -> f64 {
    if !px.is_finite() || !grid_width_px.is_finite() || grid_width_px <= 0.0 {
        return 0.0;
    }
    px / grid_width_px * 100.0
}

/// Convert a percentage of `grid_width_px` back to pixels.
pub fn percent_to_pixels(percent: f64, grid_width_px: f64) -> f64 {
    if !percent.is_finite() || !grid_width_px.is_finite() {
        return 0.0;
    }
    percent * grid_width_px / 100.0
}

/// Column track sizing: space-separated percentage tokens, one per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutDirective(String);

impl LayoutDirective {
    /// Build a directive from width slots.
    pub fn from_widths(widths: &[f64], precision: usize) -> Self {
        let tokens: Vec<String> = widths
            .iter()
            .map(|w| format!("{:.*}%", precision, w))
            .collect();
        Self(tokens.join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Individual track tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

impl fmt::Display for LayoutDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owns the width slots of a grid.
#[derive(Debug, Clone, Default)]
pub struct ColumnWidthModel {
    widths: Vec<f64>,
    fallback_min_width_px: f64,
    border_deficit_percent: f64,
    enforce_max_width: bool,
}

impl ColumnWidthModel {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            widths: Vec::new(),
            fallback_min_width_px: config.fallback_min_width_px,
            border_deficit_percent: config.border_deficit_percent,
            enforce_max_width: config.enforce_max_width,
        }
    }

    /// Current width slots.
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// Width slot at `index`.
    pub fn width(&self, index: usize) -> Option<f64> {
        self.widths.get(index).copied()
    }

    /// True when the slot count no longer matches `column_count`.
    pub fn is_stale(&self, column_count: usize) -> bool {
        self.widths.len() != column_count
    }

    /// Default share of a column when `count` columns split the grid.
    pub fn equal_share(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        100.0 / count as f64 - self.border_deficit_percent
    }

    /// Recompute slots after the column set changed.
    ///
    /// Does nothing when the slot count already matches. Otherwise existing
    /// slots are kept by position, new positions take the column's
    /// `min_width` (as a percentage of `grid_width_px`) or the equal share.
    /// Returns true if the slots were replaced.
    pub fn on_columns_changed(&mut self, columns: &[Column], grid_width_px: f64) -> bool {
        if !self.is_stale(columns.len()) {
            return false;
        }

        let share = self.equal_share(columns.len());
        let widths: Vec<f64> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| match (self.widths.get(i), column.min_width) {
                (Some(&previous), _) => previous,
                (None, Some(min)) => pixels_to_percent(min, grid_width_px),
                (None, None) => share,
            })
            .collect();

        debug!(
            "Recomputed widths: {} -> {} slots",
            self.widths.len(),
            widths.len()
        );
        self.widths = widths;
        true
    }

    /// Lower resize bound of `column` in pixels.
    pub fn min_width_px(&self, column: &Column) -> f64 {
        column.min_width.unwrap_or(self.fallback_min_width_px)
    }

    /// Apply a pointer delta to the slot at `index`.
    ///
    /// The new pixel width is `start_width_px + delta_px`, floored at the
    /// column's minimum (or the fallback minimum). `max_width` only applies
    /// when the grid was configured to enforce it. Returns the new
    /// percentage, or `None` if there is no slot at `index`.
    pub fn resize(
        &mut self,
        index: usize,
        column: &Column,
        start_width_px: f64,
        delta_px: f64,
        grid_width_px: f64,
    ) -> Option<f64> {
        let min = self.min_width_px(column);
        let mut px = (start_width_px + delta_px).max(min);
        if self.enforce_max_width
            && let Some(max) = column.max_width
        {
            px = px.min(max.max(min));
        }

        let percent = pixels_to_percent(px, grid_width_px);
        let slot = self.widths.get_mut(index)?;
        *slot = percent;
        trace!("Resized slot {index} to {px}px ({percent}%)");
        Some(percent)
    }

    /// Render the slots as a layout directive.
    pub fn directive(&self, precision: usize) -> LayoutDirective {
        LayoutDirective::from_widths(&self.widths, precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_grid_width_converts_to_zero() {
        assert_eq!(pixels_to_percent(150.0, 0.0), 0.0);
        assert_eq!(pixels_to_percent(150.0, -10.0), 0.0);
        assert_eq!(pixels_to_percent(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn directive_formats_tokens_with_precision() {
        let directive = LayoutDirective::from_widths(&[100.0 / 3.0 - 1.0, 20.0], 2);
        assert_eq!(directive.as_str(), "32.33% 20.00%");
        assert_eq!(directive.tokens().count(), 2);
    }

    #[test]
    fn empty_column_set_yields_empty_directive() {
        let mut model = ColumnWidthModel::new(&GridConfig::default());
        assert!(!model.on_columns_changed(&[], 800.0));
        assert_eq!(model.directive(2).as_str(), "");
    }
}
