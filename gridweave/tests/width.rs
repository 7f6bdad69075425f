use gridweave::{
    Column, ColumnWidthModel, GridConfig, GridController, percent_to_pixels, pixels_to_percent,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn columns(fields: &[&str]) -> Vec<Column> {
    fields
        .iter()
        .map(|f| Column::new(*f, f.to_uppercase()))
        .collect()
}

fn grid(width: f64) -> GridController {
    let grid = GridController::new(GridConfig::default());
    grid.set_grid_width(width);
    grid
}

// ============================================================================
// Initial widths
// ============================================================================

#[test]
fn test_equal_share_leaves_border_deficit() {
    let grid = grid(1000.0);
    grid.set_columns(columns(&["a", "b", "c"]));

    let widths = grid.widths();
    assert_eq!(widths.len(), 3);
    for w in widths.iter() {
        assert!(close(*w, 100.0 / 3.0 - 1.0), "got {w}");
        assert_eq!(format!("{w:.2}"), "32.33");
    }
}

#[test]
fn test_min_width_converts_to_percent_of_grid() {
    let grid = grid(1000.0);
    grid.set_columns(vec![Column::new("a", "A").min_width(200.0)]);

    assert!(close(grid.widths()[0], 20.0));
}

#[test]
fn test_min_width_round_trips_to_at_least_min() {
    let grid = grid(1234.0);
    let mins = [100.0, 250.0, 333.3];
    grid.set_columns(
        mins.iter()
            .map(|m| Column::new("f", "F").min_width(*m))
            .collect(),
    );

    for (w, min) in grid.widths().iter().zip(mins) {
        assert!(
            percent_to_pixels(*w, 1234.0) >= min - 1e-9,
            "{w}% is below {min}px"
        );
    }
}

#[test]
fn test_min_width_on_zero_width_grid_is_zero() {
    let grid = grid(0.0);
    grid.set_columns(vec![Column::new("a", "A").min_width(200.0)]);

    let w = grid.widths()[0];
    assert!(w.is_finite());
    assert_eq!(w, 0.0);
}

#[test]
fn test_pixels_to_percent_never_nan() {
    assert_eq!(pixels_to_percent(150.0, 0.0), 0.0);
    assert_eq!(pixels_to_percent(0.0, 0.0), 0.0);
    assert!(close(pixels_to_percent(150.0, 1000.0), 15.0));
}

// ============================================================================
// Column set changes
// ============================================================================

#[test]
fn test_slot_count_follows_column_count() {
    let grid = grid(800.0);
    for n in [3usize, 5, 2, 0, 4, 1] {
        let fields: Vec<String> = (0..n).map(|i| format!("f{i}")).collect();
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        grid.set_columns(columns(&refs));
        assert_eq!(grid.widths().len(), n, "after setting {n} columns");
    }
}

#[test]
fn test_existing_slots_kept_by_position() {
    let grid = grid(1000.0);
    grid.set_columns(columns(&["a", "b"]));
    grid.resize_column(0, 100.0, 50.0).unwrap();

    grid.set_columns(columns(&["x", "y", "z"]));

    let widths = grid.widths();
    assert!(close(widths[0], 15.0), "resized slot kept");
    assert!(close(widths[1], 49.0), "old two-column share kept");
    assert!(close(widths[2], 100.0 / 3.0 - 1.0), "new slot gets new share");
}

#[test]
fn test_same_count_replacement_keeps_slots() {
    let grid = grid(1000.0);
    grid.set_columns(columns(&["a", "b"]));
    grid.resize_column(1, 100.0, 100.0).unwrap();
    let before = grid.widths();

    grid.set_columns(vec![
        Column::new("c", "C").min_width(500.0),
        Column::new("d", "D"),
    ]);

    assert_eq!(&*grid.widths(), &*before);
}

#[test]
fn test_model_only_recomputes_when_stale() {
    let mut model = ColumnWidthModel::new(&GridConfig::default());
    let cols = columns(&["a", "b", "c", "d"]);

    assert!(model.on_columns_changed(&cols, 1000.0));
    assert!(!model.on_columns_changed(&cols, 1000.0));
    assert!(close(model.widths()[0], 24.0));
    assert_eq!(model.directive(1).as_str(), "24.0% 24.0% 24.0% 24.0%");
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_adds_pointer_delta() {
    let grid = grid(1000.0);
    grid.set_columns(columns(&["a"]));

    let percent = grid.resize_column(0, 100.0, 50.0).unwrap();

    assert!(close(percent, 15.0));
    assert!(close(grid.widths()[0], 15.0));
}

#[test]
fn test_resize_floors_at_fallback_minimum() {
    let grid = grid(1000.0);
    grid.set_columns(columns(&["a"]));

    let percent = grid.resize_column(0, 100.0, -500.0).unwrap();

    assert!(close(percent, 6.0), "60px fallback floor");
}

#[test]
fn test_resize_floors_at_column_minimum() {
    let grid = grid(1000.0);
    grid.set_columns(vec![Column::new("a", "A").min_width(150.0)]);

    let percent = grid.resize_column(0, 200.0, -100.0).unwrap();

    assert!(close(percent, 15.0));
}

#[test]
fn test_resize_ignores_max_width_by_default() {
    let grid = grid(1000.0);
    grid.set_columns(vec![Column::new("a", "A").max_width(300.0)]);

    let percent = grid.resize_column(0, 100.0, 500.0).unwrap();

    assert!(close(percent, 60.0));
}

#[test]
fn test_resize_clamps_max_width_when_enforced() {
    let grid = GridController::new(GridConfig::new().enforce_max_width());
    grid.set_grid_width(1000.0);
    grid.set_columns(vec![Column::new("a", "A").max_width(300.0)]);

    let percent = grid.resize_column(0, 100.0, 500.0).unwrap();

    assert!(close(percent, 30.0));
}

#[test]
fn test_fallback_minimum_is_configurable() {
    let grid = GridController::new(GridConfig::new().fallback_min_width(120.0));
    grid.set_grid_width(1000.0);
    grid.set_columns(columns(&["a"]));

    let percent = grid.resize_column(0, 100.0, -100.0).unwrap();

    assert!(close(percent, 12.0));
}

// ============================================================================
// Layout directive
// ============================================================================

#[test]
fn test_flush_publishes_directive() {
    let grid = grid(1000.0);
    grid.set_columns(columns(&["a", "b", "c"]));

    let frame = grid.flush().unwrap();

    assert_eq!(frame.directive.as_str(), "32.33% 32.33% 32.33%");
    assert_eq!(frame.directive.tokens().count(), 3);
    assert_eq!(frame.widths.len(), 3);
}
