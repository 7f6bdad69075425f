use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use gridweave::{
    CellContainer, CellContent, Column, GridConfig, GridController, HostElement, MountFn,
    RenderResult, Row, resolve_cell,
};

fn mount_into(mount: &MountFn, container: &mut CellContainer) {
    mount(container)
}

// ============================================================================
// Raw values
// ============================================================================

#[test]
fn test_without_render_shows_raw_value() {
    let row = Row::new().set("qty", 3).set("name", "bolt");

    assert_eq!(
        resolve_cell(&row, 0, &Column::new("qty", "Qty"), None),
        CellContent::Value(json!(3))
    );
    assert_eq!(
        resolve_cell(&row, 0, &Column::new("name", "Name"), None),
        CellContent::Value(json!("bolt"))
    );
}

#[test]
fn test_missing_field_is_null() {
    let row = Row::new();

    assert_eq!(
        resolve_cell(&row, 0, &Column::new("absent", "Absent"), None),
        CellContent::Value(Value::Null)
    );
}

// ============================================================================
// Render callbacks
// ============================================================================

#[test]
fn test_render_receives_value_and_row_index() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let column = Column::new("qty", "Qty").render(move |value, index| {
        log.lock().unwrap().push((value.clone(), index));
        RenderResult::text(format!("{value} units"))
    });
    let row = Row::new().set("qty", 7);

    let content = resolve_cell(&row, 4, &column, None);

    assert_eq!(content, CellContent::Text("7 units".to_string()));
    assert_eq!(*seen.lock().unwrap(), vec![(json!(7), 4)]);
}

#[test]
fn test_markup_and_element_pass_through() {
    let row = Row::new().set("flag", true);
    let markup = Column::new("flag", "Flag").render(|_, _| RenderResult::markup("<b>yes</b>"));
    let element = Column::new("flag", "Flag")
        .render(|_, _| RenderResult::Element(HostElement::new("span", "yes")));

    assert_eq!(
        resolve_cell(&row, 0, &markup, None),
        CellContent::Markup("<b>yes</b>".to_string())
    );
    assert_eq!(
        resolve_cell(&row, 0, &element, None),
        CellContent::Element(HostElement::new("span", "yes"))
    );
}

#[test]
fn test_mountable_is_mounted_by_renderer() {
    let column = Column::new("name", "Name").render(|value, _| {
        let text = value.as_str().unwrap_or_default().to_uppercase();
        RenderResult::mountable(move |container| container.append(text.clone()))
    });
    let row = Row::new().set("name", "ada");

    let content = resolve_cell(&row, 0, &column, Some(&mount_into));

    let container = match content {
        CellContent::Mounted(container) => container,
        other => panic!("expected mounted content, got {other:?}"),
    };
    assert_eq!(container.nodes(), ["ADA".to_string()]);
    assert_eq!(container.id, format!("{}:{}", row.key(), column.key()));
}

#[test]
fn test_mountable_without_renderer_is_empty() {
    let column = Column::new("name", "Name")
        .render(|_, _| RenderResult::mountable(|container| container.append("never")));

    let content = resolve_cell(&Row::new(), 0, &column, None);

    assert!(content.is_empty());
}

#[test]
fn test_unknown_result_is_empty() {
    let column = Column::new("n", "N").render(|_, _| RenderResult::Unknown(Box::new(42u8)));

    assert_eq!(
        resolve_cell(&Row::new().set("n", 1), 0, &column, Some(&mount_into)),
        CellContent::Empty
    );
}

// ============================================================================
// Through the grid
// ============================================================================

#[test]
fn test_grid_cell_looks_up_by_position() {
    let grid = GridController::new(GridConfig::default());
    grid.set_columns(vec![
        Column::new("a", "A"),
        Column::new("b", "B").render(|v, i| RenderResult::text(format!("{i}:{v}"))),
    ]);
    grid.set_rows(vec![Row::new().set("a", "x"), Row::new().set("b", 2)]);

    assert_eq!(grid.cell(0, 0, None), Some(CellContent::Value(json!("x"))));
    assert_eq!(
        grid.cell(1, 1, None),
        Some(CellContent::Text("1:2".to_string()))
    );
    assert_eq!(grid.cell(2, 0, None), None);
    assert_eq!(grid.cell(0, 2, None), None);
}
