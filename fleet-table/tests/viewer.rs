use std::sync::{Arc, Mutex};

use fleet_table::{
    CellError, Column, Filter, FilterSet, Layout, Record, RecordId, RowAction, SortDirection,
    TableViewer, Value, ViewerError, ViewerOptions,
};

fn vehicles(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|i| {
            Record::new(i as i64)
                .set("plate", format!("PL-{:03}", i))
                .set("model", if i % 5 == 0 { "Ford Ranger" } else { "Toyota Hilux" })
                .set("status", if i % 2 == 0 { "good" } else { "service" })
                .set("mileage", (i * 1000) as i64)
                .set("site", "North")
                .set("owner", "Fleet")
        })
        .collect()
}

fn columns() -> Vec<Column<Record>> {
    vec![
        Column::new("id", "ID").fixed(4),
        Column::new("plate", "Plate").sortable(),
        Column::new("model", "Model").sortable(),
        Column::new("status", "Status"),
        Column::new("mileage", "Mileage").sortable(),
        Column::new("site", "Site"),
    ]
}

fn keys(viewer: &TableViewer<Record>, layout: Layout) -> Vec<String> {
    viewer
        .view(layout)
        .rows
        .iter()
        .map(|row| row.key.to_string())
        .collect()
}

#[test]
fn test_first_and_last_page() {
    let mut viewer = TableViewer::new(vehicles(25), columns());
    assert_eq!(viewer.total_pages(), 3);
    assert_eq!(keys(&viewer, Layout::Wide).first().map(String::as_str), Some("1"));
    assert_eq!(keys(&viewer, Layout::Wide).len(), 10);

    assert!(viewer.last_page());
    let view = viewer.view(Layout::Wide);
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.rows[0].key, RecordId::from("21"));
    let controls = view.pagination.unwrap();
    assert_eq!((controls.page, controls.total_pages), (3, 3));
    assert!(controls.prev_enabled);
    assert!(!controls.next_enabled);
}

#[test]
fn test_next_and_prev_stop_at_bounds() {
    let mut viewer = TableViewer::new(vehicles(25), columns());
    assert!(!viewer.prev_page());
    assert!(viewer.next_page());
    assert!(viewer.next_page());
    assert!(!viewer.next_page());
    assert_eq!(viewer.current_page(), 3);
    assert!(viewer.first_page());
    assert_eq!(viewer.current_page(), 1);
}

#[test]
fn test_search_resets_page() {
    let mut viewer = TableViewer::new(vehicles(25), columns());
    viewer.last_page();
    viewer.set_search("ranger").unwrap();
    assert_eq!(viewer.current_page(), 1);
    let view = viewer.view(Layout::Wide);
    assert_eq!(view.rows.len(), 5);
    assert!(view.pagination.is_none());
    assert_eq!(view.summary.to_string(), "Showing 1–5 of 5 results");
}

#[test]
fn test_shrinking_dataset_clamps_without_touching_stored_page() {
    let mut viewer = TableViewer::new(vehicles(25), columns());
    viewer.last_page();
    viewer.set_rows(vehicles(5));

    assert_eq!(viewer.current_page(), 3);
    let view = viewer.view(Layout::Wide);
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.rows[0].key, RecordId::from("1"));
    assert_eq!(viewer.current_page(), 3);

    viewer.set_rows(vehicles(25));
    assert_eq!(keys(&viewer, Layout::Wide)[0], "21");
}

#[test]
fn test_set_rows_keeps_search_and_expanded() {
    let mut viewer = TableViewer::new(vehicles(10), columns());
    viewer.set_search("ranger").unwrap();
    let key = RecordId::from("5");
    assert!(viewer.toggle_expanded(&key));

    viewer.set_rows(vehicles(12));
    assert_eq!(viewer.search_term(), "ranger");
    assert!(viewer.is_expanded(&key));
    assert_eq!(keys(&viewer, Layout::Wide), vec!["5", "10"]);
}

#[test]
fn test_search_disabled() {
    let options = ViewerOptions {
        searchable: false,
        ..ViewerOptions::default()
    };
    let mut viewer = TableViewer::new(vehicles(3), columns()).with_options(options);
    assert_eq!(viewer.set_search("x"), Err(ViewerError::SearchDisabled));
    assert!(viewer.view(Layout::Wide).search.is_none());
}

#[test]
fn test_toggle_expanded_twice_restores_state() {
    let mut viewer = TableViewer::new(vehicles(3), columns());
    let a = RecordId::from("1");
    let b = RecordId::from("2");
    viewer.toggle_expanded(&b);

    assert!(viewer.toggle_expanded(&a));
    assert!(!viewer.toggle_expanded(&a));
    assert!(!viewer.is_expanded(&a));
    assert!(viewer.is_expanded(&b));
}

#[test]
fn test_compact_layout_projects_columns() {
    let mut viewer = TableViewer::new(vehicles(7), columns())
        .with_actions(|_| vec![RowAction::new("view", "View"), RowAction::new("delete", "Delete")]);
    let key = RecordId::from("7");

    let view = viewer.view(Layout::Compact);
    let headers: Vec<&str> = view.headers.iter().map(|h| h.key.as_str()).collect();
    assert_eq!(headers, vec!["id", "plate", "model", "status"]);
    let row = view.rows.iter().find(|r| r.key == key).unwrap();
    assert!(row.expandable);
    assert!(row.secondary.is_empty());
    assert!(row.actions.is_empty());

    viewer.toggle_expanded(&key);
    let view = viewer.view(Layout::Compact);
    let row = view.rows.iter().find(|r| r.key == key).unwrap();
    let labels: Vec<&str> = row.secondary.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["Mileage", "Site"]);
    assert_eq!(row.actions.len(), 2);
    assert_eq!(row.cells.len(), 4);
}

#[test]
fn test_wide_layout_shows_everything() {
    let viewer = TableViewer::new(vehicles(2), columns())
        .with_actions(|_| vec![RowAction::new("view", "View")]);
    let view = viewer.view(Layout::Wide);
    assert_eq!(view.headers.len(), 6);
    assert!(view.rows.iter().all(|r| r.actions.len() == 1 && !r.expandable));
}

#[test]
fn test_primary_count_is_configurable() {
    let options = ViewerOptions {
        primary_count: 2,
        ..ViewerOptions::default()
    };
    let viewer = TableViewer::new(vehicles(1), columns()).with_options(options);
    assert_eq!(viewer.view(Layout::Compact).headers.len(), 2);
}

#[test]
fn test_sort_cycles_and_is_stable() {
    let mut viewer = TableViewer::new(vehicles(10), columns());
    viewer.next_page();

    viewer.toggle_sort("model").unwrap();
    assert_eq!(viewer.current_page(), 1);
    assert_eq!(
        keys(&viewer, Layout::Wide),
        vec!["5", "10", "1", "2", "3", "4", "6", "7", "8", "9"]
    );
    let view = viewer.view(Layout::Wide);
    assert_eq!(view.headers[2].sort, Some(SortDirection::Ascending));

    viewer.toggle_sort("model").unwrap();
    assert_eq!(
        keys(&viewer, Layout::Wide),
        vec!["1", "2", "3", "4", "6", "7", "8", "9", "5", "10"]
    );

    viewer.toggle_sort("model").unwrap();
    assert_eq!(keys(&viewer, Layout::Wide)[0], "1");
    assert!(viewer.view(Layout::Wide).headers.iter().all(|h| h.sort.is_none()));
}

#[test]
fn test_numeric_sort_descending() {
    let mut viewer = TableViewer::new(vehicles(12), columns());
    viewer.toggle_sort("mileage").unwrap();
    viewer.toggle_sort("mileage").unwrap();
    assert_eq!(keys(&viewer, Layout::Wide)[0], "12");
}

#[test]
fn test_sort_rejects_unsortable_column() {
    let mut viewer = TableViewer::new(vehicles(3), columns());
    assert_eq!(
        viewer.toggle_sort("status"),
        Err(ViewerError::NotSortable("status".into()))
    );
    assert_eq!(
        viewer.toggle_sort("missing"),
        Err(ViewerError::NotSortable("missing".into()))
    );
}

#[test]
fn test_filters_require_filterable() {
    let mut viewer = TableViewer::new(vehicles(10), columns());
    let filters = FilterSet::new().with(Filter::eq("status", "good"));
    assert_eq!(
        viewer.set_filters(filters.clone()),
        Err(ViewerError::FilteringDisabled)
    );

    let options = ViewerOptions {
        filterable: true,
        ..ViewerOptions::default()
    };
    let mut viewer = TableViewer::new(vehicles(10), columns()).with_options(options);
    viewer.set_filters(filters).unwrap();
    assert_eq!(keys(&viewer, Layout::Wide), vec!["2", "4", "6", "8", "10"]);
    assert_eq!(viewer.view(Layout::Wide).active_filters, 1);

    viewer.set_search("ranger").unwrap();
    assert_eq!(keys(&viewer, Layout::Wide), vec!["10"]);

    viewer.clear_filters().unwrap();
    assert_eq!(keys(&viewer, Layout::Wide), vec!["5", "10"]);
}

#[test]
fn test_page_size_change_resets_page() {
    let mut viewer = TableViewer::new(vehicles(25), columns());
    viewer.last_page();
    viewer.set_page_size(5).unwrap();
    assert_eq!(viewer.current_page(), 1);
    assert_eq!(viewer.total_pages(), 5);
    assert_eq!(viewer.set_page_size(0), Err(ViewerError::InvalidPageSize));
}

#[test]
fn test_activate_calls_row_click() {
    let clicked = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&clicked);
    let mut viewer = TableViewer::new(vehicles(3), columns())
        .on_row_click(move |row: &Record| sink.lock().unwrap().push(row.id().clone()));

    assert!(viewer.activate(&RecordId::from("2")));
    assert!(!viewer.activate(&RecordId::from("99")));
    assert_eq!(*clicked.lock().unwrap(), vec![RecordId::from("2")]);
}

#[test]
fn test_failing_render_is_isolated() {
    let columns = vec![
        Column::new("plate", "Plate"),
        Column::new("mileage", "Mileage").render(|value, _row: &Record| match value {
            Some(Value::Int(km)) if *km < 3000 => Ok(format!("{} km", km)),
            Some(other) => Err(CellError::UnexpectedValue {
                field: "mileage".into(),
                found: other.type_name(),
            }),
            None => Err(CellError::Missing("mileage".into())),
        }),
        Column::new("site", "Site").render(|_, row: &Record| {
            if row.id().as_str() == "3" {
                panic!("boom");
            }
            Ok("ok".into())
        }),
    ];
    let viewer = TableViewer::new(vehicles(3), columns);
    let view = viewer.view(Layout::Wide);

    assert_eq!(view.rows.len(), 3);
    assert!(!view.rows[0].cells[1].is_error());
    assert!(view.rows[2].cells[1].is_error());
    assert!(view.rows[2].cells[2].is_error());
    assert!(view.rows[2].cells[2].display().contains("boom"));
    assert!(!view.rows[1].cells[2].is_error());
}

#[test]
fn test_empty_rows() {
    let viewer = TableViewer::new(Vec::new(), columns());
    let view = viewer.view(Layout::Wide);
    assert!(view.rows.is_empty());
    assert!(view.pagination.is_none());
    assert_eq!(viewer.total_pages(), 1);
    assert_eq!(view.summary.to_string(), "Showing 0 of 0 results");
}
