use std::fs;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fleet_admin::source::{DirectorySource, RecordSource};
use fleet_admin::{App, AppEvent, Control, Mode, Resource, Settings};
use fleet_table::{RecordId, TableRow};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let vehicles: Vec<_> = (1..=12)
        .map(|i| {
            let model = if i % 4 == 0 { "Ford Ranger" } else { "Toyota Hilux" };
            let status = if i % 2 == 0 { "good" } else { "service" };
            json!({
                "id": i,
                "plate": format!("PL-{:02}", i),
                "model": model,
                "status": status,
                "mileage": i * 1000,
            })
        })
        .collect();
    fs::write(
        dir.path().join("vehicles.json"),
        serde_json::to_string(&vehicles).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.path().join("tools.json"),
        r#"[{"id": "t-1", "name": "Drill"}, {"id": "t-2", "name": "Jack"}]"#,
    )
    .unwrap();
    dir
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ch(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

async fn settle(app: &mut App, events: &mut UnboundedReceiver<AppEvent>) {
    while app.is_loading() {
        let event = events.recv().await.unwrap();
        app.handle_event(event);
    }
}

async fn loaded_app(dir: &TempDir) -> (App, UnboundedReceiver<AppEvent>) {
    let source: Arc<dyn RecordSource> = Arc::new(DirectorySource::new(dir.path()));
    let (mut app, mut events) = App::new(Settings::default(), source);
    app.resize(120, 30);
    app.load(app.resource());
    settle(&mut app, &mut events).await;
    (app, events)
}

fn screen(app: &App) -> String {
    app.frame()
        .into_iter()
        .map(|line| line.text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn loads_the_first_resource() {
    let dir = fixture();
    let (app, _events) = loaded_app(&dir).await;

    assert_eq!(app.resource(), Resource::Vehicles);
    assert_eq!(app.viewer().rows().len(), 12);
    assert!(screen(&app).contains("Showing 1–10 of 12 results"));
}

#[tokio::test]
async fn frame_fills_the_terminal() {
    let dir = fixture();
    let (app, _events) = loaded_app(&dir).await;

    let frame = app.frame();
    assert_eq!(frame.len(), 30);
    assert!(frame[0].text.contains("[Vehicles]"));
    assert!(frame[29].text.contains("q quit"));
}

#[tokio::test]
async fn cursor_stays_on_the_page() {
    let dir = fixture();
    let (mut app, _events) = loaded_app(&dir).await;

    app.handle_key(key(KeyCode::Up));
    assert_eq!(app.cursor(), 0);

    for _ in 0..20 {
        app.handle_key(ch('j'));
    }
    assert_eq!(app.cursor(), 9);
    assert_eq!(app.cursor_key(), Some(RecordId::from(10)));

    app.handle_key(ch('n'));
    assert_eq!(app.viewer().current_page(), 2);
    assert_eq!(app.cursor(), 0);
    assert_eq!(app.cursor_key(), Some(RecordId::from(11)));

    app.handle_key(ch('G'));
    assert_eq!(app.viewer().current_page(), 2);
    app.handle_key(ch('g'));
    assert_eq!(app.viewer().current_page(), 1);
}

#[tokio::test]
async fn typing_in_search_mode_filters_rows() {
    let dir = fixture();
    let (mut app, _events) = loaded_app(&dir).await;

    app.handle_key(ch('/'));
    assert_eq!(app.mode(), &Mode::Search);

    for c in "ranger".chars() {
        app.handle_key(ch(c));
    }
    assert_eq!(app.viewer().search_term(), "ranger");
    assert_eq!(app.viewer().visible_indices().len(), 3);

    app.handle_key(key(KeyCode::Backspace));
    assert_eq!(app.viewer().search_term(), "range");

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.mode(), &Mode::Browse);
    assert_eq!(app.viewer().search_term(), "range");

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.viewer().search_term(), "");
}

#[tokio::test]
async fn q_is_text_while_searching() {
    let dir = fixture();
    let (mut app, _events) = loaded_app(&dir).await;

    app.handle_key(ch('/'));
    assert_eq!(app.handle_key(ch('q')), Control::Continue);
    assert_eq!(app.viewer().search_term(), "q");

    app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    assert_eq!(app.viewer().search_term(), "");

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.handle_key(ch('q')), Control::Quit);
}

#[tokio::test]
async fn ctrl_c_quits_from_any_mode() {
    let dir = fixture();
    let (mut app, _events) = loaded_app(&dir).await;

    app.handle_key(ch('/'));
    let quit = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(quit, Control::Quit);
}

#[tokio::test]
async fn no_matches_shows_empty_state() {
    let dir = fixture();
    let (mut app, _events) = loaded_app(&dir).await;

    app.handle_key(ch('/'));
    for c in "zzz".chars() {
        app.handle_key(ch(c));
    }

    let screen = screen(&app);
    assert!(screen.contains("No matching records"));
    assert!(screen.contains("Showing 0 of 0 results"));
    assert_eq!(app.cursor_key(), None);
}

#[tokio::test]
async fn digit_keys_cycle_column_sort() {
    let dir = fixture();
    let (mut app, _events) = loaded_app(&dir).await;

    app.handle_key(ch('2'));
    assert_eq!(app.status().unwrap().text, "Sorted by Plate ▲");
    assert_eq!(app.cursor_key(), Some(RecordId::from(1)));

    app.handle_key(ch('2'));
    assert_eq!(app.status().unwrap().text, "Sorted by Plate ▼");
    assert_eq!(app.cursor_key(), Some(RecordId::from(12)));

    app.handle_key(ch('2'));
    assert_eq!(app.status().unwrap().text, "Sort cleared");
    assert_eq!(app.cursor_key(), Some(RecordId::from(1)));
}

#[tokio::test]
async fn unsortable_column_reports_an_error() {
    let dir = fixture();
    let (mut app, _events) = loaded_app(&dir).await;

    // Vehicles column 7 is "Last service", which is not sortable.
    app.handle_key(ch('7'));
    assert!(app.status().unwrap().is_error);
    assert!(!app.viewer().sort().is_sorted());
}

#[tokio::test]
async fn quick_filter_toggles() {
    let dir = fixture();
    let (mut app, _events) = loaded_app(&dir).await;

    app.handle_key(ch('f'));
    assert_eq!(app.viewer().visible_indices().len(), 6);
    assert!(screen(&app).contains("[1 filter(s)]"));

    app.handle_key(ch('f'));
    assert_eq!(app.viewer().visible_indices().len(), 12);
}

#[tokio::test]
async fn compact_layout_expands_rows() {
    let dir = fixture();
    let (mut app, _events) = loaded_app(&dir).await;
    app.resize(80, 30);

    assert!(screen(&app).contains("▸"));

    app.handle_key(key(KeyCode::Char(' ')));
    let row_key = app.cursor_key().unwrap();
    assert!(app.viewer().is_expanded(&row_key));

    let screen = screen(&app);
    assert!(screen.contains("▾"));
    assert!(screen.contains("Mileage: 1,000 km"));
    assert!(screen.contains("[View] [Delete]"));
}

#[tokio::test]
async fn enter_opens_record_detail() {
    let dir = fixture();
    let (mut app, mut events) = loaded_app(&dir).await;

    app.handle_key(ch('j'));
    app.handle_key(key(KeyCode::Enter));
    app.handle_event(events.recv().await.unwrap());

    match app.mode() {
        Mode::Detail { resource, record } => {
            assert_eq!(*resource, Resource::Vehicles);
            assert_eq!(record.key(), RecordId::from(2));
        }
        other => panic!("expected detail mode, got {:?}", other),
    }
    assert!(screen(&app).contains("PL-02"));

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.mode(), &Mode::Browse);
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let dir = fixture();
    let (mut app, mut events) = loaded_app(&dir).await;

    app.handle_key(ch('d'));
    assert_eq!(
        app.mode(),
        &Mode::ConfirmDelete {
            resource: Resource::Vehicles,
            id: RecordId::from(1),
        }
    );
    assert!(screen(&app).contains("Delete vehicle 1? (y/n)"));

    app.handle_key(ch('n'));
    assert_eq!(app.mode(), &Mode::Browse);
    assert_eq!(app.viewer().rows().len(), 12);

    app.handle_key(ch('d'));
    app.handle_key(ch('y'));
    app.handle_event(events.recv().await.unwrap());

    assert_eq!(app.viewer().rows().len(), 11);
    assert_eq!(app.status().unwrap().text, "Deleted vehicle 1");

    let source = DirectorySource::new(dir.path());
    let stored = source.fetch(Resource::Vehicles).await.unwrap();
    assert_eq!(stored.len(), 11);
}

#[tokio::test]
async fn switching_resources_loads_once() {
    let dir = fixture();
    let (mut app, mut events) = loaded_app(&dir).await;

    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.resource(), Resource::Tools);
    assert!(app.is_loading());
    settle(&mut app, &mut events).await;
    assert_eq!(app.viewer().rows().len(), 2);

    app.handle_key(key(KeyCode::BackTab));
    assert_eq!(app.resource(), Resource::Vehicles);
    assert!(!app.is_loading());
    assert_eq!(app.viewer().rows().len(), 12);
}

#[tokio::test]
async fn switching_away_drops_the_pending_fetch() {
    let dir = fixture();
    let source: Arc<dyn RecordSource> = Arc::new(DirectorySource::new(dir.path()));
    let (mut app, mut events) = App::new(Settings::default(), source);

    app.load(Resource::Vehicles);
    app.handle_key(key(KeyCode::Tab));
    settle(&mut app, &mut events).await;

    assert_eq!(app.resource(), Resource::Tools);
    assert_eq!(app.viewer().rows().len(), 2);

    // Vehicles were never applied, so going back fetches them again.
    app.handle_key(key(KeyCode::BackTab));
    assert!(app.is_loading());
    settle(&mut app, &mut events).await;
    assert_eq!(app.viewer().rows().len(), 12);
}

#[tokio::test]
async fn load_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("vehicles.json"), "not json").unwrap();
    let (app, _events) = loaded_app(&dir).await;

    let status = app.status().unwrap();
    assert!(status.is_error);
    assert!(status.text.starts_with("Failed to load vehicles"));
    assert!(app.viewer().rows().is_empty());
}
