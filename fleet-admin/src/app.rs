//! The admin front end: one table viewer per resource, driven by key presses
//! and background fetches.

use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use fleet_table::text::{display_width, truncate_to_width};
use fleet_table::{FilterSet, Layout, Record, RecordId, TableRow, TableViewer, TextOptions, render_lines};
use futures::StreamExt;
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::resources::{ACTION_DELETE, ACTION_VIEW, Resource};
use crate::settings::Settings;
use crate::source::{RecordSource, SourceError};
use crate::terminal::{Line, TerminalGuard, Tone};

/// Results of background work, delivered back to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    Loaded {
        resource: Resource,
        generation: u64,
        result: Result<Vec<Record>, SourceError>,
    },
    Deleted {
        resource: Resource,
        id: RecordId,
        result: Result<(), SourceError>,
    },
    /// A row was activated.
    ShowDetail { resource: Resource, record: Record },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// What the keyboard currently drives.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    Search,
    Detail { resource: Resource, record: Record },
    ConfirmDelete { resource: Resource, id: RecordId },
}

/// One-line feedback under the tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    settings: Settings,
    source: Arc<dyn RecordSource>,
    viewers: Vec<TableViewer<Record>>,
    loaded: Vec<bool>,
    resource: Resource,
    mode: Mode,
    cursor: usize,
    status: Option<Status>,
    loading: Option<Resource>,
    generation: u64,
    fetch: Option<CancellationToken>,
    events: mpsc::UnboundedSender<AppEvent>,
    width: u16,
    height: u16,
}

impl App {
    /// Create the app and the receiving end of its event channel.
    pub fn new(
        settings: Settings,
        source: Arc<dyn RecordSource>,
    ) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let viewers = Resource::ALL
            .iter()
            .map(|&resource| {
                let events = tx.clone();
                TableViewer::new(Vec::new(), resource.columns())
                    .with_options(settings.viewer_options(resource.quick_filter().is_some()))
                    .on_row_click(move |record: &Record| {
                        let _ = events.send(AppEvent::ShowDetail {
                            resource,
                            record: record.clone(),
                        });
                    })
                    .with_actions(Resource::actions)
            })
            .collect();

        let app = Self {
            settings,
            source,
            viewers,
            loaded: vec![false; Resource::ALL.len()],
            resource: Resource::ALL[0],
            mode: Mode::Browse,
            cursor: 0,
            status: None,
            loading: None,
            generation: 0,
            fetch: None,
            events: tx,
            width: 120,
            height: 40,
        };
        (app, rx)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Row position of the highlight on the current page.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// The viewer of the current resource.
    pub fn viewer(&self) -> &TableViewer<Record> {
        &self.viewers[self.resource.index()]
    }

    fn viewer_mut(&mut self) -> &mut TableViewer<Record> {
        &mut self.viewers[self.resource.index()]
    }

    pub fn layout(&self) -> Layout {
        Layout::for_width(self.width, self.settings.compact_breakpoint)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Key of the highlighted row.
    pub fn cursor_key(&self) -> Option<RecordId> {
        let viewer = self.viewer();
        let indices = viewer.visible_indices();
        let page = viewer.page();
        indices[page.range()]
            .get(self.cursor)
            .map(|&index| viewer.rows()[index].key())
    }

    fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: true,
        });
    }

    // =========================================================================
    // Background work
    // =========================================================================

    /// Fetch a resource in the background, cancelling any fetch in flight.
    pub fn load(&mut self, resource: Resource) {
        self.cancel_fetch();
        self.generation += 1;
        let generation = self.generation;

        let token = CancellationToken::new();
        self.fetch = Some(token.clone());
        self.loading = Some(resource);

        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        info!("Fetching {} from {}", resource.path(), source.describe());

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Fetch of {} cancelled", resource.path());
                }
                result = source.fetch(resource) => {
                    let _ = events.send(AppEvent::Loaded { resource, generation, result });
                }
            }
        });
    }

    fn cancel_fetch(&mut self) {
        if let Some(token) = self.fetch.take() {
            token.cancel();
        }
        self.loading = None;
    }

    fn delete(&mut self, resource: Resource, id: RecordId) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        self.set_info(format!("Deleting {} {}…", resource.noun(), id));
        info!("Deleting {} {}", resource.noun(), id);

        tokio::spawn(async move {
            let result = source.delete(resource, &id).await;
            let _ = events.send(AppEvent::Deleted {
                resource,
                id,
                result,
            });
        });
    }

    /// Apply the result of background work.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded {
                resource,
                generation,
                result,
            } => {
                if generation != self.generation {
                    debug!("Dropping stale fetch of {}", resource.path());
                    return;
                }
                self.fetch = None;
                self.loading = None;
                match result {
                    Ok(records) => {
                        info!("Loaded {} {}", records.len(), resource.path());
                        self.viewers[resource.index()].set_rows(records);
                        self.loaded[resource.index()] = true;
                        self.clamp_cursor();
                    }
                    Err(e) => {
                        error!("Failed to load {}: {}", resource.path(), e);
                        self.set_error(format!("Failed to load {}: {}", resource.path(), e));
                    }
                }
            }
            AppEvent::Deleted {
                resource,
                id,
                result,
            } => match result {
                Ok(()) => {
                    let viewer = &mut self.viewers[resource.index()];
                    let rows = viewer
                        .rows()
                        .iter()
                        .filter(|record| record.id() != &id)
                        .cloned()
                        .collect();
                    viewer.set_rows(rows);
                    self.clamp_cursor();
                    self.set_info(format!("Deleted {} {}", resource.noun(), id));
                }
                Err(e) => {
                    error!("Failed to delete {} {}: {}", resource.noun(), id, e);
                    self.set_error(format!("Failed to delete {} {}: {}", resource.noun(), id, e));
                }
            },
            AppEvent::ShowDetail { resource, record } => {
                if resource == self.resource && self.mode == Mode::Browse {
                    self.mode = Mode::Detail { resource, record };
                }
            }
        }
    }

    // =========================================================================
    // Keys
    // =========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match self.mode {
            Mode::Browse => return self.browse_key(key),
            Mode::Search => self.search_key(key),
            Mode::Detail { .. } => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q')
                ) {
                    self.mode = Mode::Browse;
                }
            }
            Mode::ConfirmDelete { .. } => self.confirm_key(key),
        }
        Control::Continue
    }

    fn browse_key(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Tab => self.switch_to(self.resource.next()),
            KeyCode::BackTab => self.switch_to(self.resource.prev()),
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Esc => {
                if let Err(e) = self.viewer_mut().clear_search() {
                    warn!("Clearing search failed: {}", e);
                }
                self.cursor = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
                self.turn_page(TableViewer::next_page)
            }
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => {
                self.turn_page(TableViewer::prev_page)
            }
            KeyCode::Char('g') | KeyCode::Home => self.turn_page(TableViewer::first_page),
            KeyCode::Char('G') | KeyCode::End => self.turn_page(TableViewer::last_page),
            KeyCode::Char(' ') => {
                if let Some(key) = self.cursor_key() {
                    self.viewer_mut().toggle_expanded(&key);
                }
            }
            KeyCode::Enter | KeyCode::Char('v') => self.trigger_action(ACTION_VIEW),
            KeyCode::Char('d') | KeyCode::Delete => self.trigger_action(ACTION_DELETE),
            KeyCode::Char(c @ '1'..='9') => self.sort_by_column(c as usize - '1' as usize),
            KeyCode::Char('f') => self.toggle_quick_filter(),
            KeyCode::Char('r') => self.load(self.resource),
            _ => {}
        }
        Control::Continue
    }

    fn search_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            self.mode = Mode::Browse;
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let viewer = self.viewer_mut();
        let result = match key.code {
            KeyCode::Backspace => viewer.pop_search_char(),
            KeyCode::Char('u') if ctrl => viewer.clear_search(),
            KeyCode::Char(c) if !ctrl => viewer.push_search_char(c),
            _ => return,
        };

        match result {
            Ok(()) => self.cursor = 0,
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn confirm_key(&mut self, key: KeyEvent) {
        let Mode::ConfirmDelete { resource, id } = std::mem::replace(&mut self.mode, Mode::Browse)
        else {
            return;
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.delete(resource, id),
            _ => self.set_info("Delete cancelled"),
        }
    }

    fn switch_to(&mut self, resource: Resource) {
        if resource == self.resource {
            return;
        }
        self.cancel_fetch();
        self.resource = resource;
        self.cursor = 0;
        self.status = None;
        debug!("Switched to {}", resource.path());
        if !self.loaded[resource.index()] {
            self.load(resource);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let rows = self.viewer().page().range().len();
        self.cursor = if rows == 0 {
            0
        } else {
            self.cursor.saturating_add_signed(delta).min(rows - 1)
        };
    }

    fn clamp_cursor(&mut self) {
        self.move_cursor(0);
    }

    fn turn_page(&mut self, turn: fn(&mut TableViewer<Record>) -> bool) {
        if turn(self.viewer_mut()) {
            self.cursor = 0;
        }
    }

    /// Run a row action on the highlighted row, if the row offers it.
    fn trigger_action(&mut self, action: &str) {
        let Some(key) = self.cursor_key() else {
            return;
        };
        if !self
            .viewer()
            .actions_for(&key)
            .iter()
            .any(|offered| offered.id == action)
        {
            return;
        }

        match action {
            ACTION_VIEW => {
                self.viewer_mut().activate(&key);
            }
            ACTION_DELETE => {
                self.mode = Mode::ConfirmDelete {
                    resource: self.resource,
                    id: key,
                };
            }
            _ => {}
        }
    }

    fn sort_by_column(&mut self, index: usize) {
        let Some((key, label)) = self
            .viewer()
            .columns()
            .get(index)
            .map(|column| (column.key.clone(), column.label.clone()))
        else {
            return;
        };

        match self.viewer_mut().toggle_sort(&key) {
            Ok(()) => {
                self.cursor = 0;
                match self.viewer().sort().direction_for(&key) {
                    Some(direction) => {
                        self.set_info(format!("Sorted by {} {}", label, direction.indicator()))
                    }
                    None => self.set_info("Sort cleared"),
                }
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn toggle_quick_filter(&mut self) {
        let Some(filter) = self.resource.quick_filter() else {
            self.set_info(format!("{} has no quick filter", self.resource.title()));
            return;
        };

        let enable = self.viewer().filters().is_empty();
        let filters = if enable {
            FilterSet::new().with(filter)
        } else {
            FilterSet::new()
        };

        match self.viewer_mut().set_filters(filters) {
            Ok(()) => {
                self.cursor = 0;
                self.set_info(if enable {
                    "Showing records needing attention"
                } else {
                    "Showing all records"
                });
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    // =========================================================================
    // Render
    // =========================================================================

    /// Lay out the whole screen for the current size.
    pub fn frame(&self) -> Vec<Line> {
        let width = usize::from(self.width);
        let mut lines = vec![Line::new(truncate_to_width(&self.tabs(), width), Tone::Title)];
        lines.push(self.status_line(width));

        match &self.mode {
            Mode::Detail { resource, record } => {
                lines.extend(detail_lines(*resource, record, width));
            }
            _ => lines.extend(self.table_lines(width)),
        }

        let body = usize::from(self.height).saturating_sub(1);
        lines.truncate(body);
        lines.resize(body, Line::normal(""));
        lines.push(Line::new(truncate_to_width(self.help(), width), Tone::Muted));
        lines
    }

    fn tabs(&self) -> String {
        Resource::ALL
            .iter()
            .map(|&resource| {
                if resource == self.resource {
                    format!("[{}]", resource.title())
                } else {
                    format!(" {} ", resource.title())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn status_line(&self, width: usize) -> Line {
        let (text, tone) = match (&self.mode, &self.status) {
            (Mode::ConfirmDelete { resource, id }, _) => (
                format!("Delete {} {}? (y/n)", resource.noun(), id),
                Tone::Error,
            ),
            _ if self.loading == Some(self.resource) => (
                format!("Loading {}…", self.resource.title().to_lowercase()),
                Tone::Muted,
            ),
            (_, Some(status)) if status.is_error => (status.text.clone(), Tone::Error),
            (_, Some(status)) => (status.text.clone(), Tone::Normal),
            (_, None) => (self.source.describe(), Tone::Muted),
        };
        Line::new(truncate_to_width(&text, width), tone)
    }

    fn table_lines(&self, width: usize) -> Vec<Line> {
        let view = self.viewer().view(self.layout());
        let options = TextOptions {
            width,
            cursor: (!view.rows.is_empty()).then_some(self.cursor),
            search_focused: self.mode == Mode::Search,
        };

        let mut lines: Vec<Line> = render_lines(&view, &options)
            .into_iter()
            .map(|text| {
                let tone = if text.starts_with('>') {
                    Tone::Cursor
                } else {
                    Tone::Normal
                };
                Line::new(text, tone)
            })
            .collect();

        if view.rows.is_empty() {
            let message = if self.loading == Some(self.resource) {
                "Loading…"
            } else {
                "No matching records"
            };
            // Above the closing rule and summary
            let at = lines.len().saturating_sub(2);
            lines.insert(at, Line::new(format!("   {}", message), Tone::Muted));
        }

        lines
    }

    fn help(&self) -> &'static str {
        match self.mode {
            Mode::Browse => {
                "/ search  j/k move  space expand  enter view  d delete  1-9 sort  f filter  n/p page  r reload  tab next  q quit"
            }
            Mode::Search => "type to search  backspace erase  ctrl+u clear  enter/esc done",
            Mode::Detail { .. } => "esc back",
            Mode::ConfirmDelete { .. } => "y delete  any other key cancels",
        }
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Run until the user quits.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Result<(), AppError> {
        let mut terminal = TerminalGuard::new()?;
        let mut input = EventStream::new();

        let (width, height) = terminal.size()?;
        self.resize(width, height);
        self.load(self.resource);

        loop {
            terminal.draw(&self.frame())?;

            tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) == Control::Quit {
                            break;
                        }
                    }
                    Some(Ok(Event::Resize(width, height))) => self.resize(width, height),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        self.cancel_fetch();
                        return Err(e.into());
                    }
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event),
            }
        }

        self.cancel_fetch();
        info!("Event loop exited");
        Ok(())
    }
}

/// Every field of a record, one per line.
fn detail_lines(resource: Resource, record: &Record, width: usize) -> Vec<Line> {
    let label_width = record
        .fields()
        .map(|(name, _)| display_width(name))
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        Line::new(
            truncate_to_width(&format!("{} {}", resource.noun(), record.id()), width),
            Tone::Title,
        ),
        Line::normal("─".repeat(width)),
    ];
    lines.extend(record.fields().map(|(name, value)| {
        let padding = " ".repeat(label_width.saturating_sub(display_width(name)));
        Line::normal(truncate_to_width(
            &format!("  {}{}  {}", name, padding, value),
            width,
        ))
    }));
    lines
}
