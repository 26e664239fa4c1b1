//! The administrative resources and how each one is shown.

use chrono::DateTime;
use fleet_table::{CellError, Column, Filter, Record, RowAction, Value};

/// Resource collections exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Vehicles,
    Tools,
    Reservations,
    Prechecks,
    Announcements,
    Tickets,
    Notifications,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Vehicles,
        Resource::Tools,
        Resource::Reservations,
        Resource::Prechecks,
        Resource::Announcements,
        Resource::Tickets,
        Resource::Notifications,
    ];

    /// Position in [`Resource::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// REST path segment, also the file stem for the directory source.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Vehicles => "vehicles",
            Resource::Tools => "tools",
            Resource::Reservations => "reservations",
            Resource::Prechecks => "prechecks",
            Resource::Announcements => "announcements",
            Resource::Tickets => "tickets",
            Resource::Notifications => "notifications",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Resource::Vehicles => "Vehicles",
            Resource::Tools => "Tools",
            Resource::Reservations => "Reservations",
            Resource::Prechecks => "Pre-checks",
            Resource::Announcements => "Announcements",
            Resource::Tickets => "Support tickets",
            Resource::Notifications => "Notifications",
        }
    }

    /// Singular noun used in the detail view and prompts.
    pub fn noun(self) -> &'static str {
        match self {
            Resource::Vehicles => "vehicle",
            Resource::Tools => "tool",
            Resource::Reservations => "reservation",
            Resource::Prechecks => "pre-check",
            Resource::Announcements => "announcement",
            Resource::Tickets => "ticket",
            Resource::Notifications => "notification",
        }
    }

    /// Column set. The first four are the ones kept in the compact layout.
    pub fn columns(self) -> Vec<Column<Record>> {
        match self {
            Resource::Vehicles => vec![
                Column::new("id", "ID").fixed(6).sortable(),
                Column::new("plate", "Plate").fixed(10).sortable(),
                Column::new("model", "Model").flex(2).sortable(),
                Column::new("status", "Status").fixed(14).sortable().render(status_badge),
                Column::new("mileage", "Mileage").fixed(10).sortable().render(kilometres),
                Column::new("site", "Site").sortable(),
                Column::new("last_service", "Last service").render(date_time),
            ],
            Resource::Tools => vec![
                Column::new("id", "ID").fixed(6).sortable(),
                Column::new("name", "Name").flex(2).sortable(),
                Column::new("category", "Category").sortable(),
                Column::new("status", "Status").fixed(14).sortable().render(status_badge),
                Column::new("location", "Location").sortable(),
                Column::new("serial", "Serial"),
            ],
            Resource::Reservations => vec![
                Column::new("id", "ID").fixed(6).sortable(),
                Column::new("vehicle", "Vehicle").fixed(10).sortable(),
                Column::new("starts_at", "Starts").fixed(16).sortable().render(date_time),
                Column::new("status", "Status").fixed(14).sortable().render(status_badge),
                Column::new("ends_at", "Ends").fixed(16).sortable().render(date_time),
                Column::new("user", "Reserved by").sortable(),
                Column::new("purpose", "Purpose").flex(2),
            ],
            Resource::Prechecks => vec![
                Column::new("id", "ID").fixed(6).sortable(),
                Column::new("vehicle", "Vehicle").fixed(10).sortable(),
                Column::new("checked_at", "Checked").fixed(16).sortable().render(date_time),
                Column::new("result", "Result").fixed(10).sortable().render(status_badge),
                Column::new("inspector", "Inspector").sortable(),
                Column::new("notes", "Notes").flex(2),
            ],
            Resource::Announcements => vec![
                Column::new("id", "ID").fixed(6).sortable(),
                Column::new("title", "Title").flex(3).sortable(),
                Column::new("audience", "Audience").sortable(),
                Column::new("published_at", "Published").fixed(16).sortable().render(date_time),
                Column::new("author", "Author").sortable(),
                Column::new("body", "Body").flex(3),
            ],
            Resource::Tickets => vec![
                Column::new("id", "ID").fixed(6).sortable(),
                Column::new("subject", "Subject").flex(3).sortable(),
                Column::new("priority", "Priority").fixed(10).sortable(),
                Column::new("status", "Status").fixed(14).sortable().render(status_badge),
                Column::new("requester", "Requester").sortable(),
                Column::new("created_at", "Created").fixed(16).sortable().render(date_time),
            ],
            Resource::Notifications => vec![
                Column::new("id", "ID").fixed(6).sortable(),
                Column::new("message", "Message").flex(3),
                Column::new("kind", "Kind").fixed(12).sortable(),
                Column::new("read", "Read").fixed(5).sortable().render(yes_no),
                Column::new("created_at", "Created").fixed(16).sortable().render(date_time),
            ],
        }
    }

    /// The "needs attention" filter toggled with `f`, if the resource has one.
    pub fn quick_filter(self) -> Option<Filter> {
        match self {
            Resource::Vehicles => Some(Filter::ne("status", "good")),
            Resource::Tools => Some(Filter::ne("status", "available")),
            Resource::Reservations => Some(Filter::eq("status", "pending")),
            Resource::Prechecks => Some(Filter::eq("result", "fail")),
            Resource::Announcements => None,
            Resource::Tickets => Some(Filter::ne("status", "closed")),
            Resource::Notifications => Some(Filter::eq("read", false)),
        }
    }

    /// Row actions shown next to (or under) every record.
    ///
    /// Records whose id was assigned at load time cannot be deleted: the id
    /// does not exist in the backend.
    pub fn actions(record: &Record) -> Vec<RowAction> {
        let mut actions = vec![RowAction::new(ACTION_VIEW, "View")];
        if !record.is_synthetic() {
            actions.push(RowAction::new(ACTION_DELETE, "Delete"));
        }
        actions
    }
}

pub const ACTION_VIEW: &str = "view";
pub const ACTION_DELETE: &str = "delete";

// =============================================================================
// Cell renderers
// =============================================================================

/// `● good`, `● service`, ... Missing status renders as a dash.
pub fn status_badge(value: Option<&Value>, _row: &Record) -> Result<String, CellError> {
    match value {
        None | Some(Value::Null) => Ok("—".into()),
        Some(Value::String(s)) => Ok(format!("● {}", s.to_lowercase())),
        Some(other) => Err(CellError::UnexpectedValue {
            field: "status".into(),
            found: other.type_name(),
        }),
    }
}

/// RFC 3339 timestamps as `YYYY-MM-DD HH:MM`.
pub fn date_time(value: Option<&Value>, _row: &Record) -> Result<String, CellError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::DateTime(dt)) => Ok(dt.format("%Y-%m-%d %H:%M").to_string()),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .map_err(|_| CellError::message(format!("invalid date {:?}", s))),
        Some(other) => Err(CellError::UnexpectedValue {
            field: "date".into(),
            found: other.type_name(),
        }),
    }
}

/// Integer kilometres with thousands separators.
pub fn kilometres(value: Option<&Value>, _row: &Record) -> Result<String, CellError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::Int(km)) => Ok(format!("{} km", group_thousands(*km))),
        Some(Value::Float(km)) => Ok(format!("{} km", group_thousands(km.round() as i64))),
        Some(other) => Err(CellError::UnexpectedValue {
            field: "mileage".into(),
            found: other.type_name(),
        }),
    }
}

pub fn yes_no(value: Option<&Value>, _row: &Record) -> Result<String, CellError> {
    match value {
        Some(Value::Bool(true)) => Ok("yes".into()),
        Some(Value::Bool(false)) | None | Some(Value::Null) => Ok("no".into()),
        Some(other) => Err(CellError::UnexpectedValue {
            field: "read".into(),
            found: other.type_name(),
        }),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
