//! Rows and their identity.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use log::warn;
use serde::{Deserialize, Serialize};

use super::Value;

// =============================================================================
// TableRow Trait
// =============================================================================

/// Trait for rows that can be displayed in a [`TableViewer`](crate::TableViewer).
///
/// Every row must carry a stable key. Expand state and row activation are
/// tracked by key only, never by position in the filtered or paged slice.
///
/// # Example
///
/// ```
/// use fleet_table::{TableRow, Value};
///
/// #[derive(Clone)]
/// struct Vehicle {
///     id: u32,
///     plate: String,
/// }
///
/// impl TableRow for Vehicle {
///     type Key = u32;
///
///     fn key(&self) -> u32 {
///         self.id
///     }
///
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "id" => Some(self.id.into()),
///             "plate" => Some(self.plate.as_str().into()),
///             _ => None,
///         }
///     }
///
///     fn values(&self) -> Vec<Value> {
///         vec![self.id.into(), self.plate.as_str().into()]
///     }
/// }
/// ```
pub trait TableRow {
    /// The key type used to identify this row.
    type Key: Clone + Eq + Hash + fmt::Display + fmt::Debug;

    /// Return the stable unique key for this row.
    fn key(&self) -> Self::Key;

    /// Return the value of a named field, if the row has it.
    fn field(&self, name: &str) -> Option<Value>;

    /// Return every field value of the row. Search runs over these.
    fn values(&self) -> Vec<Value>;
}

// =============================================================================
// Record
// =============================================================================

/// Identifier of a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id carried by a field value: a non-empty string or an integer.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self::new(s.clone())),
            Value::Int(n) => Some(Self::from(*n)),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// A dynamic row: an identifier plus named field values.
///
/// # Example
///
/// ```
/// use fleet_table::Record;
///
/// let record = Record::new(7)
///     .set("name", "Ford Ranger")
///     .set("status", "good");
///
/// assert_eq!(record.get("name").and_then(|v| v.as_str()), Some("Ford Ranger"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: BTreeMap<String, Value>,
    synthetic: bool,
}

impl Record {
    /// Creates a new empty record with the given id.
    ///
    /// The id is also stored as the `id` field so it can be shown and searched
    /// like any other field.
    pub fn new(id: impl Into<RecordId>) -> Self {
        let id = id.into();
        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), Value::from(id.as_str()));
        Self {
            id,
            fields,
            synthetic: false,
        }
    }

    /// Builds a record from a JSON object.
    ///
    /// The `id` field is used when it is a string or an integer. Otherwise the
    /// record gets `#<ordinal>` as a synthetic id. The synthetic id is
    /// assigned once, when the data arrives, so it stays attached to the same
    /// record through search, sort and pagination. It only identifies the
    /// record within this load; see [`is_synthetic`](Self::is_synthetic).
    pub fn from_json(json: serde_json::Value, ordinal: usize) -> Self {
        let mut fields: BTreeMap<String, Value> = match json {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect(),
            other => {
                warn!("Record {} is not a JSON object, storing it as `value`", ordinal);
                BTreeMap::from([("value".to_string(), Value::from(other))])
            }
        };

        if let Some(id) = fields.get("id").and_then(RecordId::from_value) {
            return Self {
                id,
                fields,
                synthetic: false,
            };
        }

        let id = RecordId::new(format!("#{}", ordinal));
        warn!("Record {} has no usable id, assigned {}", ordinal, id);
        fields.insert("id".to_string(), Value::from(id.as_str()));
        Self {
            id,
            fields,
            synthetic: true,
        }
    }

    /// Returns the record id.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// `true` when the id was assigned at load time rather than read from the
    /// data. Such an id means nothing to the backend.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Sets a field value (builder style).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field value in place.
    ///
    /// Setting `id` to a string or integer also changes the record's key.
    /// Any other `id` value is ignored so that the field and the key never
    /// disagree.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();

        if field == "id" {
            let Some(id) = RecordId::from_value(&value) else {
                warn!("Ignoring unusable id {:?} for record {}", value, self.id);
                return;
            };
            self.id = id;
            self.synthetic = false;
        }
        self.fields.insert(field, value);
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Iterates over all fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TableRow for Record {
    type Key = RecordId;

    fn key(&self) -> RecordId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn values(&self) -> Vec<Value> {
        self.fields.values().cloned().collect()
    }
}
