//! Filter records: the declarative input of the predicate encoder.
//!
//! A filter is a [`Record`] of named [`Field`]s. Each field carries a
//! [`Value`], an optional `bq` annotation (see [`FieldOptions`](crate::FieldOptions))
//! and, for time ranges, an optional timestamp format.
//!
//! Filter types usually implement [`FilterRecord`] once:
//!
//! ```ignore
//! struct DocumentFilter {
//!     namespace: String,
//!     created_at: Option<TimeRange>,
//!     owners: Vec<String>,
//! }
//!
//! impl FilterRecord for DocumentFilter {
//!     fn to_record(&self) -> Record {
//!         Record::new()
//!             .field(Field::new("Namespace", self.namespace.as_str()).tag(",omitempty"))
//!             .field(Field::new("CreatedAt", self.created_at).tag(",omitempty"))
//!             .field(Field::new("Owners", self.owners.clone()).tag("Owner,omitempty"))
//!     }
//! }
//! ```

use crate::params::ParamValue;
use crate::time_range::TimeRange;

/// The shape of a filter field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// A sequence of scalars.
    List(Vec<Value>),
    TimeRange(TimeRange),
    /// A nested record. Only valid as the top-level filter.
    Record(Record),
    /// A value that may be absent.
    Optional(Option<Box<Value>>),
}

impl Value {
    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::List(_) => "list",
            Self::TimeRange(_) => "time range",
            Self::Record(_) => "record",
            Self::Optional(Some(_)) => "optional",
            Self::Optional(None) => "absent optional",
        }
    }

    /// Whether this is the zero value of its shape.
    ///
    /// A present optional is never zero, even when the value inside is.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::String(s) => s.is_empty(),
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
            Self::Float(x) => *x == 0.0,
            Self::List(items) => items.is_empty(),
            Self::TimeRange(range) => range.is_zero(),
            Self::Record(record) => record.fields.iter().all(|f| f.value.is_zero()),
            Self::Optional(inner) => inner.is_none(),
        }
    }

    /// Convert a list element into a parameter value.
    pub(crate) fn as_param(&self) -> Option<ParamValue> {
        match self {
            Self::String(s) => Some(ParamValue::String(s.clone())),
            Self::Bool(b) => Some(ParamValue::Bool(*b)),
            Self::Int(i) => Some(ParamValue::Int(*i)),
            Self::Float(x) => Some(ParamValue::Float(*x)),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<TimeRange> for Value {
    fn from(value: TimeRange) -> Self {
        Self::TimeRange(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Self::Optional(value.map(|v| Box::new(v.into())))
    }
}

/// One named field of a filter record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
    /// The `bq` annotation, e.g. `Owner,omitempty`.
    pub tag: Option<String>,
    /// Timestamp format description for time range fields.
    pub format: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            tag: None,
            format: None,
        }
    }

    /// Set the `bq` annotation.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the timestamp format, e.g. `[year]-[month]-[day]`.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// An ordered list of filter fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, keeping declaration order.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<Field> for Record {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A type that describes itself as a filter record.
pub trait FilterRecord {
    fn to_record(&self) -> Record;
}

impl FilterRecord for Record {
    fn to_record(&self) -> Record {
        self.clone()
    }
}
