//! Nested projection and parameterized predicate builder for BigQuery SQL.
//!
//! This crate turns two declarative inputs into SQL fragments:
//!
//! - a flat list of dotted field paths (`NFe.infNFe.emit.CNPJ`) becomes a
//!   projection with `STRUCT(...)` and `ARRAY(SELECT AS STRUCT ... FROM UNNEST(...))`
//!   nesting, driven by the set of repeated columns in a [`QueryBuilderSpec`];
//! - a tagged filter [`Record`] becomes an `AND`-joined predicate plus the
//!   named [`Parameter`]s it references.
//!
//! Neither component executes anything. The caller combines the fragments with
//! the spec's template and hands the query and parameters to its client.
//!
//! # Components
//!
//! - [`build_columns_clause`] / [`ColumnsClauseBuilder`] - projection compiler
//! - [`encode_where_clause`] / [`encode_filter`] - predicate encoder
//! - [`QueryBuilderSpec`] - repeated columns and query template, loadable from TOML or JSON
//!
//! # Example
//!
//! ```ignore
//! use bqsql::{build_columns_clause, encode_where_clause, Field, QueryBuilderSpec, Record};
//!
//! let spec = QueryBuilderSpec::new("SELECT %s FROM t WHERE %s")
//!     .with_repeated("Events");
//! let columns = build_columns_clause(&spec, &["AccessKey", "Events.Date"]);
//!
//! let filter = Record::new()
//!     .field(Field::new("Namespace", "tiramissu").tag(",omitempty"))
//!     .field(Field::new("Owners", vec!["owner1", "owner2"]).tag("Owner,omitempty"));
//! let encoded = encode_where_clause(&filter.into())?;
//! ```

mod filter;
mod options;
mod params;
mod predicate;
mod projection;
mod spec;
mod time_range;

pub use filter::{Field, FilterRecord, Record, Value};
pub use options::FieldOptions;
pub use params::{
    ParamValue, Parameter, append_param, element_param_name, placeholder, range_from_param_name,
    range_to_param_name,
};
pub use predicate::{EncodedFilter, encode_filter, encode_where_clause};
pub use projection::{ColumnsClauseBuilder, build_columns_clause};
pub use spec::QueryBuilderSpec;
pub use time_range::{TimeRange, ZERO_INSTANT, format_instant};

use thiserror::Error;

/// Errors that can occur while building query fragments.
#[derive(Debug, Error)]
pub enum Error {
    /// The filter handed to the encoder is not a record.
    #[error("filter must be a record: {kind}")]
    InputKind { kind: &'static str },

    /// A field's value has no encoding rule.
    #[error("{field} is of unknown type: {kind}")]
    UnsupportedField { field: String, kind: &'static str },

    /// A nested record field that is not a time range.
    #[error("{field} struct is not supported")]
    UnsupportedStruct { field: String },

    /// `unnest` was requested on a shape that cannot be unnested.
    #[error("{field} cannot be unnested: {kind}")]
    UnsupportedUnnest { field: String, kind: &'static str },

    /// A timestamp format description could not be parsed or applied.
    #[error("Invalid time format for {field}: {message}")]
    InvalidTimeFormat { field: String, message: String },

    /// The query builder spec violates its invariants.
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    /// Reading a spec file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML spec could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A JSON spec could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new UnsupportedField error
    pub fn unsupported_field(field: impl Into<String>, kind: &'static str) -> Self {
        Self::UnsupportedField {
            field: field.into(),
            kind,
        }
    }

    /// Create a new UnsupportedStruct error
    pub fn unsupported_struct(field: impl Into<String>) -> Self {
        Self::UnsupportedStruct {
            field: field.into(),
        }
    }

    /// Create a new UnsupportedUnnest error
    pub fn unsupported_unnest(field: impl Into<String>, kind: &'static str) -> Self {
        Self::UnsupportedUnnest {
            field: field.into(),
            kind,
        }
    }

    /// Create a new InvalidTimeFormat error
    pub fn invalid_time_format(field: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidTimeFormat {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// Create a new InvalidSpec error
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec(message.into())
    }

    /// Check if this error was caused by the shape of caller input.
    ///
    /// These are the errors a caller should surface as validation failures.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputKind { .. }
                | Self::UnsupportedField { .. }
                | Self::UnsupportedStruct { .. }
                | Self::UnsupportedUnnest { .. }
                | Self::InvalidTimeFormat { .. }
        )
    }

    /// Check if this error came from loading configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSpec(_) | Self::Io(_) | Self::Toml(_) | Self::Json(_)
        )
    }
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
