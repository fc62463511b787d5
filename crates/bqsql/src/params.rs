//! Named query parameters and the naming scheme used to bind them.
//!
//! Names are positional and deterministic so one record never produces two
//! parameters with the same name:
//!
//! - string field `Namespace` -> `Namespace`
//! - list field `Owner` -> `Owner0`, `Owner1`, ...
//! - time range field `CreatedAt` -> `CreatedAtFrom`, `CreatedAtTo`

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar value bound to a named parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// A named parameter referenced as `@name` in a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: ParamValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Append a named parameter to a parameter list.
pub fn append_param(params: &mut Vec<Parameter>, name: impl Into<String>, value: impl Into<ParamValue>) {
    params.push(Parameter::new(name, value));
}

/// Placeholder for a parameter inside a predicate: `@name`.
pub fn placeholder(name: &str) -> String {
    format!("@{name}")
}

/// Parameter name for the element at `index` of a list column.
pub fn element_param_name(column: &str, index: usize) -> String {
    format!("{column}{index}")
}

/// Parameter name for the lower bound of a time range column.
pub fn range_from_param_name(column: &str) -> String {
    format!("{column}From")
}

/// Parameter name for the upper bound of a time range column.
pub fn range_to_param_name(column: &str) -> String {
    format!("{column}To")
}
