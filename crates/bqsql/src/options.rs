//! Field annotation parsing.
//!
//! A field's `bq` annotation is a comma-separated directive list:
//!
//! ```text
//! "Owner,omitempty"   -> column Owner, skipped when empty
//! ",unnest,omitempty" -> keeps the field name, matched through UNNEST
//! ```
//!
//! The first token renames the column (empty keeps the field name). Unknown
//! directives are ignored.

/// Encoding options of a single filter field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Column name override.
    pub name: Option<String>,
    /// Skip the field when its value is zero.
    pub omit_empty: bool,
    /// The column is an array of scalars; match any element.
    pub unnest: bool,
}

impl FieldOptions {
    /// Parse a `bq` annotation.
    pub fn parse(tag: &str) -> Self {
        let mut options = Self::default();
        if tag.is_empty() {
            return options;
        }

        let mut parts = tag.split(',');
        if let Some(name) = parts.next().filter(|name| !name.is_empty()) {
            options.name = Some(name.to_string());
        }

        for directive in parts {
            match directive {
                "omitempty" => options.omit_empty = true,
                "unnest" => options.unnest = true,
                _ => {}
            }
        }
        options
    }

    /// Column name for a field, honouring the override.
    pub fn column_name<'a>(&'a self, field_name: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(field_name)
    }
}
