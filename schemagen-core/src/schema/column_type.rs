//! Declared column types

use std::fmt;

/// The declared type vocabulary of `schema_columns.type`.
///
/// Anything outside the vocabulary is kept verbatim in [`ColumnType::Other`]
/// and passes through as the storage type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Id,
    String,
    Text,
    Integer,
    Float,
    Double,
    Boolean,
    Date,
    DateTime,
    Timestamp,
    Select,
    Other(String),
}

impl ColumnType {
    pub fn parse(declared: &str) -> Self {
        match declared {
            "id" => ColumnType::Id,
            "string" => ColumnType::String,
            "text" => ColumnType::Text,
            "integer" => ColumnType::Integer,
            "float" => ColumnType::Float,
            "double" => ColumnType::Double,
            "boolean" => ColumnType::Boolean,
            "date" => ColumnType::Date,
            "datetime" => ColumnType::DateTime,
            "timestamp" => ColumnType::Timestamp,
            "select" => ColumnType::Select,
            other => ColumnType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Id => "id",
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Select => "select",
            ColumnType::Other(other) => other,
        }
    }

    /// Form widget hint for this type, empty when there is none
    pub fn html_type(&self) -> &'static str {
        match self {
            ColumnType::Id | ColumnType::Select => "select",
            ColumnType::String => "text",
            ColumnType::Text => "textarea",
            ColumnType::Integer | ColumnType::Double | ColumnType::Float => "number",
            ColumnType::Boolean => "checkbox",
            ColumnType::Date | ColumnType::DateTime | ColumnType::Timestamp => "date",
            ColumnType::Other(_) => "",
        }
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Double)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::DateTime | ColumnType::Timestamp)
    }
}

impl From<&str> for ColumnType {
    fn from(declared: &str) -> Self {
        ColumnType::parse(declared)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_type_mapping() {
        let cases = [
            ("id", "select"),
            ("string", "text"),
            ("text", "textarea"),
            ("integer", "number"),
            ("double", "number"),
            ("float", "number"),
            ("boolean", "checkbox"),
            ("date", "date"),
            ("datetime", "date"),
            ("timestamp", "date"),
            ("select", "select"),
            ("json", ""),
            ("", ""),
        ];

        for (declared, expected) in cases {
            assert_eq!(ColumnType::parse(declared).html_type(), expected, "type {declared:?}");
        }
    }

    #[test]
    fn test_unknown_type_round_trips_verbatim() {
        let column_type = ColumnType::parse("unsignedBigInteger");
        assert_eq!(column_type, ColumnType::Other("unsignedBigInteger".to_string()));
        assert_eq!(column_type.as_str(), "unsignedBigInteger");
    }

    #[test]
    fn test_declared_types_are_case_sensitive() {
        assert_eq!(ColumnType::parse("String"), ColumnType::Other("String".to_string()));
    }
}
