//! Column descriptor derivation
//!
//! [`derive`] maps one [`ColumnRecord`] to its [`ColumnDescriptor`] and, for
//! `id`-typed columns other than the primary key, a [`ReferenceFact`].
//! It is pure: the caller decides where the fact goes.

use super::column_type::ColumnType;
use super::inflect::pluralize;
use super::options::{ColumnOptions, USERS};
use super::{is_hidden, ColumnDescriptor, ColumnRecord, ReferenceFact};

/// Integer digits of a float/double when the type details do not say
const DEFAULT_PRECISION: i64 = 8;
/// Decimal digits of a float/double when the type details do not say
const DEFAULT_SCALE: i64 = 0;
/// Widest precision or scale accepted from type details (MySQL's DECIMAL limit).
/// Values outside `0..=MAX_DIGITS` fall back to the defaults.
const MAX_DIGITS: i64 = 65;

/// Derive the descriptor of `record`, a column of `table_name`
pub fn derive(
    table_name: &str,
    record: &ColumnRecord,
) -> (ColumnDescriptor, Option<ReferenceFact>) {
    let column_type = ColumnType::parse(&record.column_type);
    let options = ColumnOptions::parse(&record.options);
    let details = TypeDetails::new(&record.type_details);
    let hidden = is_hidden(&record.name);

    let target = record.is_reference().then(|| reference_target(&record.name, &options));

    let db_type = match &target {
        Some(_) => format!("foreignId{}", options.nullable_suffix()),
        None => storage_type(&column_type, &record.type_details, &options),
    };

    let (html_type, validations) = if hidden {
        (String::new(), String::new())
    } else {
        // visible `id` columns are always references
        (
            column_type.html_type().to_string(),
            validation_rules(&column_type, &details, &options, target.as_deref()).join("|"),
        )
    };

    log::debug!("{}.{}: dbType={} validations={}", table_name, record.name, db_type, validations);

    let reference = target.map(|referenced_table| ReferenceFact {
        column_name: record.name.clone(),
        referenced_table,
        source_options: record.options.clone(),
    });

    let descriptor = ColumnDescriptor {
        name: record.name.clone(),
        db_type,
        html_type,
        validations,
        searchable: !hidden,
        fillable: !hidden,
        primary: record.name == "id",
        in_form: !hidden,
        in_index: !hidden,
        in_view: !hidden,
    };

    (descriptor, reference)
}

/// Table a reference column points at: `author_id` -> `authors`, or `users`
/// when the options say so.
pub fn reference_target(column_name: &str, options: &ColumnOptions) -> String {
    if options.force_users_reference {
        return USERS.to_string();
    }
    let stem = column_name.strip_suffix("_id").unwrap_or(column_name);
    pluralize(stem)
}

/// `type[,details][:nullable]`
fn storage_type(column_type: &ColumnType, type_details: &str, options: &ColumnOptions) -> String {
    let mut db_type = column_type.as_str().to_string();
    if !type_details.is_empty() {
        db_type.push(',');
        db_type.push_str(type_details);
    }
    db_type.push_str(options.nullable_suffix());
    db_type
}

fn validation_rules(
    column_type: &ColumnType,
    details: &TypeDetails<'_>,
    options: &ColumnOptions,
    exists_table: Option<&str>,
) -> Vec<String> {
    let mut rules = vec![if options.nullable { "nullable" } else { "required" }.to_string()];
    rules.extend(options.literal_rules.iter().cloned());

    match column_type {
        ColumnType::String => {
            rules.push("min:3".to_string());
            if let Some(max) = details.param(0) {
                rules.push(format!("max:{}", max));
            }
        }
        t if t.is_decimal() => {
            let precision = digit_count(details.param(0)).unwrap_or(DEFAULT_PRECISION);
            let scale = digit_count(details.param(1)).unwrap_or(DEFAULT_SCALE);
            rules.push("min:0".to_string());
            rules.push(format!("max:{}", decimal_mask(precision, scale)));
        }
        t if t.is_temporal() => rules.push("date".to_string()),
        _ => {}
    }

    if let Some(table) = exists_table {
        rules.push(format!("exists:{},id", table));
    }

    rules
}

/// Largest value a `(precision, scale)` decimal column accepts, written as
/// nines: `(8, 2)` -> `99999.99`. A non-positive integer run stays empty.
fn decimal_mask(precision: i64, scale: i64) -> String {
    let int_run = precision.saturating_sub(scale).saturating_sub(1);
    let int_digits = usize::try_from(int_run).unwrap_or(0);
    let dec_digits = usize::try_from(scale).unwrap_or(0);
    format!("{}.{}", "9".repeat(int_digits), "9".repeat(dec_digits))
}

/// Precision or scale parameter, `None` when absent or outside `0..=MAX_DIGITS`
fn digit_count(param: Option<&str>) -> Option<i64> {
    param.map(leading_int).filter(|digits| (0..=MAX_DIGITS).contains(digits))
}

/// Leading integer of `value`, `0` when there is none (`"8abc"` -> 8)
fn leading_int(value: &str) -> i64 {
    let value = value.trim();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

/// Positional access to the comma-separated type details
struct TypeDetails<'a> {
    params: Vec<&'a str>,
}

impl<'a> TypeDetails<'a> {
    fn new(raw: &'a str) -> Self {
        let params = if raw.trim().is_empty() { Vec::new() } else { raw.split(',').collect() };
        Self { params }
    }

    fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).map(|p| p.trim()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive_one(record: ColumnRecord) -> (ColumnDescriptor, Option<ReferenceFact>) {
        derive("posts", &record)
    }

    #[test]
    fn test_primary_key_is_hidden() {
        let (descriptor, reference) = derive_one(ColumnRecord::new("id", "id"));

        assert!(descriptor.primary);
        assert_eq!(descriptor.db_type, "id");
        assert_eq!(descriptor.html_type, "");
        assert_eq!(descriptor.validations, "");
        assert!(!descriptor.searchable);
        assert!(!descriptor.fillable);
        assert!(!descriptor.in_form);
        assert!(!descriptor.in_index);
        assert!(!descriptor.in_view);
        assert!(reference.is_none());
    }

    #[test]
    fn test_hidden_timestamps_have_no_form_fields() {
        for name in ["created_at", "updated_at", "deleted_at"] {
            for declared in ["timestamp", "string", "date", "float"] {
                let record =
                    ColumnRecord::new(name, declared).with_details("10").with_options("nullable");
                let (descriptor, _) = derive_one(record);
                assert_eq!(descriptor.html_type, "", "{name} as {declared}");
                assert_eq!(descriptor.validations, "", "{name} as {declared}");
                assert!(!descriptor.primary);
                assert!(!descriptor.in_view);
            }
        }
    }

    #[test]
    fn test_reference_column() {
        let (descriptor, reference) = derive_one(ColumnRecord::new("author_id", "id"));

        assert_eq!(descriptor.db_type, "foreignId");
        assert_eq!(descriptor.html_type, "select");
        assert_eq!(descriptor.validations, "required|exists:authors,id");
        assert!(!descriptor.primary);
        assert!(descriptor.fillable);

        let reference = reference.expect("reference fact");
        assert_eq!(reference.column_name, "author_id");
        assert_eq!(reference.referenced_table, "authors");
        assert_eq!(reference.source_options, "");
    }

    #[test]
    fn test_nullable_reference() {
        let (descriptor, reference) =
            derive_one(ColumnRecord::new("category_id", "id").with_options("nullable"));

        assert_eq!(descriptor.db_type, "foreignId:nullable");
        assert_eq!(descriptor.validations, "nullable|exists:categories,id");
        let reference = reference.unwrap();
        assert_eq!(reference.referenced_table, "categories");
        assert_eq!(reference.source_options, "nullable");
    }

    #[test]
    fn test_users_option_forces_users_table() {
        let record = ColumnRecord::new("owner_id", "id").with_options("users|nullable");
        let (descriptor, reference) = derive_one(record);

        assert_eq!(descriptor.db_type, "foreignId:nullable");
        assert!(descriptor.validations.starts_with("nullable"));
        assert!(descriptor.validations.ends_with("exists:users,id"));
        assert_eq!(reference.unwrap().referenced_table, "users");
    }

    #[test]
    fn test_nullable_suffix_and_first_token() {
        let (nullable, _) = derive_one(ColumnRecord::new("bio", "text").with_options("nullable"));
        assert_eq!(nullable.db_type, "text:nullable");
        assert_eq!(nullable.validations.split('|').next(), Some("nullable"));

        let (required, _) = derive_one(ColumnRecord::new("bio", "text"));
        assert_eq!(required.db_type, "text");
        assert_eq!(required.validations.split('|').next(), Some("required"));
        assert!(!required.db_type.ends_with(":nullable"));
    }

    #[test]
    fn test_string_length_rules() {
        let (descriptor, _) = derive_one(ColumnRecord::new("code", "string").with_details("5"));
        assert_eq!(descriptor.db_type, "string,5");
        assert_eq!(descriptor.html_type, "text");
        assert_eq!(descriptor.validations, "required|min:3|max:5");

        let (descriptor, _) = derive_one(ColumnRecord::new("code", "string"));
        assert_eq!(descriptor.db_type, "string");
        assert_eq!(descriptor.validations, "required|min:3");
    }

    #[test]
    fn test_float_mask() {
        let (descriptor, _) = derive_one(ColumnRecord::new("price", "float").with_details("8,2"));
        assert_eq!(descriptor.db_type, "float,8,2");
        assert_eq!(descriptor.html_type, "number");
        assert_eq!(descriptor.validations, "required|min:0|max:99999.99");
    }

    #[test]
    fn test_float_defaults() {
        let (descriptor, _) = derive_one(ColumnRecord::new("ratio", "double"));
        assert_eq!(descriptor.validations, "required|min:0|max:9999999.");

        let (descriptor, _) = derive_one(ColumnRecord::new("ratio", "double").with_details("4"));
        assert_eq!(descriptor.validations, "required|min:0|max:999.");
    }

    #[test]
    fn test_float_mask_with_empty_integer_run() {
        let (descriptor, _) = derive_one(ColumnRecord::new("rate", "float").with_details("2,2"));
        assert_eq!(descriptor.validations, "required|min:0|max:.99");

        let (descriptor, _) = derive_one(ColumnRecord::new("rate", "float").with_details("3,2"));
        assert_eq!(descriptor.validations, "required|min:0|max:.99");
    }

    #[test]
    fn test_temporal_rules() {
        for declared in ["date", "datetime", "timestamp"] {
            let (descriptor, _) = derive_one(ColumnRecord::new("published_at", declared));
            assert_eq!(descriptor.html_type, "date");
            assert_eq!(descriptor.validations, "required|date");
        }
    }

    #[test]
    fn test_literal_rules_follow_first_token() {
        let record = ColumnRecord::new("email", "string")
            .with_details("255")
            .with_options("nullable|email|unique");
        let (descriptor, _) = derive_one(record);

        assert_eq!(descriptor.db_type, "string,255:nullable");
        assert_eq!(descriptor.validations, "nullable|email|unique|min:3|max:255");
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let record = ColumnRecord::new("payload", "json").with_details("x").with_options("nullable");
        let (descriptor, reference) = derive_one(record);

        assert_eq!(descriptor.db_type, "json,x:nullable");
        assert_eq!(descriptor.html_type, "");
        assert_eq!(descriptor.validations, "nullable");
        assert!(reference.is_none());
    }

    #[test]
    fn test_simple_types() {
        let (boolean, _) = derive_one(ColumnRecord::new("published", "boolean"));
        assert_eq!(boolean.html_type, "checkbox");
        assert_eq!(boolean.validations, "required");

        let (integer, _) = derive_one(ColumnRecord::new("views", "integer"));
        assert_eq!(integer.html_type, "number");
        assert_eq!(integer.db_type, "integer");

        let (select, _) =
            derive_one(ColumnRecord::new("state", "select").with_details("draft,live"));
        assert_eq!(select.html_type, "select");
        assert_eq!(select.db_type, "select,draft,live");
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("8"), 8);
        assert_eq!(leading_int(" 12abc"), 12);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int("-3"), -3);
        assert_eq!(leading_int("99999999999999999999"), 0);
    }

    #[test]
    fn test_out_of_range_float_details_use_defaults() {
        for details in ["9223372036854775807,-9223372036854775807", "9223372036854775807"] {
            let (descriptor, _) =
                derive_one(ColumnRecord::new("price", "float").with_details(details));
            assert_eq!(descriptor.validations, "required|min:0|max:9999999.", "{}", details);
        }

        let (descriptor, _) = derive_one(ColumnRecord::new("price", "float").with_details("66,2"));
        assert_eq!(descriptor.validations, "required|min:0|max:99999.99");

        let (descriptor, _) = derive_one(ColumnRecord::new("price", "double").with_details("10,-4"));
        assert_eq!(descriptor.validations, "required|min:0|max:999999999.");
    }

    #[test]
    fn test_widest_accepted_float() {
        let (descriptor, _) = derive_one(ColumnRecord::new("big", "double").with_details("65,30"));
        let mask = descriptor.validations.rsplit("max:").next().unwrap();
        assert_eq!(mask, format!("{}.{}", "9".repeat(34), "9".repeat(30)));
    }
}
