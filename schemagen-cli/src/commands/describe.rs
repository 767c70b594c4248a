use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use schemagen_core::schema::{derive, ColumnRecord};

#[derive(Args, Debug, Clone)]
pub struct DescribeArgs {
    /// Column name
    #[arg(long)]
    pub name: String,

    /// Declared type (id, string, float, ...)
    #[arg(long = "type")]
    pub column_type: String,

    /// Comma-separated type parameters, e.g. "8,2"
    #[arg(long, default_value = "")]
    pub details: String,

    /// Options: nullable, users, or literal validation rules
    #[arg(long, default_value = "")]
    pub options: String,

    /// Owning table
    #[arg(long, default_value = "table")]
    pub table: String,
}

/// Print `{"descriptor": ..., "reference": ...}` for one column.
pub fn run(args: &DescribeArgs, out: &mut impl Write) -> Result<()> {
    let record = ColumnRecord::new(args.name.as_str(), args.column_type.as_str())
        .with_details(args.details.as_str())
        .with_options(args.options.as_str());

    let (descriptor, reference) = derive(&args.table, &record);
    let body = json!({ "descriptor": descriptor, "reference": reference });

    writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(name: &str, column_type: &str, details: &str, options: &str) -> serde_json::Value {
        let args = DescribeArgs {
            name: name.to_string(),
            column_type: column_type.to_string(),
            details: details.to_string(),
            options: options.to_string(),
            table: "posts".to_string(),
        };
        let mut out = Vec::new();
        run(&args, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn describes_reference_column() {
        let value = describe("author_id", "id", "", "");

        assert_eq!(value["descriptor"]["dbType"], "foreignId");
        assert_eq!(value["descriptor"]["validations"], "required|exists:authors,id");
        assert_eq!(value["reference"]["referenced_table"], "authors");
    }

    #[test]
    fn describes_plain_column() {
        let value = describe("price", "float", "8,2", "nullable");

        assert_eq!(value["descriptor"]["validations"], "nullable|min:0|max:99999.99");
        assert!(value["reference"].is_null());
    }
}
