//! Foreign-key migration stubs
//!
//! Every table with at least one [`ReferenceFact`] gets one migration: an
//! `up` block adding each foreign key and a `down` block dropping them again,
//! both in reference order, substituted into a PHP migration template.
//!
//! # Template
//!
//! A template is any text containing the two placeholders [`UP_PLACEHOLDER`]
//! and [`DOWN_PLACEHOLDER`]. The built-in one is an anonymous Laravel
//! migration class.

use std::path::Path;

use chrono::{DateTime, TimeZone};

use crate::schema::inflect::{pluralize, snake_case};
use crate::schema::{ReferenceFact, ReferenceMap, TableReferences};
use crate::{Error, Result};

pub const UP_PLACEHOLDER: &str = "XXXX-UP-XXXX";
pub const DOWN_PLACEHOLDER: &str = "XXXX-DOWN-XXXX";

const BUILTIN_TEMPLATE: &str = include_str!("templates/migration_stub.tmpl");

/// Default directory, relative to the artifact root
pub const DEFAULT_DIRECTORY: &str = "migrations/references";

/// Indentation of the `Schema::table` closing line inside the template
const BLOCK_INDENT: &str = "        ";
/// Indentation of statements inside the closure
const STATEMENT_INDENT: &str = "            ";

/// A validated migration template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationTemplate {
    content: String,
}

impl MigrationTemplate {
    /// The template shipped with schemagen
    pub fn builtin() -> Self {
        Self { content: BUILTIN_TEMPLATE.to_string() }
    }

    /// Check that `content` carries both placeholders
    pub fn parse(content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        for placeholder in [UP_PLACEHOLDER, DOWN_PLACEHOLDER] {
            if !content.contains(placeholder) {
                return Err(Error::Template(format!("missing placeholder {}", placeholder)));
            }
        }
        Ok(Self { content })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Template(format!("cannot read template {}: {}", path.display(), e))
        })?;
        Self::parse(content).map_err(|e| Error::Template(format!("{} ({})", e, path.display())))
    }

    pub fn render(&self, up: &str, down: &str) -> String {
        self.content.replace(UP_PLACEHOLDER, up).replace(DOWN_PLACEHOLDER, down)
    }
}

impl Default for MigrationTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

/// What happens to referencing rows when the referenced row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
}

impl OnDelete {
    /// Every reference cascades. With `set_null_on_nullable`, nullable
    /// references are cleared instead.
    pub fn for_reference(reference: &ReferenceFact, set_null_on_nullable: bool) -> Self {
        if set_null_on_nullable && reference.options().nullable {
            OnDelete::SetNull
        } else {
            OnDelete::Cascade
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "cascade",
            OnDelete::SetNull => "set null",
        }
    }
}

/// Naming and statement options for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Emit `->onDelete(...)` on every foreign key
    pub cascade_deletes: bool,
    /// Use `set null` instead of `cascade` for nullable references
    pub set_null_on_nullable: bool,
    /// File name prefix shared by every stub of the run
    pub timestamp: String,
    /// Directory of the stubs, relative to the artifact root
    pub directory: String,
}

impl MigrationOptions {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            cascade_deletes: true,
            set_null_on_nullable: false,
            timestamp: timestamp.into(),
            directory: DEFAULT_DIRECTORY.to_string(),
        }
    }

    /// Options stamped with `now`, formatted the way Laravel names migrations
    pub fn stamped<Tz: TimeZone>(now: DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self::new(format_timestamp(now))
    }
}

/// `2024_03_05_141500`
pub fn format_timestamp<Tz: TimeZone>(now: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y_%m_%d_%H%M%S").to_string()
}

/// One rendered migration artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStub {
    /// Table whose columns hold the references
    pub table: String,
    /// Name used inside the migration: snake_case plural of `table`
    pub migration_table: String,
    pub path: String,
    pub up: String,
    pub down: String,
    pub contents: String,
}

/// Turns a [`ReferenceMap`] into migration stubs
#[derive(Debug, Clone)]
pub struct MigrationAssembler {
    template: MigrationTemplate,
    options: MigrationOptions,
}

impl MigrationAssembler {
    pub fn new(template: MigrationTemplate, options: MigrationOptions) -> Self {
        Self { template, options }
    }

    pub fn options(&self) -> &MigrationOptions {
        &self.options
    }

    /// One stub per migration table, in the map's table order.
    ///
    /// Tables whose names inflect to the same migration table (`post` and
    /// `posts`) share one stub, so no stub path is written twice.
    pub fn assemble(&self, references: &ReferenceMap) -> Vec<MigrationStub> {
        let mut merged: Vec<(String, TableReferences)> = Vec::new();
        for entry in references.iter().filter(|entry| !entry.references.is_empty()) {
            let migration_table = migration_table_name(&entry.table);
            match merged.iter_mut().find(|(name, _)| *name == migration_table) {
                Some((_, existing)) => {
                    log::warn!(
                        "Tables '{}' and '{}' both migrate '{}'; merging their foreign keys",
                        existing.table,
                        entry.table,
                        migration_table
                    );
                    existing.references.extend(entry.references.iter().cloned());
                }
                None => merged.push((migration_table, entry.clone())),
            }
        }

        merged.iter().map(|(_, entry)| self.assemble_table(entry)).collect()
    }

    pub fn assemble_table(&self, entry: &TableReferences) -> MigrationStub {
        let migration_table = migration_table_name(&entry.table);
        let up = up_block(&migration_table, &entry.references, &self.options);
        let down = down_block(&migration_table, &entry.references);
        let contents = self.template.render(&up, &down);
        let path = format!(
            "{}/{}_add_references_to_{}_table.php",
            self.options.directory.trim_end_matches('/'),
            self.options.timestamp,
            migration_table
        );

        MigrationStub { table: entry.table.clone(), migration_table, path, up, down, contents }
    }
}

/// `BlogPost` -> `blog_posts`
pub fn migration_table_name(table: &str) -> String {
    snake_case(&pluralize(table))
}

/// `Schema::table` block adding one foreign key per reference
pub fn up_block(
    migration_table: &str,
    references: &[ReferenceFact],
    options: &MigrationOptions,
) -> String {
    let statements = references.iter().map(|reference| {
        let on_delete = if options.cascade_deletes {
            let action = OnDelete::for_reference(reference, options.set_null_on_nullable);
            format!("->onDelete('{}')", action.as_str())
        } else {
            String::new()
        };
        format!(
            "$table->foreign('{}')->references('id')->on('{}'){};",
            reference.column_name, reference.referenced_table, on_delete
        )
    });
    schema_table_block(migration_table, statements)
}

/// `Schema::table` block dropping the foreign keys again, same order
pub fn down_block(migration_table: &str, references: &[ReferenceFact]) -> String {
    let statements = references
        .iter()
        .map(|reference| format!("$table->dropForeign(['{}']);", reference.column_name));
    schema_table_block(migration_table, statements)
}

fn schema_table_block(migration_table: &str, statements: impl Iterator<Item = String>) -> String {
    let mut block = format!("Schema::table('{}', function (Blueprint $table) {{", migration_table);
    for statement in statements {
        block.push('\n');
        block.push_str(STATEMENT_INDENT);
        block.push_str(&statement);
    }
    block.push('\n');
    block.push_str(BLOCK_INDENT);
    block.push_str("});");
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reference(column: &str, table: &str, options: &str) -> ReferenceFact {
        ReferenceFact {
            column_name: column.to_string(),
            referenced_table: table.to_string(),
            source_options: options.to_string(),
        }
    }

    fn assembler() -> MigrationAssembler {
        MigrationAssembler::new(
            MigrationTemplate::builtin(),
            MigrationOptions::new("2024_01_01_000000"),
        )
    }

    #[test]
    fn test_builtin_template_is_valid() {
        assert!(MigrationTemplate::parse(BUILTIN_TEMPLATE).is_ok());
    }

    #[test]
    fn test_template_without_placeholders_is_rejected() {
        let err = MigrationTemplate::parse("<?php // XXXX-UP-XXXX only").unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(err.to_string().contains(DOWN_PLACEHOLDER));
    }

    #[test]
    fn test_missing_template_file_is_a_template_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = MigrationTemplate::from_file(tmp.path().join("missing.stub")).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[test]
    fn test_single_reference_blocks() {
        let mut map = ReferenceMap::new();
        map.record("posts", reference("author_id", "authors", ""));

        let stubs = assembler().assemble(&map);
        assert_eq!(stubs.len(), 1);
        let stub = &stubs[0];

        assert_eq!(
            stub.up,
            "Schema::table('posts', function (Blueprint $table) {\n            \
             $table->foreign('author_id')->references('id')->on('authors')->onDelete('cascade');\n        });"
        );
        assert_eq!(
            stub.down,
            "Schema::table('posts', function (Blueprint $table) {\n            \
             $table->dropForeign(['author_id']);\n        });"
        );
        assert_eq!(stub.up.matches("->foreign(").count(), 1);
        assert_eq!(stub.down.matches("dropForeign").count(), 1);
        assert_eq!(
            stub.path,
            "migrations/references/2024_01_01_000000_add_references_to_posts_table.php"
        );
        assert!(stub.contents.contains(&stub.up));
        assert!(stub.contents.contains(&stub.down));
        assert!(!stub.contents.contains(UP_PLACEHOLDER));
        assert!(!stub.contents.contains(DOWN_PLACEHOLDER));
    }

    #[test]
    fn test_statement_order_follows_references() {
        let references = vec![
            reference("a_id", "as", ""),
            reference("b_id", "bs", ""),
            reference("c_id", "cs", ""),
        ];

        let up = up_block("links", &references, &MigrationOptions::new("ts"));
        let down = down_block("links", &references);

        let up_positions: Vec<usize> =
            ["'a_id'", "'b_id'", "'c_id'"].iter().map(|c| up.find(c).unwrap()).collect();
        let down_positions: Vec<usize> =
            ["'a_id'", "'b_id'", "'c_id'"].iter().map(|c| down.find(c).unwrap()).collect();
        assert!(up_positions.windows(2).all(|w| w[0] < w[1]));
        assert!(down_positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_nullable_reference_cascades_by_default() {
        let editor = [reference("editor_id", "users", "users|nullable")];

        let up = up_block("posts", &editor, &MigrationOptions::new("ts"));
        assert!(up.contains("->on('users')->onDelete('cascade');"));

        let mut options = MigrationOptions::new("ts");
        options.set_null_on_nullable = true;
        let up = up_block("posts", &editor, &options);
        assert!(up.contains("->on('users')->onDelete('set null');"));

        let author = [reference("author_id", "authors", "")];
        assert!(up_block("posts", &author, &options).contains("->onDelete('cascade');"));
    }

    #[test]
    fn test_cascade_can_be_disabled() {
        let mut options = MigrationOptions::new("ts");
        options.cascade_deletes = false;
        let up = up_block("posts", &[reference("author_id", "authors", "")], &options);
        assert!(up.contains("->on('authors');"));
        assert!(!up.contains("onDelete"));
    }

    #[test]
    fn test_tables_sharing_a_migration_table_are_merged() {
        let mut map = ReferenceMap::new();
        map.record("post", reference("author_id", "authors", ""));
        map.record("comments", reference("post_id", "posts", ""));
        map.record("posts", reference("editor_id", "users", "users"));

        let stubs = assembler().assemble(&map);
        let paths: Vec<&str> = stubs.iter().map(|stub| stub.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "migrations/references/2024_01_01_000000_add_references_to_posts_table.php",
                "migrations/references/2024_01_01_000000_add_references_to_comments_table.php",
            ]
        );

        let posts = &stubs[0];
        let author = posts.up.find("foreign('author_id')").unwrap();
        let editor = posts.up.find("foreign('editor_id')").unwrap();
        assert!(author < editor);
        assert_eq!(posts.down.matches("dropForeign").count(), 2);
    }

    #[test]
    fn test_migration_table_name_is_snake_plural() {
        assert_eq!(migration_table_name("posts"), "posts");
        assert_eq!(migration_table_name("category"), "categories");
        assert_eq!(migration_table_name("BlogPost"), "blog_posts");
    }

    #[test]
    fn test_custom_directory_and_template() {
        let template = MigrationTemplate::parse("UP:XXXX-UP-XXXX\nDOWN:XXXX-DOWN-XXXX").unwrap();
        let mut options = MigrationOptions::new("ts");
        options.directory = "db/fk/".to_string();

        let mut map = ReferenceMap::new();
        map.record("comments", reference("post_id", "posts", ""));
        let stub = MigrationAssembler::new(template, options).assemble(&map).remove(0);

        assert_eq!(stub.path, "db/fk/ts_add_references_to_comments_table.php");
        assert!(stub.contents.starts_with("UP:Schema::table('comments'"));
    }

    #[test]
    fn test_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 15, 0).unwrap();
        assert_eq!(format_timestamp(now), "2024_03_05_141500");
    }
}
