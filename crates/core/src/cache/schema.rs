//! Table and column naming for the records table.
//!
//! Names come from configuration, so every statement touching the table is
//! rendered from a [`RecordSchema`] once, when the store is opened.

use crate::Error;
use crate::config::FieldNames;

/// SQLite keywords. None of them may be used as an unquoted name.
const RESERVED_WORDS: &[&str] = &[
    "ABORT", "ACTION", "ADD", "AFTER", "ALL", "ALTER", "ALWAYS", "ANALYZE", "AND", "AS", "ASC",
    "ATTACH", "AUTOINCREMENT", "BEFORE", "BEGIN", "BETWEEN", "BY", "CASCADE", "CASE", "CAST",
    "CHECK", "COLLATE", "COLUMN", "COMMIT", "CONFLICT", "CONSTRAINT", "CREATE", "CROSS", "CURRENT",
    "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "DATABASE", "DEFAULT", "DEFERRABLE",
    "DEFERRED", "DELETE", "DESC", "DETACH", "DISTINCT", "DO", "DROP", "EACH", "ELSE", "END",
    "ESCAPE", "EXCEPT", "EXCLUDE", "EXCLUSIVE", "EXISTS", "EXPLAIN", "FAIL", "FILTER", "FIRST",
    "FOLLOWING", "FOR", "FOREIGN", "FROM", "FULL", "GENERATED", "GLOB", "GROUP", "GROUPS",
    "HAVING", "IF", "IGNORE", "IMMEDIATE", "IN", "INDEX", "INDEXED", "INITIALLY", "INNER",
    "INSERT", "INSTEAD", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN", "KEY", "LAST", "LEFT",
    "LIKE", "LIMIT", "MATCH", "MATERIALIZED", "NATURAL", "NO", "NOT", "NOTHING", "NOTNULL", "NULL",
    "NULLS", "OF", "OFFSET", "ON", "OR", "ORDER", "OTHERS", "OUTER", "OVER", "PARTITION", "PLAN",
    "PRAGMA", "PRECEDING", "PRIMARY", "QUERY", "RAISE", "RANGE", "RECURSIVE", "REFERENCES",
    "REGEXP", "REINDEX", "RELEASE", "RENAME", "REPLACE", "RESTRICT", "RETURNING", "RIGHT",
    "ROLLBACK", "ROW", "ROWS", "SAVEPOINT", "SELECT", "SET", "TABLE", "TEMP", "TEMPORARY", "THEN",
    "TIES", "TO", "TRANSACTION", "TRIGGER", "UNBOUNDED", "UNION", "UNIQUE", "UPDATE", "USING",
    "VACUUM", "VALUES", "VIEW", "VIRTUAL", "WHEN", "WHERE", "WINDOW", "WITH", "WITHOUT",
];

/// Whether `name` is an SQLite keyword, ignoring ASCII case.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.iter().any(|word| word.eq_ignore_ascii_case(name))
}

/// Whether `name` can be spliced into SQL as a bare identifier.
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_reserved_word(name)
}

/// Whether the three column names differ. SQLite compares identifiers
/// without regard to ASCII case, so `url` and `URL` collide.
pub fn has_distinct_columns(fields: &FieldNames) -> bool {
    let FieldNames { url, content, created_at } = fields;
    !url.eq_ignore_ascii_case(content)
        && !url.eq_ignore_ascii_case(created_at)
        && !content.eq_ignore_ascii_case(created_at)
}

/// Validated table and column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    table: String,
    fields: FieldNames,
}

impl RecordSchema {
    /// Build a schema, rejecting names that are not plain identifiers or
    /// that name the same column twice.
    pub fn new(table: impl Into<String>, fields: FieldNames) -> Result<Self, Error> {
        let table = table.into();
        for name in [&table, &fields.url, &fields.content, &fields.created_at] {
            if !is_sql_identifier(name) {
                return Err(Error::InvalidIdentifier(name.clone()));
            }
        }
        if !has_distinct_columns(&fields) {
            return Err(Error::InvalidIdentifier(format!(
                "column names must be distinct: {}, {}, {}",
                fields.url, fields.content, fields.created_at
            )));
        }
        Ok(Self { table, fields })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    /// Substitute `{table}`, `{url}`, `{content}` and `{created_at}` in a
    /// SQL template.
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{table}", &self.table)
            .replace("{url}", &self.fields.url)
            .replace("{content}", &self.fields.content)
            .replace("{created_at}", &self.fields.created_at)
    }

    pub(crate) fn select_since_sql(&self) -> String {
        self.render(
            "SELECT {url}, {content}, {created_at} FROM {table}
             WHERE {created_at} > ?1
             ORDER BY {created_at} ASC, rowid ASC",
        )
    }

    pub(crate) fn insert_sql(&self) -> String {
        self.render("INSERT INTO {table} ({url}, {content}, {created_at}) VALUES (?1, ?2, ?3)")
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self { table: "sites".into(), fields: FieldNames::default() }
    }
}
