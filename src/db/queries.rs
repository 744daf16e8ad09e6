//! SQL builders for document collections
//!
//! Each collection is one table: `id`, a `seq` tie-breaker, the JSONB body
//! and the two timestamps. Table and field names come from static
//! collection specs and are checked with [`is_identifier`] before they are
//! interpolated.

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("identifier pattern is valid")
});

/// Columns returned by every document query
const DOCUMENT_COLUMNS: &str = "id, doc, created_at, updated_at";

/// Whether `name` is safe to interpolate as a table name or JSON field
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name) && name.len() <= 48
}

pub struct SqlBuilder;

impl SqlBuilder {
    /// Quote an identifier (table/column name) safely
    pub fn quote_ident(ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// `doc ->> 'field'`, the expression unique indexes are built on
    fn field_expr(field: &str) -> String {
        format!("(doc ->> '{}')", field.replace('\'', "''"))
    }

    pub fn create_table(table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                seq BIGSERIAL NOT NULL,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            Self::quote_ident(table)
        )
    }

    pub fn create_recency_index(table: &str) -> String {
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} (created_at DESC, seq DESC)",
            Self::quote_ident(&format!("idx_{}_created_at", table)),
            Self::quote_ident(table)
        )
    }

    pub fn create_unique_index(table: &str, field: &str) -> String {
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({})",
            Self::quote_ident(&format!("uq_{}_{}", table, field)),
            Self::quote_ident(table),
            Self::field_expr(field)
        )
    }

    /// `$1` id, `$2` body, `$3` timestamp. Yields no row when a unique key is taken.
    pub fn insert(table: &str) -> String {
        format!(
            "INSERT INTO {} (id, doc, created_at, updated_at) VALUES ($1, $2, $3, $3)
             ON CONFLICT DO NOTHING
             RETURNING {}",
            Self::quote_ident(table),
            DOCUMENT_COLUMNS
        )
    }

    /// Like [`SqlBuilder::insert`], but only a clash on `field` is absorbed
    pub fn insert_unless_key_exists(table: &str, field: &str) -> String {
        format!(
            "INSERT INTO {} (id, doc, created_at, updated_at) VALUES ($1, $2, $3, $3)
             ON CONFLICT ({}) DO NOTHING
             RETURNING {}",
            Self::quote_ident(table),
            Self::field_expr(field),
            DOCUMENT_COLUMNS
        )
    }

    /// `$1` offset, `$2` limit
    pub fn select_page(table: &str) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY created_at DESC, seq DESC OFFSET $1 LIMIT $2",
            DOCUMENT_COLUMNS,
            Self::quote_ident(table)
        )
    }

    pub fn count(table: &str) -> String {
        format!("SELECT COUNT(*) FROM {}", Self::quote_ident(table))
    }

    pub fn select_by_id(table: &str) -> String {
        format!(
            "SELECT {} FROM {} WHERE id = $1",
            DOCUMENT_COLUMNS,
            Self::quote_ident(table)
        )
    }

    pub fn delete_by_id(table: &str) -> String {
        format!(
            "DELETE FROM {} WHERE id = $1 RETURNING {}",
            Self::quote_ident(table),
            DOCUMENT_COLUMNS
        )
    }

    /// `$1` the field value to match
    pub fn select_by_field(table: &str, field: &str, for_update: bool) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY seq LIMIT 1{}",
            DOCUMENT_COLUMNS,
            Self::quote_ident(table),
            Self::field_expr(field),
            if for_update { " FOR UPDATE" } else { "" }
        )
    }

    /// `$1` id, `$2` new body, `$3` timestamp
    pub fn replace_body(table: &str) -> String {
        format!(
            "UPDATE {} SET doc = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            Self::quote_ident(table),
            DOCUMENT_COLUMNS
        )
    }
}
