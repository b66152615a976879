//! `SQLite` schema definitions for presentdeck.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the metadata table for storing key-value pairs.
///
/// Always created on open, since it holds the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// SQL statement to create the presentations collection.
pub const CREATE_PRESENTATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS presentations (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    has_assets INTEGER NOT NULL DEFAULT 0
)
";

/// SQL statement to create the assets collection.
///
/// Each slot holds a base64 data URI, or NULL when empty.
pub const CREATE_ASSETS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS assets (
    id TEXT PRIMARY KEY NOT NULL,
    logo1 TEXT,
    logo2 TEXT,
    logo3 TEXT,
    video TEXT
)
";

/// Statements that create the version 1 collections, in order.
pub const V1_STATEMENTS: &[&str] = &[CREATE_PRESENTATIONS_TABLE, CREATE_ASSETS_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_statements_not_empty() {
        assert!(!V1_STATEMENTS.is_empty());
        for stmt in V1_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_presentations_table_columns() {
        assert!(CREATE_PRESENTATIONS_TABLE.contains("id TEXT PRIMARY KEY"));
        assert!(CREATE_PRESENTATIONS_TABLE.contains("title TEXT NOT NULL"));
        assert!(CREATE_PRESENTATIONS_TABLE.contains("description TEXT NOT NULL"));
        assert!(CREATE_PRESENTATIONS_TABLE.contains("has_assets INTEGER NOT NULL"));
    }

    #[test]
    fn test_assets_table_has_three_logo_slots() {
        assert!(CREATE_ASSETS_TABLE.contains("id TEXT PRIMARY KEY"));
        assert!(CREATE_ASSETS_TABLE.contains("logo1 TEXT"));
        assert!(CREATE_ASSETS_TABLE.contains("logo2 TEXT"));
        assert!(CREATE_ASSETS_TABLE.contains("logo3 TEXT"));
        assert!(CREATE_ASSETS_TABLE.contains("video TEXT"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
