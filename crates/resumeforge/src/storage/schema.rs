//! `SQLite` schema definitions for resumeforge.

/// SQL statement to create the resumes table.
pub const CREATE_RESUMES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS resumes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    dob TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    nationality TEXT NOT NULL DEFAULT '',
    linkedin TEXT NOT NULL DEFAULT '',
    skills TEXT NOT NULL DEFAULT '[]',
    languages TEXT NOT NULL DEFAULT '[]',
    hobbies TEXT NOT NULL DEFAULT '[]',
    objective TEXT NOT NULL DEFAULT '',
    experience TEXT NOT NULL DEFAULT '',
    education TEXT NOT NULL DEFAULT '',
    declaration TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL DEFAULT '',
    photo TEXT NOT NULL DEFAULT ''
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_RESUMES_TABLE, CREATE_METADATA_TABLE];

/// Column list shared by every query that loads a full resume.
pub const RESUME_COLUMNS: &str = "id, name, email, phone, dob, address, nationality, linkedin, \
     skills, languages, hobbies, objective, experience, education, declaration, date, photo";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_resumes_table_uses_autoincrement_key() {
        assert!(CREATE_RESUMES_TABLE.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
    }

    #[test]
    fn test_every_column_is_declared() {
        for column in RESUME_COLUMNS.split(',').map(str::trim).skip(1) {
            assert!(
                CREATE_RESUMES_TABLE.contains(&format!("{column} TEXT")),
                "missing column {column}"
            );
        }
    }
}
