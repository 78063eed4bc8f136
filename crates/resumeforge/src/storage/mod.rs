//! Storage layer for resumeforge.
//!
//! A single `SQLite` table of resumes keyed by an auto-incrementing id.
//! Records are inserted once and read back; there is no update or delete.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::resume::{decode_list, encode_list, NewResume, Resume, ResumeSummary};

use schema::RESUME_COLUMNS;

/// Persistent store of submitted resumes.
///
/// The connection sits behind a mutex so one store can be shared between
/// request handlers.
#[derive(Debug)]
pub struct ResumeStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl ResumeStore {
    /// Open or create a resume database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            path,
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("Database opened successfully at {}", store.path.display());
        Ok(store)
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        let store = Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the resumes table exists. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation or migration fails.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;
        migrations::initialize_schema(&conn)
    }

    /// Insert a new resume and return its assigned id.
    ///
    /// Every call inserts a fresh row; identical submissions are not merged.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn save(&self, resume: &NewResume) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            r"
            INSERT INTO resumes (
                name, email, phone, dob, address, nationality, linkedin,
                skills, languages, hobbies, objective, experience, education,
                declaration, date, photo
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            ",
            params![
                resume.name,
                resume.email,
                resume.phone,
                resume.dob,
                resume.address,
                resume.nationality,
                resume.linkedin,
                encode_list(&resume.skills),
                encode_list(&resume.languages),
                encode_list(&resume.hobbies),
                resume.objective,
                resume.experience,
                resume.education,
                resume.declaration,
                resume.date,
                resume.photo,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(resume_id = id, "Inserted resume");
        Ok(id)
    }

    /// Get a resume by its id, or `None` if no such resume exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<Resume>> {
        let conn = self.lock()?;
        let result = conn
            .query_row(
                &format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE id = ?1"),
                [id],
                Self::row_to_resume,
            )
            .optional()?;
        Ok(result)
    }

    /// Count stored resumes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM resumes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// List the most recently submitted resumes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<ResumeSummary>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name, email, date FROM resumes ORDER BY id DESC LIMIT ?1")?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let summaries = stmt
            .query_map([limit_i64], |row| {
                Ok(ResumeSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    date: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("resume store connection mutex poisoned"))
    }

    /// Convert a database row to a Resume struct.
    fn row_to_resume(row: &rusqlite::Row) -> rusqlite::Result<Resume> {
        let skills: String = row.get(8)?;
        let languages: String = row.get(9)?;
        let hobbies: String = row.get(10)?;

        Ok(Resume {
            id: row.get(0)?,
            fields: NewResume {
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                dob: row.get(4)?,
                address: row.get(5)?,
                nationality: row.get(6)?,
                linkedin: row.get(7)?,
                skills: decode_list(&skills),
                languages: decode_list(&languages),
                hobbies: decode_list(&hobbies),
                objective: row.get(11)?,
                experience: row.get(12)?,
                education: row.get(13)?,
                declaration: row.get(14)?,
                date: row.get(15)?,
                photo: row.get(16)?,
            },
        })
    }
}
