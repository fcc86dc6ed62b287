/*!
 * Common test utilities for the shelfquery test suite
 */

use anyhow::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use shelfquery::app_config::Config;
use shelfquery::providers::mock::MockProvider;
use shelfquery::session::QuerySession;

/// Statement the scripted model returns for the George Orwell question
pub const ORWELL_SQL: &str = "SELECT * FROM books WHERE books.author = 'George Orwell'";

const BOOKS_DDL: &str = "
    CREATE TABLE books (
        book_id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        isbn TEXT,
        publication_year INTEGER,
        genre TEXT
    );";

const INVENTORY_DDL: &str = "
    CREATE TABLE inventory (
        inventory_id INTEGER PRIMARY KEY,
        book_id INTEGER NOT NULL REFERENCES books(book_id),
        status TEXT NOT NULL,
        last_checkout TEXT,
        due_date TEXT
    );";

const FIXTURE_ROWS: &str = "
    INSERT INTO books VALUES (1, '1984', 'George Orwell', '9780451524935', 1949, 'Dystopian');
    INSERT INTO books VALUES (2, 'Animal Farm', 'George Orwell', '9780451526342', 1945, 'Satire');
    INSERT INTO books VALUES (3, 'Dune', 'Frank Herbert', '9780441172719', 1965, 'Science Fiction');
    INSERT INTO inventory VALUES (1, 1, 'checked_out', '2024-05-01', '2024-05-15');
    INSERT INTO inventory VALUES (2, 2, 'available', NULL, NULL);
    INSERT INTO inventory VALUES (3, 3, 'available', '2024-03-10', NULL);";

/// Routes library log output through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a library database with both required tables and a few rows
pub fn create_library_db(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("library.db");
    let conn = Connection::open(&path)?;
    conn.execute_batch(BOOKS_DDL)?;
    conn.execute_batch(INVENTORY_DDL)?;
    conn.execute_batch(FIXTURE_ROWS)?;
    Ok(path)
}

/// Creates a database that only has the `books` table
pub fn create_books_only_db(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("books_only.db");
    let conn = Connection::open(&path)?;
    conn.execute_batch(BOOKS_DDL)?;
    Ok(path)
}

/// Configuration pointing at the given database file
pub fn config_for(db_path: &Path) -> Config {
    let mut config = Config::default();
    config.database.database = db_path.to_string_lossy().into_owned();
    config
}

/// Scripted model that answers the Orwell question and returns nothing for anything else
pub fn orwell_provider() -> MockProvider {
    MockProvider::responding("").with_custom_response(|request| {
        if request.prompt.contains("George Orwell") {
            format!("```sql\n{};\n```", ORWELL_SQL)
        } else {
            String::new()
        }
    })
}

/// Opens a session over a fresh library database
pub fn open_library_session(provider: MockProvider) -> Result<(TempDir, QuerySession)> {
    let dir = create_temp_dir()?;
    let db_path = create_library_db(dir.path())?;
    let session = QuerySession::open(&config_for(&db_path), Box::new(provider))?;
    Ok((dir, session))
}
