/*!
 * Tests for result rendering against real query results
 */

use anyhow::Result;
use shelfquery::database::{DatabaseConnection, QueryResult, SqlValue, execute_guarded};
use shelfquery::formatting::{NO_RESULTS, format_result};

fn library_db() -> Result<DatabaseConnection> {
    let db = DatabaseConnection::new_in_memory()?;
    db.execute(|conn| {
        conn.execute_batch(
            "CREATE TABLE books (book_id INTEGER PRIMARY KEY, title TEXT, rating REAL, cover BLOB);
             INSERT INTO books VALUES (1, 'Dune', 4.5, x'00FF10');
             INSERT INTO books VALUES (2, 'Emma', NULL, NULL);",
        )?;
        Ok(())
    })?;
    Ok(db)
}

#[tokio::test]
async fn test_formatResult_withMixedTypes_shouldRenderEachValue() -> Result<()> {
    let db = library_db()?;
    let result = execute_guarded(&db, "SELECT * FROM books ORDER BY book_id").await?;
    let text = format_result(&result);

    assert!(text.contains("| book_id | title | rating | cover          |"));
    assert!(text.contains("| 1       | Dune  | 4.5    | <blob 3 bytes> |"));
    assert!(text.contains("| 2       | Emma  | NULL   | NULL           |"));
    Ok(())
}

#[tokio::test]
async fn test_formatResult_withEmptySelect_shouldSayNoResults() -> Result<()> {
    let db = library_db()?;
    let result = execute_guarded(&db, "SELECT title FROM books WHERE book_id > 100").await?;
    assert_eq!(format_result(&result), NO_RESULTS);
    Ok(())
}

#[tokio::test]
async fn test_formatResult_withCount_shouldPrintBareValue() -> Result<()> {
    let db = library_db()?;
    let result = execute_guarded(&db, "SELECT COUNT(*) FROM books").await?;
    assert_eq!(format_result(&result), "2");
    Ok(())
}

/// Every row takes exactly one line and every line has the same width
#[test]
fn test_formatResult_withManyRows_shouldKeepGridRectangular() {
    let rows: Vec<Vec<SqlValue>> = (0..25)
        .map(|i| vec![SqlValue::Integer(i), SqlValue::Text("x".repeat(i as usize % 7))])
        .collect();
    let result = QueryResult::new(vec!["id".into(), "padding".into()], rows);
    let text = format_result(&result);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 25 + 4);
    let width = lines[0].chars().count();
    assert!(lines.iter().all(|l| l.chars().count() == width));
}

#[test]
fn test_formatResult_withMultilineText_shouldStayOnOneLine() {
    let result = QueryResult::new(
        vec!["title".into(), "note".into()],
        vec![vec!["Dune".into(), "first line\nsecond line".into()]],
    );
    let text = format_result(&result);
    assert!(text.contains("| Dune  | first line second line |"));
}
