/*!
 * Integration tests for questions run through a query session
 */

use anyhow::Result;
use shelfquery::database::SqlValue;
use shelfquery::providers::mock::{MockBehavior, MockProvider};
use shelfquery::session::QueryOutcome;
use std::time::Duration;
use crate::common;

#[tokio::test]
async fn test_ask_withOrwellQuestion_shouldReturnHisBooks() -> Result<()> {
    let provider = common::orwell_provider();
    let (_dir, session) = common::open_library_session(provider.clone())?;

    let outcome = session.ask("list all books by George Orwell").await;

    match outcome {
        QueryOutcome::Answered { sql, result, .. } => {
            assert_eq!(sql, common::ORWELL_SQL);
            assert_eq!(result.columns[..3], ["book_id", "title", "author"]);
            assert_eq!(result.rows.len(), 2);
            assert_eq!(result.rows[0][0], SqlValue::Integer(1));
            assert_eq!(result.rows[0][1], SqlValue::from("1984"));
            assert_eq!(result.rows[0][2], SqlValue::from("George Orwell"));
        }
        other => panic!("expected an answer, got {:?}", other),
    }
    assert_eq!(provider.request_count(), 1);
    Ok(())
}

/// No SQL means no execution and no failure
#[tokio::test]
async fn test_ask_withEmptyModelOutput_shouldReportNoSql() -> Result<()> {
    let (_dir, session) = common::open_library_session(MockProvider::empty())?;

    let outcome = session.ask("tell me a joke").await;

    assert!(matches!(outcome, QueryOutcome::NoSql { .. }));
    assert_eq!(outcome.sql(), None);
    Ok(())
}

#[tokio::test]
async fn test_ask_withInvalidSql_shouldReportExecutionFailure() -> Result<()> {
    common::init_test_logging();
    let provider = MockProvider::responding("SELEC title FROM bookz");
    let (_dir, session) = common::open_library_session(provider)?;

    let outcome = session.ask("titles?").await;

    match &outcome {
        QueryOutcome::ExecutionFailed { sql, error, .. } => {
            assert_eq!(sql, "SELEC title FROM bookz");
            assert!(error.contains("syntax error"));
        }
        other => panic!("expected execution failure, got {:?}", other),
    }

    // The connection is still usable afterwards
    let retry = session.ask("titles?").await;
    assert!(matches!(retry, QueryOutcome::ExecutionFailed { .. }));
    Ok(())
}

#[tokio::test]
async fn test_ask_withUnknownColumn_shouldReportExecutionFailure() -> Result<()> {
    let provider = MockProvider::responding("SELECT books.shelf FROM books");
    let (_dir, session) = common::open_library_session(provider)?;

    let outcome = session.ask("which shelf?").await;

    assert!(matches!(outcome, QueryOutcome::ExecutionFailed { .. }));
    Ok(())
}

#[tokio::test]
async fn test_ask_withBackendDown_shouldReportTranslationFailure() -> Result<()> {
    let (_dir, session) = common::open_library_session(MockProvider::failing())?;

    let outcome = session.ask("how many books?").await;

    match outcome {
        QueryOutcome::TranslationFailed { error, .. } => assert!(error.contains("Mock provider")),
        other => panic!("expected translation failure, got {:?}", other),
    }
    assert!(!session.check_backend().await);
    Ok(())
}

#[tokio::test]
async fn test_ask_withNoMatchingRows_shouldAnswerWithEmptyResult() -> Result<()> {
    let provider = MockProvider::responding("SELECT title FROM books WHERE author = 'Nobody'");
    let (_dir, session) = common::open_library_session(provider)?;

    let outcome = session.ask("books by nobody").await;

    match outcome {
        QueryOutcome::Answered { result, .. } => {
            assert!(result.is_empty());
            assert_eq!(result.columns, vec!["title".to_string()]);
        }
        other => panic!("expected an answer, got {:?}", other),
    }
    Ok(())
}

/// Asking twice gives the same answer; only the model is called again
#[tokio::test]
async fn test_ask_twice_shouldNotChangeSessionState() -> Result<()> {
    let provider = MockProvider::responding(
        "SELECT books.title, inventory.status FROM books JOIN inventory ON books.book_id = inventory.book_id ORDER BY books.book_id",
    );
    let (_dir, session) = common::open_library_session(provider.clone())?;

    let first = session.ask("status of every book").await;
    let second = session.ask("status of every book").await;

    match (&first, &second) {
        (
            QueryOutcome::Answered { sql: sql_a, result: rows_a, .. },
            QueryOutcome::Answered { sql: sql_b, result: rows_b, .. },
        ) => {
            assert_eq!(sql_a, sql_b);
            assert_eq!(rows_a, rows_b);
            assert_eq!(rows_a.rows.len(), 3);
        }
        other => panic!("expected two answers, got {:?}", other),
    }
    assert_eq!(provider.request_count(), 2);
    assert_eq!(session.translator().schema().table_names(), vec!["books", "inventory"]);
    Ok(())
}

/// Elapsed time covers the model call
#[tokio::test]
async fn test_ask_withSlowModel_shouldIncludeTranslationTime() -> Result<()> {
    let provider = MockProvider::new(MockBehavior::Slow {
        delay_ms: 50,
        text: "SELECT COUNT(*) FROM inventory".to_string(),
    });
    let (_dir, session) = common::open_library_session(provider)?;

    let outcome = session.ask("how many copies?").await;

    assert!(outcome.is_answered());
    assert!(outcome.elapsed() >= Duration::from_millis(50));
    Ok(())
}
