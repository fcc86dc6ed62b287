/*!
 * Outcome of a single question run through the session.
 */

use std::time::Duration;

use crate::database::QueryResult;

/// What happened to one question
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// SQL was generated and executed
    Answered {
        /// Statement that was executed
        sql: String,
        /// Rows returned by the statement
        result: QueryResult,
        /// Time from translation start to result availability
        elapsed: Duration,
    },

    /// The backend answered but contained no SQL
    NoSql {
        /// Time spent on translation
        elapsed: Duration,
    },

    /// SQL was generated but execution failed
    ExecutionFailed {
        /// Statement that failed
        sql: String,
        /// Driver error message
        error: String,
        /// Time from translation start to the failure
        elapsed: Duration,
    },

    /// The backend could not be reached or returned an error
    TranslationFailed {
        /// Provider error message
        error: String,
        /// Time spent before the failure
        elapsed: Duration,
    },
}

impl QueryOutcome {
    /// Elapsed time of the question
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Answered { elapsed, .. }
            | Self::NoSql { elapsed }
            | Self::ExecutionFailed { elapsed, .. }
            | Self::TranslationFailed { elapsed, .. } => *elapsed,
        }
    }

    /// Generated SQL, when there was any
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::Answered { sql, .. } | Self::ExecutionFailed { sql, .. } => Some(sql),
            Self::NoSql { .. } | Self::TranslationFailed { .. } => None,
        }
    }

    /// Whether rows were produced
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered { .. })
    }
}
