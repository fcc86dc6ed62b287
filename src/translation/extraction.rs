/*!
 * Extraction of the SQL statement from a model response.
 *
 * Models asked for "raw SQL only" still wrap answers in Markdown fences,
 * echo the `SQLQuery:` label or append an explanation. This strips those
 * wrappers; the statement itself is passed through untouched.
 */

use regex::Regex;

use crate::database::executor::normalize_statement;

/// Labels after which the model starts talking about results instead of SQL
const TRAILING_MARKERS: [&str; 2] = ["SQLResult:", "Answer:"];

/// Pull the SQL statement out of a model response; empty when there is none
pub fn extract_sql(response: &str) -> String {
    let mut text = response.trim();

    // A fenced block wins over everything around it
    let fenced = Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```")
        .ok()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    if let Some(inner) = fenced {
        text = inner.trim();
    }

    if let Some(start) = text.find("SQLQuery:") {
        text = &text[start + "SQLQuery:".len()..];
    }

    let end = TRAILING_MARKERS
        .iter()
        .filter_map(|marker| text.find(marker))
        .min()
        .unwrap_or(text.len());
    text = text[..end].trim();

    for label in ["SQL:", "sql:"] {
        if let Some(rest) = text.strip_prefix(label) {
            text = rest.trim_start();
        }
    }

    normalize_statement(text).to_string()
}
