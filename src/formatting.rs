/*!
 * Text rendering of query results.
 */

use std::time::Duration;

use crate::database::QueryResult;

/// Text shown when a query returns no rows
pub const NO_RESULTS: &str = "No results found";

/// Render a query result for the terminal
///
/// A single column renders as a flat list; anything wider renders as a grid
/// with the column names in a header row.
pub fn format_result(result: &QueryResult) -> String {
    if result.is_empty() {
        return NO_RESULTS.to_string();
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    if result.column_count() == 1 {
        return cells
            .iter()
            .map(|row| row.first().cloned().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");
    }

    let headers = header_names(result);
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = rule(&widths, '-');
    let mut lines = Vec::with_capacity(cells.len() + 4);
    lines.push(border.clone());
    lines.push(grid_row(&headers, &widths));
    lines.push(rule(&widths, '='));
    for row in &cells {
        lines.push(grid_row(row, &widths));
    }
    lines.push(border);

    lines.join("\n")
}

/// Render an elapsed duration as seconds with two decimals
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

fn header_names(result: &QueryResult) -> Vec<String> {
    (0..result.column_count())
        .map(|i| match result.columns.get(i) {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Col{}", i),
        })
        .collect()
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat_n(fill, width + 2));
        line.push('+');
    }
    line
}

fn grid_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.extend(std::iter::repeat_n(' ', pad + 1));
        line.push('|');
    }
    line
}
