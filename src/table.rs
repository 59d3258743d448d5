//! Pipe-table extraction straight from raw text.
//!
//! This does not go through the block segmenter: CSV, spreadsheet and the
//! structured exports only care about table cells and stripped prose.

use serde::Serialize;

use crate::strip::strip;

/// A pipe table with formatting removed from every cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Split a table line into trimmed raw cells. Outer pipes are optional and
/// `\|` is a literal pipe inside a cell.
pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = match inner.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// A row whose cells hold only dashes, colons and whitespace, e.g. `|:--|--:|`.
pub fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

/// Split a group of consecutive pipe lines at its first separator row. The
/// line just above the separator is the header; anything before the header is
/// prose that happens to contain a pipe. A group with no separator below its
/// first line is all prose.
fn split_group<'a>(group: &'a [&'a str]) -> (&'a [&'a str], Option<Table>) {
    let Some(separator) = (1..group.len()).find(|&i| is_separator_row(group[i])) else {
        return (group, None);
    };
    let clean = |line: &str| -> Vec<String> {
        split_cells(line).iter().map(|cell| strip(cell)).collect()
    };

    let headers = clean(group[separator - 1]);
    let rows = group[separator + 1..]
        .iter()
        .filter(|line| !is_separator_row(line))
        .map(|line| clean(*line))
        .collect();

    (&group[..separator - 1], Some(Table { headers, rows }))
}

/// One piece of the source in document order: a run of pipe lines or a run of
/// other non-blank lines.
enum Chunk<'a> {
    Pipes(Vec<&'a str>),
    Prose(Vec<&'a str>),
}

fn chunks(text: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut pipes: Vec<&str> = Vec::new();
    let mut prose: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.contains('|') {
            if !prose.is_empty() {
                out.push(Chunk::Prose(std::mem::take(&mut prose)));
            }
            pipes.push(line);
            continue;
        }
        if !pipes.is_empty() {
            out.push(Chunk::Pipes(std::mem::take(&mut pipes)));
        }
        if line.trim().is_empty() {
            if !prose.is_empty() {
                out.push(Chunk::Prose(std::mem::take(&mut prose)));
            }
        } else {
            prose.push(line);
        }
    }
    if !pipes.is_empty() {
        out.push(Chunk::Pipes(pipes));
    }
    if !prose.is_empty() {
        out.push(Chunk::Prose(prose));
    }
    out
}

/// Every well-formed pipe table in the text, in document order.
pub fn extract_tables(text: &str) -> Vec<Table> {
    let tables: Vec<Table> = chunks(text)
        .iter()
        .filter_map(|chunk| match chunk {
            Chunk::Pipes(group) => split_group(group).1,
            Chunk::Prose(_) => None,
        })
        .collect();

    tracing::debug!(tables = tables.len(), "extracted tables");
    tables
}

/// A spreadsheet grid: table header and body rows, with every prose paragraph
/// (and every pipe group that is not a real table) as a single-cell row, all in
/// document order.
pub fn extract_sheet(text: &str) -> Vec<Vec<String>> {
    let mut grid = Vec::new();

    for chunk in chunks(text) {
        match chunk {
            Chunk::Pipes(group) => {
                let (prose, table) = split_group(&group);
                push_prose(&mut grid, prose);
                if let Some(table) = table {
                    grid.push(table.headers);
                    grid.extend(table.rows);
                }
            }
            Chunk::Prose(lines) => push_prose(&mut grid, &lines),
        }
    }

    grid
}

fn push_prose(grid: &mut Vec<Vec<String>>, lines: &[&str]) {
    let paragraph = strip(&lines.join("\n"));
    if !paragraph.is_empty() {
        grid.push(vec![paragraph]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn split_cells_with_and_without_outer_pipes() {
        assert_eq!(split_cells("| a | b |"), row(&["a", "b"]));
        assert_eq!(split_cells("a | b"), row(&["a", "b"]));
        assert_eq!(split_cells("| a \\| b | c |"), row(&["a | b", "c"]));
        assert_eq!(split_cells("| | x |"), row(&["", "x"]));
    }

    #[test]
    fn separator_rows() {
        assert!(is_separator_row("|---|---|"));
        assert!(is_separator_row("| :--- | ---: |"));
        assert!(is_separator_row("--|--"));
        assert!(!is_separator_row("| a | - |"));
        assert!(!is_separator_row("| | |"));
    }

    #[test]
    fn simple_table() {
        let tables = extract_tables("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            tables,
            vec![Table {
                headers: row(&["A", "B"]),
                rows: vec![row(&["1", "2"])],
            }]
        );
    }

    #[test]
    fn cells_are_stripped_of_formatting() {
        let text = "| **Name** | `code` |\n|---|---|\n| [link](http://x) | *em* |";
        let tables = extract_tables(text);
        assert_eq!(tables[0].headers, row(&["Name", "code"]));
        assert_eq!(tables[0].rows, vec![row(&["link", "em"])]);
    }

    #[test]
    fn single_line_or_missing_separator_is_not_a_table() {
        assert_eq!(extract_tables("| lonely | row |"), vec![]);
        assert_eq!(extract_tables("| a | b |\n| c | d |"), vec![]);
    }

    #[test]
    fn tables_are_found_between_prose() {
        let text = "Intro\n\n| A |\n|---|\n| 1 |\n\nMiddle\n\n| B |\n|:-:|\n| 2 |\n| 3 |";
        let tables = extract_tables(text);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].headers, row(&["B"]));
        assert_eq!(tables[1].rows, vec![row(&["2"]), row(&["3"])]);
    }

    #[test]
    fn pipe_in_prose_above_table_keeps_the_table() {
        let text = "Use a|b here\n| A | B |\n|---|---|\n| 1 | 2 |";
        assert_eq!(
            extract_tables(text),
            vec![Table {
                headers: row(&["A", "B"]),
                rows: vec![row(&["1", "2"])],
            }]
        );
        assert_eq!(
            extract_sheet(text),
            vec![row(&["Use a b here"]), row(&["A", "B"]), row(&["1", "2"])]
        );
    }

    #[test]
    fn sheet_interleaves_prose_and_tables() {
        let text = "# Report\n\nSome **intro**\ntext.\n\n| A | B |\n|---|---|\n| 1 | 2 |\nAfter";
        assert_eq!(
            extract_sheet(text),
            vec![
                row(&["Report"]),
                row(&["Some intro\ntext."]),
                row(&["A", "B"]),
                row(&["1", "2"]),
                row(&["After"]),
            ]
        );
    }

    proptest! {
        #[test]
        fn row_count_matches_body_rows(
            columns in 1usize..5,
            body in prop::collection::vec(prop::collection::vec("[a-z0-9]{1,6}", 4), 0..8),
        ) {
            let cells = |values: &[String]| format!("| {} |", values[..columns].join(" | "));
            let header: Vec<String> = (0..4).map(|i| format!("h{i}")).collect();
            let mut text = cells(&header);
            text.push('\n');
            text.push_str(&format!("|{}", "---|".repeat(columns)));
            for values in &body {
                text.push('\n');
                text.push_str(&cells(values));
            }

            let tables = extract_tables(&text);
            prop_assert_eq!(tables.len(), 1);
            prop_assert_eq!(tables[0].rows.len(), body.len());
            prop_assert_eq!(tables[0].headers.len(), columns);
            for r in &tables[0].rows {
                prop_assert_eq!(r.len(), columns);
            }
        }
    }
}
