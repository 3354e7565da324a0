// src/extractors/table.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{node::Element, node::Node, ElementRef, Html, Selector};

// --- Constants ---
// Spans beyond this are malformed markup, not real tables.
const MAX_ROWSPAN: usize = 1000;
const MAX_COLSPAN: usize = 100;

// --- CSS Selectors (Lazy Static) ---
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table").expect("Failed to compile TABLE_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile ROW_SELECTOR")
});

// --- Regex Patterns (Lazy Static) ---
// Footnote markers left in plain text: [1], [a], [note 2], [citation needed]
static REFERENCE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\s*(?:\d{1,3}|[a-z]{1,2}|note\s*\d+|nb\s*\d+|citation needed)\s*\]")
        .expect("Failed to compile REFERENCE_MARKER_RE")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

// --- Data Structures ---

/// A table scraped from a page, with row and column spans expanded.
/// Missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell at (`row`, `col`), empty when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
struct Cell {
    text: String,
    header: bool,
    rowspan: usize,
    colspan: usize,
}

/// Removes footnote markers and collapses whitespace (non-breaking spaces included).
pub fn clean_text(raw: &str) -> String {
    let without_refs = REFERENCE_MARKER_RE.replace_all(raw, " ");
    WHITESPACE_RE.replace_all(&without_refs, " ").trim().to_string()
}

/// Extracts every `<table>` in the document, in document order.
pub fn parse_tables(html: &str) -> Vec<RawTable> {
    let document = Html::parse_document(html);
    let tables: Vec<RawTable> = document.select(&TABLE_SELECTOR).map(table_from_element).collect();
    tracing::debug!("Parsed {} tables from page", tables.len());
    tables
}

fn table_from_element(table: ElementRef) -> RawTable {
    // Rows of nested tables belong to those tables, not this one.
    let rows: Vec<Vec<Cell>> = table
        .select(&ROW_SELECTOR)
        .filter(|row| owning_table(*row) == Some(table))
        .map(row_cells)
        .filter(|cells| !cells.is_empty())
        .collect();

    let header_rows = rows
        .iter()
        .take_while(|cells| cells.iter().all(|c| c.header))
        .count();

    let grid = expand_spans(&rows);
    let (head, body) = grid.split_at(header_rows.min(grid.len()));

    RawTable {
        headers: merge_header_rows(head),
        rows: body.to_vec(),
    }
}

fn owning_table(row: ElementRef) -> Option<ElementRef> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

fn row_cells(row: ElementRef) -> Vec<Cell> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .map(|el| {
            let mut text = String::new();
            collect_text(el, &mut text);
            Cell {
                text: clean_text(&text),
                header: el.value().name() == "th",
                rowspan: span_attr(el.value(), "rowspan", MAX_ROWSPAN),
                colspan: span_attr(el.value(), "colspan", MAX_COLSPAN),
            }
        })
        .collect()
}

fn span_attr(el: &Element, name: &str, max: usize) -> usize {
    el.attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1)
        .min(max)
}

/// Visible text of a cell. Footnotes, hidden sort keys and inline styles are skipped.
fn collect_text(el: ElementRef, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(child_el) => {
                if child_el.name() == "br" {
                    out.push(' ');
                    continue;
                }
                if is_hidden(child_el) {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, out);
                }
            }
            _ => {}
        }
    }
}

fn is_hidden(el: &Element) -> bool {
    if matches!(el.name(), "style" | "script") {
        return true;
    }
    if el.name() == "sup" && el.classes().any(|c| c == "reference" || c == "noprint") {
        return true;
    }
    el.attr("style")
        .map(|s| s.replace(' ', "").to_ascii_lowercase().contains("display:none"))
        .unwrap_or(false)
}

/// Lays rows out on a grid, repeating spanned cells into every slot they cover.
fn expand_spans(rows: &[Vec<Cell>]) -> Vec<Vec<String>> {
    // Per column: text still hanging down from a rowspan, and how many rows it has left
    let mut carry: Vec<Option<(String, usize)>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for cells in rows {
        let mut line = Vec::new();
        let mut cells = cells.iter();
        let mut col = 0;

        loop {
            if let Some(text) = take_carried(&mut carry, col) {
                line.push(text);
                col += 1;
                continue;
            }

            let Some(cell) = cells.next() else { break };
            for _ in 0..cell.colspan {
                // A pending rowspan keeps its slot; the rest of this cell shifts right.
                while let Some(text) = take_carried(&mut carry, col) {
                    line.push(text);
                    col += 1;
                }
                if carry.len() <= col {
                    carry.resize(col + 1, None);
                }
                if cell.rowspan > 1 {
                    carry[col] = Some((cell.text.clone(), cell.rowspan - 1));
                }
                line.push(cell.text.clone());
                col += 1;
            }
        }

        // Spans hanging past the last explicit cell of this row
        while col < carry.len() {
            line.push(take_carried(&mut carry, col).unwrap_or_default());
            col += 1;
        }

        grid.push(line);
    }

    grid
}

/// Takes one row's worth of a pending rowspan at `col`, if any.
fn take_carried(carry: &mut [Option<(String, usize)>], col: usize) -> Option<String> {
    let (text, left) = carry.get_mut(col)?.take()?;
    if left > 1 {
        carry[col] = Some((text.clone(), left - 1));
    }
    Some(text)
}

fn merge_header_rows(head: &[Vec<String>]) -> Vec<String> {
    let width = head.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|col| {
            let mut parts: Vec<&str> = Vec::new();
            for row in head {
                if let Some(text) = row.get(col).map(String::as_str) {
                    if !text.is_empty() && !parts.contains(&text) {
                        parts.push(text);
                    }
                }
            }
            parts.join(" ")
        })
        .collect()
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rowspans_repeat_down_the_grid() {
        let html = r#"
            <html><body>
            <table class="wikitable">
              <tr><th>No.</th><th>Issue date</th><th>Song</th><th>Artist(s)</th></tr>
              <tr><td rowspan="2">1</td><th>January 6</th><td rowspan="2">"Another Day in Paradise"</td><td rowspan="2">Phil Collins<sup class="reference">[1]</sup></td></tr>
              <tr><th>January 13</th></tr>
              <tr><td>2</td><th>January 20</th><td>"Rhythm Nation"</td><td>Janet<br>Jackson</td></tr>
            </table>
            </body></html>
        "#;

        let tables = parse_tables(html);
        assert_eq!(tables.len(), 1);
        let table = &tables[0];

        assert_eq!(table.headers, vec!["No.", "Issue date", "Song", "Artist(s)"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1], vec!["1", "January 13", "\"Another Day in Paradise\"", "Phil Collins"]);
        assert_eq!(table.rows[2], vec!["2", "January 20", "\"Rhythm Nation\"", "Janet Jackson"]);
    }

    #[test]
    fn test_colspans_and_multi_row_headers() {
        let html = r#"
            <table>
              <tr><th rowspan="2">Issue date</th><th colspan="2">Number one</th></tr>
              <tr><th>Song</th><th>Artist</th></tr>
              <tr><td>March 3, 1990</td><td colspan="2">Chart not published</td></tr>
              <tr><td>March 10, 1990</td><td>"Escapade"</td><td>Janet Jackson</td></tr>
            </table>
        "#;

        let table = &parse_tables(html)[0];
        assert_eq!(table.headers, vec!["Issue date", "Number one Song", "Number one Artist"]);
        assert_eq!(table.rows[0], vec!["March 3, 1990", "Chart not published", "Chart not published"]);
        assert_eq!(table.cell(1, 1), "\"Escapade\"");
        assert_eq!(table.cell(1, 7), "");
    }

    #[test]
    fn test_colspan_over_pending_rowspan_does_not_leak() {
        let html = r#"
            <table>
              <tr><th>Issue date</th><th>Song</th><th>Artist</th></tr>
              <tr><td>January 6</td><td rowspan="2">Hold On</td><td>Wilson Phillips</td></tr>
              <tr><td colspan="2">No chart published</td><td>-</td></tr>
              <tr><td>January 20</td><td>Vogue</td><td>Madonna</td></tr>
            </table>
        "#;

        let table = &parse_tables(html)[0];
        assert_eq!(table.rows[1][1], "Hold On");
        assert_eq!(table.rows[2], vec!["January 20", "Vogue", "Madonna"]);
    }

    #[test]
    fn test_nested_tables_are_kept_apart() {
        let html = r#"
            <table id="outer">
              <tr><th>Name</th></tr>
              <tr><td><table id="inner"><tr><th>Rank</th></tr><tr><td>1</td></tr></table></td></tr>
            </table>
        "#;

        let tables = parse_tables(html);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers, vec!["Name"]);
        assert_eq!(tables[0].rows.len(), 1);
        assert_eq!(tables[1].headers, vec!["Rank"]);
        assert_eq!(tables[1].rows, vec![vec!["1".to_string()]]);
    }

    #[test]
    fn test_hidden_text_is_skipped() {
        let html = r#"
            <table>
              <tr><th>Issue date</th><th>Song</th></tr>
              <tr><td><span style="display: none">1990-01-06</span>January 6</td><td>Song<style>.x{}</style>[a]</td></tr>
            </table>
        "#;

        let table = &parse_tables(html)[0];
        assert_eq!(table.rows[0], vec!["January 6", "Song"]);
    }

    #[test]
    fn test_table_without_header_row() {
        let html = "<table><tr><td>a</td><td>b</td></tr></table>";
        let table = &parse_tables(html)[0];
        assert!(table.headers.is_empty());
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Phil\u{a0}Collins [12]\n"), "Phil Collins");
        assert_eq!(clean_text("Hold On[citation needed]"), "Hold On");
    }
}
