// src/extractors/weekly.rs
use crate::extractors::table::RawTable;

/// One row of a weekly number-one table, before its date is parsed.
/// `issue_date` and `song` are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyRow {
    pub issue_date: String,
    pub song: String,
    pub artist: String,
}

/// The table a page's weekly number-ones were taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyTable {
    pub rows: Vec<WeeklyRow>,
}

impl WeeklyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column positions of the canonical fields within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    issue_date: usize,
    song: usize,
    artist: Option<usize>,
}

impl ColumnMap {
    /// Maps headers to canonical columns, or `None` if the table is not a weekly chart.
    fn from_headers(headers: &[String]) -> Option<Self> {
        let mut issue_date = None;
        let mut song = None;
        let mut artist = None;

        // First matching rule wins per header; first header wins per field.
        for (idx, header) in headers.iter().enumerate() {
            let lc = header.trim().to_lowercase();
            if lc.contains("issue") && lc.contains("date") {
                issue_date = issue_date.or(Some(idx));
            } else if lc.contains("song") {
                song = song.or(Some(idx));
            } else if lc.contains("artist") {
                artist = artist.or(Some(idx));
            }
        }

        Some(Self { issue_date: issue_date?, song: song?, artist })
    }
}

fn weekly_rows(table: &RawTable, columns: ColumnMap) -> Vec<WeeklyRow> {
    (0..table.rows.len())
        .filter_map(|row| {
            let issue_date = table.cell(row, columns.issue_date).trim();
            let song = table.cell(row, columns.song).trim();
            if issue_date.is_empty() || song.is_empty() {
                tracing::trace!("Dropping incomplete row {}: date '{}', song '{}'", row, issue_date, song);
                return None;
            }
            let artist = columns
                .artist
                .map(|col| table.cell(row, col).trim())
                .unwrap_or_default();
            Some(WeeklyRow {
                issue_date: issue_date.to_string(),
                song: song.to_string(),
                artist: artist.to_string(),
            })
        })
        .collect()
}

/// Picks the table of weekly number-ones out of everything scraped from a page.
///
/// A table qualifies when one header mentions both "issue" and "date" and another
/// mentions "song". Rows missing a date or song are dropped, and the qualifying
/// table with the most remaining rows wins (the earlier table on a tie).
pub fn extract_weekly_rows(tables: &[RawTable]) -> Option<WeeklyTable> {
    let mut best: Option<WeeklyTable> = None;

    for (idx, table) in tables.iter().enumerate() {
        let Some(columns) = ColumnMap::from_headers(&table.headers) else {
            tracing::trace!("Table {} does not look like a weekly chart: {:?}", idx, table.headers);
            continue;
        };

        let candidate = WeeklyTable { rows: weekly_rows(table, columns) };
        tracing::debug!("Table {} qualifies with {} rows ({:?})", idx, candidate.len(), columns);

        if best.as_ref().map_or(true, |b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: Vec<Vec<&str>>) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    #[test]
    fn test_selects_weekly_table_over_unrelated_table() {
        let rows: Vec<Vec<String>> = (0..50)
            .map(|i| vec![format!("Week {}", i), format!("Song {}", i), format!("Artist {}", i)])
            .collect();
        let weekly = RawTable {
            headers: vec!["Issue Date".into(), "Song".into(), "Artist(s)".into()],
            rows,
        };
        let unrelated = table(&["Rank", "Name"], vec![vec!["1", "Someone"]; 80]);

        let result = extract_weekly_rows(&[weekly, unrelated]).expect("weekly table should qualify");

        assert_eq!(result.len(), 50);
        assert_eq!(
            result.rows[7],
            WeeklyRow {
                issue_date: "Week 7".into(),
                song: "Song 7".into(),
                artist: "Artist 7".into(),
            }
        );
    }

    #[test]
    fn test_no_qualifying_table() {
        let tables = [
            table(&["Rank", "Name"], vec![vec!["1", "x"]]),
            // "date" without "issue" is not enough
            table(&["Date", "Song"], vec![vec!["1", "x"]]),
        ];
        assert!(extract_weekly_rows(&tables).is_none());
        assert!(extract_weekly_rows(&[]).is_none());
    }

    #[test]
    fn test_missing_artist_column_and_incomplete_rows() {
        let t = table(
            &["No.", " ISSUE DATE ", "Song title"],
            vec![
                vec!["1", "January 6", "Hold On"],
                vec!["2", "", "Orphan"],
                vec!["3", "January 20", ""],
                vec!["4", "January 27"],
            ],
        );

        let result = extract_weekly_rows(&[t]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0].song, "Hold On");
        assert_eq!(result.rows[0].artist, "");
    }

    #[test]
    fn test_largest_table_wins_and_ties_keep_first() {
        let headers = ["Issue date", "Song", "Artist"];
        let small = table(&headers, vec![vec!["a", "Small", "x"]]);
        let first = table(&headers, vec![vec!["a", "First", "x"], vec!["b", "First", "x"]]);
        let second = table(&headers, vec![vec!["a", "Second", "x"], vec!["b", "Second", "x"]]);

        let result = extract_weekly_rows(&[small, first, second]).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0].song, "First");
    }

    #[test]
    fn test_first_matching_header_is_used() {
        // "Issue date" must not also be taken as the song column
        let t = table(
            &["Issue date (song chart)", "Song", "Artist", "Songwriter"],
            vec![vec!["March 3", "Escapade", "Janet Jackson", "Jam & Lewis"]],
        );
        let result = extract_weekly_rows(&[t]).unwrap();
        assert_eq!(result.rows[0].issue_date, "March 3");
        assert_eq!(result.rows[0].song, "Escapade");
        assert_eq!(result.rows[0].artist, "Janet Jackson");
    }
}
