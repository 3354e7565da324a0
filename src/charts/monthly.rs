// src/charts/monthly.rs
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Month, NaiveDate};

/// One week at number one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyEntry {
    pub issue_date: NaiveDate,
    pub song: String,
    pub artist: String,
}

impl WeeklyEntry {
    pub fn new(issue_date: NaiveDate, song: impl Into<String>, artist: impl Into<String>) -> Self {
        Self { issue_date, song: song.into(), artist: artist.into() }
    }
}

/// The song chosen for one chart-month. Empty song and artist mean no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyWinner {
    pub year: i32,
    pub month: u32, // 1-12
    pub song: String,
    pub artist: String,
}

impl MonthlyWinner {
    pub fn placeholder(year: i32, month: u32) -> Self {
        Self { year, month, song: String::new(), artist: String::new() }
    }

    pub fn is_placeholder(&self) -> bool {
        self.song.is_empty() && self.artist.is_empty()
    }

    /// English month name, e.g. "January".
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }
}

/// Twelve empty rows for a year without data.
pub fn placeholder_year(year: i32) -> Vec<MonthlyWinner> {
    (1..=12).map(|month| MonthlyWinner::placeholder(year, month)).collect()
}

#[derive(Debug)]
struct Candidate<'a> {
    song: &'a str,
    artist: &'a str,
    weeks_in_month: usize,
    total_weeks: usize,
    first_in_month: NaiveDate,
}

/// Picks a winner for each month of `year`.
///
/// `entries` should cover `year - 1` through `year + 1`; anything outside that
/// window is ignored. Candidates are ranked by weeks at number one within the
/// month, then by the song's total weeks across the window (artist ignored),
/// then by the earliest week in the month. Groups are visited in (song, artist)
/// order and the sort is stable, so exact ties resolve alphabetically.
pub fn compute_monthly_winners(entries: &[WeeklyEntry], year: i32) -> Vec<MonthlyWinner> {
    let window: Vec<&WeeklyEntry> = entries
        .iter()
        .filter(|e| (year - 1..=year + 1).contains(&e.issue_date.year()))
        .collect();

    let mut total_weeks: HashMap<&str, usize> = HashMap::new();
    for entry in &window {
        *total_weeks.entry(entry.song.as_str()).or_default() += 1;
    }

    (1..=12)
        .map(|month| {
            let mut groups: BTreeMap<(&str, &str), (usize, NaiveDate)> = BTreeMap::new();
            for entry in window
                .iter()
                .filter(|e| e.issue_date.year() == year && e.issue_date.month() == month)
            {
                let group = groups
                    .entry((entry.song.as_str(), entry.artist.as_str()))
                    .or_insert((0, entry.issue_date));
                group.0 += 1;
                group.1 = group.1.min(entry.issue_date);
            }

            let mut candidates: Vec<Candidate> = groups
                .into_iter()
                .map(|((song, artist), (weeks_in_month, first_in_month))| Candidate {
                    song,
                    artist,
                    weeks_in_month,
                    total_weeks: total_weeks.get(song).copied().unwrap_or(0),
                    first_in_month,
                })
                .collect();

            candidates.sort_by(|a, b| {
                b.weeks_in_month
                    .cmp(&a.weeks_in_month)
                    .then(b.total_weeks.cmp(&a.total_weeks))
                    .then(a.first_in_month.cmp(&b.first_in_month))
            });

            match candidates.first() {
                Some(winner) => {
                    tracing::trace!("{}-{:02} winner: {:?}", year, month, winner);
                    MonthlyWinner {
                        year,
                        month,
                        song: winner.song.trim().to_string(),
                        artist: winner.artist.trim().to_string(),
                    }
                }
                None => MonthlyWinner::placeholder(year, month),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(y: i32, m: u32, d: u32, song: &str, artist: &str) -> WeeklyEntry {
        WeeklyEntry::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), song, artist)
    }

    fn winner_for(entries: &[WeeklyEntry], year: i32, month: u32) -> MonthlyWinner {
        compute_monthly_winners(entries, year)[month as usize - 1].clone()
    }

    #[test]
    fn test_always_twelve_months_in_order() {
        let entries = vec![week(1990, 6, 2, "Vogue", "Madonna")];
        let winners = compute_monthly_winners(&entries, 1990);

        assert_eq!(winners.len(), 12);
        for (idx, w) in winners.iter().enumerate() {
            assert_eq!(w.year, 1990);
            assert_eq!(w.month, idx as u32 + 1);
        }
        assert_eq!(winners[0].month_name(), "January");
        assert_eq!(winners[11].month_name(), "December");

        assert_eq!(compute_monthly_winners(&[], 1990).len(), 12);
    }

    #[test]
    fn test_empty_month_is_placeholder() {
        let entries = vec![week(1990, 6, 2, "Vogue", "Madonna")];
        let january = winner_for(&entries, 1990, 1);
        assert_eq!(january.song, "");
        assert_eq!(january.artist, "");
        assert!(january.is_placeholder());
        assert!(!winner_for(&entries, 1990, 6).is_placeholder());
    }

    #[test]
    fn test_most_weeks_in_month_wins() {
        let entries = vec![
            week(1990, 3, 3, "Escapade", "Janet Jackson"),
            week(1990, 3, 10, "Escapade", "Janet Jackson"),
            week(1990, 3, 17, "Black Velvet", "Alannah Myles"),
        ];
        assert_eq!(winner_for(&entries, 1990, 3).song, "Escapade");
    }

    #[test]
    fn test_total_weeks_breaks_month_tie() {
        // A: 3 weeks in March, 5 in total. B: 3 weeks in March, 8 in total.
        let mut entries = vec![
            week(1990, 3, 1, "A", "Artist A"),
            week(1990, 3, 2, "A", "Artist A"),
            week(1990, 3, 3, "A", "Artist A"),
            week(1990, 2, 10, "A", "Artist A"),
            week(1990, 2, 17, "A", "Artist A"),
            week(1990, 3, 10, "B", "Artist B"),
            week(1990, 3, 11, "B", "Artist B"),
            week(1990, 3, 12, "B", "Artist B"),
        ];
        for day in 1..=5 {
            entries.push(week(1989, 11, day, "B", "Artist B"));
        }

        assert_eq!(winner_for(&entries, 1990, 3).song, "B");
        entries.reverse();
        assert_eq!(winner_for(&entries, 1990, 3).song, "B");
    }

    #[test]
    fn test_earliest_first_week_breaks_remaining_tie() {
        let mut entries = vec![
            week(1990, 3, 10, "B", "Artist B"),
            week(1990, 3, 24, "B", "Artist B"),
            week(1990, 3, 3, "A", "Artist A"),
            week(1990, 3, 17, "A", "Artist A"),
        ];
        assert_eq!(winner_for(&entries, 1990, 3).song, "A");
        entries.reverse();
        assert_eq!(winner_for(&entries, 1990, 3).song, "A");
    }

    #[test]
    fn test_total_weeks_ignore_artist_and_stay_in_window() {
        let entries = vec![
            week(1990, 5, 5, "Vogue", "Madonna"),
            week(1990, 5, 12, "Vogue", "Madonna"),
            week(1990, 5, 19, "Hold On", "En Vogue"),
            week(1990, 5, 26, "Hold On", "En Vogue"),
            // Same title, different act, still counts toward "Hold On"
            week(1990, 6, 9, "Hold On", "Wilson Phillips"),
            // Outside the 1989-1991 window, so never counted
            week(1987, 1, 3, "Vogue", "Madonna"),
            week(1987, 1, 10, "Vogue", "Madonna"),
        ];

        let may = winner_for(&entries, 1990, 5);
        assert_eq!(may.song, "Hold On");
        assert_eq!(may.artist, "En Vogue");
    }

    #[test]
    fn test_only_target_year_months_are_filled() {
        let entries = vec![
            week(1989, 12, 30, "Another Day in Paradise", "Phil Collins"),
            week(1991, 1, 5, "Justify My Love", "Madonna"),
        ];
        assert!(compute_monthly_winners(&entries, 1990).iter().all(MonthlyWinner::is_placeholder));
    }

    #[test]
    fn test_winner_text_is_trimmed() {
        let entries = vec![week(1990, 4, 7, "  Black Velvet ", " Alannah Myles\n")];
        let april = winner_for(&entries, 1990, 4);
        assert_eq!(april.song, "Black Velvet");
        assert_eq!(april.artist, "Alannah Myles");
    }

    #[test]
    fn test_deterministic() {
        let entries = vec![
            week(1990, 8, 4, "Vision of Love", "Mariah Carey"),
            week(1990, 8, 11, "Vision of Love", "Mariah Carey"),
            week(1990, 8, 18, "If Wishes Came True", "Sweet Sensation"),
            week(1990, 8, 25, "Blaze of Glory", "Jon Bon Jovi"),
        ];
        let first = compute_monthly_winners(&entries, 1990);
        for _ in 0..5 {
            assert_eq!(compute_monthly_winners(&entries, 1990), first);
        }
    }
}
