// src/charts/builder.rs
use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Datelike;

use crate::charts::monthly::{compute_monthly_winners, placeholder_year, MonthlyWinner, WeeklyEntry};
use crate::extractors::table::clean_text;
use crate::extractors::{extract_weekly_rows, parse_issue_date, WeeklyRow, WeeklyTable};
use crate::storage::StorageManager;
use crate::utils::error::{ExtractError, StorageError};
use crate::wiki::models::{ChartConfig, YearRange};
use crate::wiki::PageSource;

/// A per-year page with fewer dated rows than this is not the weekly chart.
pub const MIN_YEARLY_ROWS: usize = 40;

/// Builds the monthly winners of one chart across a range of years.
///
/// Pages and loaded years are memoized for the lifetime of the builder, so each
/// candidate page is requested at most once per chart.
pub struct ChartBuilder<'a, S: PageSource> {
    source: &'a S,
    chart: &'static ChartConfig,
    range: YearRange,
    pages: HashMap<String, Option<WeeklyTable>>, // None: fetch failed or no weekly table
    years: HashMap<i32, Option<Vec<WeeklyEntry>>>,
}

impl<'a, S: PageSource> ChartBuilder<'a, S> {
    pub fn new(source: &'a S, chart: &'static ChartConfig, range: YearRange) -> Self {
        Self {
            source,
            chart,
            range,
            pages: HashMap::new(),
            years: HashMap::new(),
        }
    }

    /// Twelve rows per year in range, in calendar order.
    pub async fn build(mut self) -> Vec<MonthlyWinner> {
        let key = self.chart.key;
        let mut rows = Vec::new();

        for year in self.range.years() {
            if year < self.chart.start_year {
                tracing::debug!("{} did not exist yet in {}", key, year);
                rows.extend(placeholder_year(year));
                continue;
            }

            // Neighbouring years feed the total-weeks tie-break.
            let mut combined = Vec::new();
            let mut loaded_years = 0;
            for neighbour in [year - 1, year, year + 1] {
                if neighbour < self.chart.start_year || !self.range.contains(neighbour) {
                    continue;
                }
                if let Some(entries) = self.load_year(neighbour).await {
                    combined.extend(entries);
                    loaded_years += 1;
                }
            }

            if loaded_years == 0 {
                tracing::warn!("No weekly data for {} around {}; leaving the year blank", key, year);
                rows.extend(placeholder_year(year));
                continue;
            }

            let winners = compute_monthly_winners(&combined, year);
            let filled = winners.iter().filter(|w| !w.is_placeholder()).count();
            tracing::info!("{} {}: {} of 12 months filled from {} weekly rows", key, year, filled, combined.len());
            rows.extend(winners);
        }

        rows
    }

    /// Tries each candidate page for `year` in order; the first usable one wins.
    async fn load_year(&mut self, year: i32) -> Option<Vec<WeeklyEntry>> {
        if let Some(cached) = self.years.get(&year) {
            tracing::debug!("Reusing loaded weeks for {} {}", self.chart.key, year);
            return cached.clone();
        }

        let mut loaded = None;
        for title in self.chart.candidate_titles(year) {
            match self.attempt(&title, year).await {
                Ok(entries) => {
                    tracing::info!("Loaded {} weeks for {} {} from '{}'", entries.len(), self.chart.key, year, title);
                    loaded = Some(entries);
                    break;
                }
                Err(e) => tracing::debug!("Candidate rejected: {}", e),
            }
        }

        if loaded.is_none() {
            tracing::warn!("No usable page for {} {}", self.chart.key, year);
        }
        self.years.insert(year, loaded.clone());
        loaded
    }

    async fn attempt(&mut self, title: &str, year: i32) -> Result<Vec<WeeklyEntry>, ExtractError> {
        let table = self.weekly_table(title).await?;

        // Decade pages carry full dates; per-year pages often leave the year out.
        let decade_paged = self.chart.is_decade_paged();
        let fallback_year = (!decade_paged).then_some(year);

        let mut entries: Vec<WeeklyEntry> = table
            .rows
            .iter()
            .filter_map(|row| to_entry(row, fallback_year))
            .collect();

        if decade_paged {
            entries.retain(|e| e.issue_date.year() == year);
            if entries.is_empty() {
                return Err(ExtractError::NoRowsForYear { title: title.to_string(), year });
            }
        } else if entries.len() < MIN_YEARLY_ROWS {
            return Err(ExtractError::TooFewRows {
                title: title.to_string(),
                rows: entries.len(),
                min: MIN_YEARLY_ROWS,
            });
        }

        Ok(entries)
    }

    async fn weekly_table(&mut self, title: &str) -> Result<WeeklyTable, ExtractError> {
        if let Some(cached) = self.pages.get(title) {
            return cached
                .clone()
                .ok_or_else(|| ExtractError::PreviouslyFailed(title.to_string()));
        }

        let result = match self.source.fetch_tables(title).await {
            Ok(tables) => extract_weekly_rows(&tables)
                .filter(|table| !table.is_empty())
                .ok_or_else(|| ExtractError::NoWeeklyTable(title.to_string())),
            Err(source) => Err(ExtractError::Fetch { title: title.to_string(), source }),
        };

        self.pages.insert(title.to_string(), result.as_ref().ok().cloned());
        result
    }
}

fn to_entry(row: &WeeklyRow, fallback_year: Option<i32>) -> Option<WeeklyEntry> {
    let Some(issue_date) = parse_issue_date(&row.issue_date, fallback_year) else {
        tracing::trace!("Dropping row with unparseable issue date '{}'", row.issue_date);
        return None;
    };
    Some(WeeklyEntry::new(issue_date, row.song.clone(), clean_text(&row.artist)))
}

/// Builds one chart and writes it as CSV, returning the file path.
pub async fn build_chart_csv<S: PageSource>(
    source: &S,
    chart: &'static ChartConfig,
    range: YearRange,
    storage: &StorageManager,
) -> Result<PathBuf, StorageError> {
    let rows = ChartBuilder::new(source, chart, range).build().await;
    storage.save_chart(chart, range, &rows)
}
