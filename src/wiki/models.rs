// src/wiki/models.rs
use std::fmt;

use clap::ValueEnum;

pub const WIKI_BASE: &str = "https://en.wikipedia.org/wiki/";

pub const DEFAULT_START_YEAR: i32 = 1985;
pub const DEFAULT_END_YEAR: i32 = 2010;

/// The five genre charts, in the order the driver builds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum ChartKey {
    Pop,
    #[value(name = "rock_alt")]
    RockAlt,
    Rnb,
    Hiphop,
    Country,
}

impl ChartKey {
    pub const ALL: [ChartKey; 5] = [
        ChartKey::Pop,
        ChartKey::RockAlt,
        ChartKey::Rnb,
        ChartKey::Hiphop,
        ChartKey::Country,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKey::Pop => "pop",
            ChartKey::RockAlt => "rock_alt",
            ChartKey::Rnb => "rnb",
            ChartKey::Hiphop => "hiphop",
            ChartKey::Country => "country",
        }
    }

    pub fn config(&self) -> &'static ChartConfig {
        match self {
            ChartKey::Pop => &POP,
            ChartKey::RockAlt => &ROCK_ALT,
            ChartKey::Rnb => &RNB,
            ChartKey::Hiphop => &HIPHOP,
            ChartKey::Country => &COUNTRY,
        }
    }
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a chart's Wikipedia pages are split up.
#[derive(Debug, Clone, Copy)]
pub enum PageTitles {
    /// One page per year; `{year}` in each template is replaced.
    Yearly(&'static [&'static str]),
    /// One page per decade, keyed by labels like "1990s".
    ByDecade(&'static [(&'static str, &'static [&'static str])]),
}

#[derive(Debug)]
pub struct ChartConfig {
    pub key: ChartKey,
    pub start_year: i32, // First year the chart existed
    pub pages: PageTitles,
}

impl ChartConfig {
    /// Candidate page titles for `year`, most likely first.
    pub fn candidate_titles(&self, year: i32) -> Vec<String> {
        match self.pages {
            PageTitles::Yearly(templates) => templates
                .iter()
                .map(|t| t.replace("{year}", &year.to_string()))
                .collect(),
            PageTitles::ByDecade(decades) => {
                if year < self.start_year {
                    return Vec::new();
                }
                let decade = format!("{}s", year.div_euclid(10) * 10);
                decades
                    .iter()
                    .find(|(label, _)| *label == decade)
                    .map(|(_, titles)| titles.iter().map(|t| t.to_string()).collect())
                    .unwrap_or_default()
            }
        }
    }

    pub fn is_decade_paged(&self) -> bool {
        matches!(self.pages, PageTitles::ByDecade(_))
    }

    /// Output file name, e.g. `pop_monthly_1985_2010.csv`.
    pub fn outfile(&self, range: YearRange) -> String {
        format!("{}_monthly_{}_{}.csv", self.key, range.start, range.end)
    }
}

/// Inclusive range of years covered by one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self { start: DEFAULT_START_YEAR, end: DEFAULT_END_YEAR }
    }
}

/// Constructs the URL of a Wikipedia article from its title.
pub fn page_url(title: &str) -> String {
    format!("{}{}", WIKI_BASE, title.trim().replace(' ', "_"))
}

// Hot 100 stands in for pop across all years
static POP: ChartConfig = ChartConfig {
    key: ChartKey::Pop,
    start_year: 1985,
    pages: PageTitles::Yearly(&[
        "List of Billboard Hot 100 number-one singles of {year}",
        "List of Billboard Hot 100 number-ones of {year}",
        "Billboard Hot 100 number-one singles of {year}",
    ]),
};

const ROCK_ALT_1980S: &[&str] = &[
    "List of Billboard Alternative Songs number-one singles of the 1980s",
    "Billboard Alternative Songs number-one singles of the 1980s",
];
const ROCK_ALT_1990S: &[&str] = &["List of Billboard Alternative Songs number-one singles of the 1990s"];
const ROCK_ALT_2000S: &[&str] = &["List of Billboard Alternative Songs number-one singles of the 2000s"];

// Modern Rock Tracks starts in September 1988
static ROCK_ALT: ChartConfig = ChartConfig {
    key: ChartKey::RockAlt,
    start_year: 1988,
    pages: PageTitles::ByDecade(&[
        ("1980s", ROCK_ALT_1980S),
        ("1990s", ROCK_ALT_1990S),
        ("2000s", ROCK_ALT_2000S),
    ]),
};

static RNB: ChartConfig = ChartConfig {
    key: ChartKey::Rnb,
    start_year: 1985,
    pages: PageTitles::Yearly(&[
        "List of Hot R&B/Hip-Hop Songs number-one singles of {year}",
        "List of Hot Black Singles number-one singles of {year}",
        "Billboard Hot Black Singles number-one singles of {year}",
    ]),
};

static HIPHOP: ChartConfig = ChartConfig {
    key: ChartKey::Hiphop,
    start_year: 1989,
    pages: PageTitles::Yearly(&[
        "List of Hot Rap Songs number-one singles of {year}",
        "List of Hot Rap Singles number-one singles of {year}",
    ]),
};

static COUNTRY: ChartConfig = ChartConfig {
    key: ChartKey::Country,
    start_year: 1985,
    pages: PageTitles::Yearly(&[
        "List of Hot Country Singles & Tracks number ones of {year}",
        "List of Hot Country Songs number ones of {year}",
        "List of Hot Country Singles number ones of {year}",
        "List of Billboard Hot Country Songs number-one singles of {year}",
    ]),
};
