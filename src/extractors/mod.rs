// src/extractors/mod.rs
pub mod dates;
pub mod table;
pub mod weekly;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use self::{
    dates::parse_issue_date,
    table::{parse_tables, RawTable},
    weekly::{extract_weekly_rows, WeeklyRow, WeeklyTable},
};
