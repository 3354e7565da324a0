// src/charts/mod.rs
pub mod builder;
pub mod monthly;

pub use builder::build_chart_csv;
