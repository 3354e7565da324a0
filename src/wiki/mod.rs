// src/wiki/mod.rs
pub mod client;
pub mod models;

use crate::extractors::RawTable;
use crate::utils::error::WikiError;

pub use client::WikiClient;

/// Anything that can turn a page title into the tables on that page.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_tables(&self, title: &str) -> Result<Vec<RawTable>, WikiError>;
}
