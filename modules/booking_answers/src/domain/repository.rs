//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{BookingAnswer, OptionTimes, QuerySpec, SortOrder};
use anyhow::Result;
use async_trait::async_trait;

/// Sort and window applied on top of a listing query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedView {
    /// Column known to be selected by the query, with direction
    pub order_by: Option<(String, SortOrder)>,
    /// `None` fetches every row
    pub limit: Option<u64>,
    pub offset: u64,
}

/// Executes booking answers listing queries
#[async_trait]
pub trait BookingAnswersRepository: Send + Sync {
    /// Number of rows the query yields
    async fn count(&self, query: &QuerySpec) -> Result<u64>;

    /// Rows of the query, sorted and windowed by `view`
    async fn fetch(&self, query: &QuerySpec, view: &ResolvedView) -> Result<Vec<BookingAnswer>>;
}

/// Repository for booking options
#[async_trait]
pub trait BookingOptionRepository: Send + Sync {
    /// Stored timestamps of an option
    async fn find_times(&self, option_id: i64) -> Result<Option<OptionTimes>>;
}
