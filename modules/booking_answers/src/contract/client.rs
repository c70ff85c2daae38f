//! Native client trait for inter-module communication
//!
//! This trait defines the API that page controllers and the download endpoint
//! use to obtain booking answers tables. NO HTTP - direct function calls.

use super::{
    error::BookingAnswersError,
    model::{BookingAnswer, ExportRequest, TableDescriptor, TableView, UsersTableRequest},
};
use async_trait::async_trait;

/// Booking answers API for inter-module communication
#[async_trait]
pub trait BookingAnswersApi: Send + Sync {
    // ===== Table definition =====

    /// Build the table of users with a certain status in a scope
    async fn users_table(
        &self,
        request: UsersTableRequest,
    ) -> Result<TableDescriptor, BookingAnswersError>;

    /// Restore a rendered table for download and re-define its columns
    async fn prepare_export(
        &self,
        request: ExportRequest,
    ) -> Result<TableDescriptor, BookingAnswersError>;

    /// Encode a table so that the download endpoint can restore it
    async fn encode_table(&self, table: &TableDescriptor) -> Result<String, BookingAnswersError>;

    // ===== Rows =====

    /// Total number of rows of a table
    async fn count_rows(&self, table: &TableDescriptor) -> Result<u64, BookingAnswersError>;

    /// One sorted page of rows
    async fn fetch_page(
        &self,
        table: &TableDescriptor,
        view: &TableView,
    ) -> Result<Vec<BookingAnswer>, BookingAnswersError>;

    /// All rows in default order, for export
    async fn export_rows(
        &self,
        table: &TableDescriptor,
    ) -> Result<Vec<BookingAnswer>, BookingAnswersError>;

    // ===== Option fields =====

    /// Creation timestamp to store when an option form is saved
    async fn resolve_option_time_created(
        &self,
        option_id: Option<i64>,
    ) -> Result<i64, BookingAnswersError>;
}
