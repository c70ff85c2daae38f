//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    BookingAnswer, BookingAnswersApi, BookingAnswersError, ExportRequest, TableDescriptor,
    TableView, UsersTableRequest,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BookingAnswersApi for NativeClient {
    async fn users_table(
        &self,
        request: UsersTableRequest,
    ) -> Result<TableDescriptor, BookingAnswersError> {
        self.service.users_table(request)
    }

    async fn prepare_export(
        &self,
        request: ExportRequest,
    ) -> Result<TableDescriptor, BookingAnswersError> {
        self.service.prepare_export(request)
    }

    async fn encode_table(&self, table: &TableDescriptor) -> Result<String, BookingAnswersError> {
        self.service.encode_table(table)
    }

    async fn count_rows(&self, table: &TableDescriptor) -> Result<u64, BookingAnswersError> {
        self.service.count_rows(table).await
    }

    async fn fetch_page(
        &self,
        table: &TableDescriptor,
        view: &TableView,
    ) -> Result<Vec<BookingAnswer>, BookingAnswersError> {
        self.service.fetch_page(table, view).await
    }

    async fn export_rows(
        &self,
        table: &TableDescriptor,
    ) -> Result<Vec<BookingAnswer>, BookingAnswersError> {
        self.service.export_rows(table).await
    }

    async fn resolve_option_time_created(
        &self,
        option_id: Option<i64>,
    ) -> Result<i64, BookingAnswersError> {
        self.service.resolve_option_time_created(option_id).await
    }
}
