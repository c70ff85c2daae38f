//! Domain service - business logic orchestration

use super::capability::CapabilityChecker;
use super::export::TableToken;
use super::option_fields::resolve_time_created;
use super::query::{selects_column, QueryBuilder, ENGINE_ROW_CAP};
use super::repository::{BookingAnswersRepository, BookingOptionRepository, ResolvedView};
use super::sorting::{export_columns, sortable_columns_for};
use super::table::{assemble_table, TableLayout};
use crate::config::Config;
use crate::contract::{
    BookingAnswer, BookingAnswersError, Download, ExportRequest, Scope, SortOrder,
    TableDescriptor, TableView, UsersTableRequest,
};
use std::sync::Arc;

/// Domain service for booking answers tables
pub struct Service {
    answers_repo: Arc<dyn BookingAnswersRepository>,
    options_repo: Arc<dyn BookingOptionRepository>,
    capabilities: Arc<dyn CapabilityChecker>,
    queries: QueryBuilder,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        answers_repo: Arc<dyn BookingAnswersRepository>,
        options_repo: Arc<dyn BookingOptionRepository>,
        capabilities: Arc<dyn CapabilityChecker>,
        config: Config,
    ) -> Self {
        Self {
            answers_repo,
            options_repo,
            capabilities,
            queries: QueryBuilder::new(config.feature_flags, config.status_codes),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Table definition =====

    /// Table of users with a certain status in a scope
    pub fn users_table(
        &self,
        request: UsersTableRequest,
    ) -> Result<TableDescriptor, BookingAnswersError> {
        let scope: Scope = request.scope.parse()?;

        Ok(self.build_table(TableLayout {
            scope,
            scope_id: request.scope_id,
            status_param: request.status_param,
            table_name_prefix: request
                .table_name_prefix
                .unwrap_or_else(|| self.config.table_name_prefix.clone()),
            columns: request.columns,
            headers: request.headers,
            sortable: request.sortable,
            paginate: request.paginate,
        }))
    }

    /// Restore a rendered table for download.
    ///
    /// Columns and headers are re-defined from the export column set of
    /// booked listings; the query is rebuilt from the token's identity.
    pub fn prepare_export(
        &self,
        request: ExportRequest,
    ) -> Result<TableDescriptor, BookingAnswersError> {
        let scope: Scope = request.scope.parse()?;
        let layout = TableToken::decode(&request.encoded_table)?.into_layout()?;

        if layout.scope != scope || layout.status_param != request.status_param {
            tracing::warn!(
                requested_scope = %scope,
                requested_status = request.status_param,
                token_scope = %layout.scope,
                token_status = layout.status_param,
                "Table token does not match download request"
            );
            return Err(BookingAnswersError::MalformedTableToken {
                details: "token does not match the requested scope and status".to_string(),
            });
        }

        let mut table = self.build_table(layout);
        if !table.download_enabled() {
            return Err(BookingAnswersError::DownloadNotAllowed {
                scope: scope.to_string(),
                status_param: request.status_param,
            });
        }

        let columns = export_columns(&self.config.feature_flags);
        table.headers = columns.values().cloned().collect();
        table.columns = columns.into_keys().collect();
        table.download = Some(Download {
            format: request.download_format,
            file_name: self.config.export_file_name.clone(),
            sheet_name: self.config.export_file_name.clone(),
        });

        tracing::info!(table = %table.name, "Prepared booking answers export");
        Ok(table)
    }

    /// Token identifying `table` for the download endpoint
    pub fn encode_table(&self, table: &TableDescriptor) -> Result<String, BookingAnswersError> {
        TableToken::from(table).encode()
    }

    // ===== Rows =====

    /// Total number of rows of a table
    pub async fn count_rows(&self, table: &TableDescriptor) -> Result<u64, BookingAnswersError> {
        self.answers_repo.count(&table.query).await.map_err(|e| {
            tracing::error!(table = %table.name, "Failed to count booking answers: {:?}", e);
            BookingAnswersError::Internal
        })
    }

    /// One page of rows, sorted as requested when the table allows it
    pub async fn fetch_page(
        &self,
        table: &TableDescriptor,
        view: &TableView,
    ) -> Result<Vec<BookingAnswer>, BookingAnswersError> {
        let resolved = self.resolve_view(table, view);
        self.fetch(table, &resolved).await
    }

    /// Every row in the table's default order
    pub async fn export_rows(
        &self,
        table: &TableDescriptor,
    ) -> Result<Vec<BookingAnswer>, BookingAnswersError> {
        let resolved = ResolvedView {
            order_by: self.default_order(table),
            limit: None,
            offset: 0,
        };
        self.fetch(table, &resolved).await
    }

    async fn fetch(
        &self,
        table: &TableDescriptor,
        view: &ResolvedView,
    ) -> Result<Vec<BookingAnswer>, BookingAnswersError> {
        self.answers_repo
            .fetch(&table.query, view)
            .await
            .map_err(|e| {
                tracing::error!(table = %table.name, "Failed to fetch booking answers: {:?}", e);
                BookingAnswersError::Internal
            })
    }

    /// Sort and window of a renderer request.
    ///
    /// Sort columns outside the table's sortable set, or not selected by its
    /// query, fall back to the default sort. Page windows are clamped to the
    /// row cap of the listing query.
    pub fn resolve_view(&self, table: &TableDescriptor, view: &TableView) -> ResolvedView {
        let order_by = match &view.sort {
            Some(sort)
                if table.sort.allows(&sort.column)
                    && selects_column(&table.query, &sort.column) =>
            {
                Some((sort.column.clone(), sort.order))
            }
            Some(sort) => {
                tracing::warn!(
                    table = %table.name,
                    column = %sort.column,
                    "Sort column not allowed, using default sort"
                );
                self.default_order(table)
            }
            None => self.default_order(table),
        };

        if !table.use_pages {
            return ResolvedView {
                order_by,
                limit: None,
                offset: 0,
            };
        }

        let (number, size) = match view.page {
            Some(page) if page.size > 0 => (page.number, page.size),
            Some(page) => (page.number, self.config.page_size),
            None => (0, self.config.page_size),
        };
        // No listing yields more than the engine cap
        let size = size.min(ENGINE_ROW_CAP);
        ResolvedView {
            order_by,
            limit: Some(size),
            offset: number.saturating_mul(size).min(ENGINE_ROW_CAP),
        }
    }

    fn default_order(&self, table: &TableDescriptor) -> Option<(String, SortOrder)> {
        selects_column(&table.query, &table.sort.default_column)
            .then(|| (table.sort.default_column.clone(), table.sort.default_order))
    }

    // ===== Option fields =====

    /// Creation timestamp to store when an option form is saved
    pub async fn resolve_option_time_created(
        &self,
        option_id: Option<i64>,
    ) -> Result<i64, BookingAnswersError> {
        let now = chrono::Utc::now().timestamp();
        let Some(option_id) = option_id.filter(|id| *id > 0) else {
            return Ok(resolve_time_created(None, now));
        };

        let stored = self
            .options_repo
            .find_times(option_id)
            .await
            .map_err(|e| {
                tracing::error!(option_id, "Failed to load booking option: {:?}", e);
                BookingAnswersError::Internal
            })?
            .ok_or(BookingAnswersError::OptionNotFound { option_id })?;

        Ok(resolve_time_created(Some(&stored), now))
    }

    // ===== Helper Methods =====

    fn build_table(&self, layout: TableLayout) -> TableDescriptor {
        let query = self
            .queries
            .build_booking_answers_query(layout.scope, layout.scope_id, layout.status_param);
        let sort = sortable_columns_for(
            self.config.status_codes.classify(layout.status_param),
            layout.scope,
            self.config.feature_flags.waitlist_rank_enabled,
        );
        assemble_table(layout, query, sort, self.capabilities.as_ref(), &self.config)
    }
}
