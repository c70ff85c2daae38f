//! Table descriptor assembly

use super::capability::{CapabilityChecker, CAPABILITY_UPDATE_BOOKING};
use crate::config::Config;
use crate::contract::{BookingStatus, QuerySpec, Scope, SortPolicy, TableDescriptor};
use url::Url;

pub const CACHE_COMPONENT: &str = "mod_booking";
pub const CACHE_KEY: &str = "bookedusertable";
pub const FULLTEXT_SEARCH_COLUMNS: [&str; 3] = ["firstname", "lastname", "email"];

/// Caller's choice of columns and table behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub scope: Scope,
    pub scope_id: i64,
    pub status_param: i64,
    pub table_name_prefix: String,
    pub columns: Vec<String>,
    pub headers: Vec<String>,
    pub sortable: bool,
    pub paginate: bool,
}

/// Compose the renderer's table descriptor.
///
/// Headers are aligned to columns: a missing header falls back to the
/// column key, surplus headers are dropped. A caller holding the update
/// capability gets the download endpoint as base URL; the download buttons
/// are only offered for booked users.
pub fn assemble_table(
    layout: TableLayout,
    query: QuerySpec,
    sort: SortPolicy,
    capabilities: &dyn CapabilityChecker,
    config: &Config,
) -> TableDescriptor {
    let headers = layout
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| layout.headers.get(i).unwrap_or(column).clone())
        .collect();

    let mut table = TableDescriptor {
        name: format!(
            "{}_{}_{}",
            layout.table_name_prefix, layout.scope, layout.scope_id
        ),
        cache_component: CACHE_COMPONENT.to_string(),
        cache_key: CACHE_KEY.to_string(),
        scope: layout.scope,
        scope_id: layout.scope_id,
        status_param: layout.status_param,
        columns: layout.columns,
        headers,
        query,
        sortable_rows: layout.sortable,
        use_pages: layout.paginate,
        sort,
        fulltext_search_columns: FULLTEXT_SEARCH_COLUMNS.map(String::from).to_vec(),
        base_url: None,
        show_download_button: false,
        show_download_button_at_bottom: false,
        download: None,
    };

    if capabilities.has_capability(CAPABILITY_UPDATE_BOOKING, layout.scope_id) {
        table.base_url = download_base_url(&config.download_url, layout.scope, layout.status_param);

        // Download is supported for booked users only.
        if config.status_codes.classify(layout.status_param) == BookingStatus::Booked {
            table.show_download_button = true;
            table.show_download_button_at_bottom = true;
        }
    }

    table
}

fn download_base_url(download_url: &str, scope: Scope, status_param: i64) -> Option<String> {
    let mut url = match Url::parse(download_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(download_url, error = %e, "download url is not usable");
            return None;
        }
    };
    url.query_pairs_mut()
        .append_pair("scope", scope.handler_name())
        .append_pair("statusparam", &status_param.to_string());
    Some(url.to_string())
}
