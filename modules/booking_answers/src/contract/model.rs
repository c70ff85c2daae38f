//! Contract models for booking answers
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - the encoded table token has its own DTO.

use super::error::BookingAnswersError;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Granularity at which a listing is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A single booking option
    Option,
    /// A booking instance (course module)
    Instance,
    /// All booking instances of a course
    Course,
    /// Whole site
    System,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Scope::Option, Scope::Instance, Scope::Course, Scope::System];

    /// Literal written into the generated query as the `scope` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Option => "option",
            Self::Instance => "instance",
            Self::Course => "course",
            Self::System => "system",
        }
    }

    /// Name of the handler serving this scope, carried by download URLs
    pub fn handler_name(&self) -> &'static str {
        match self {
            Self::Option => "option",
            Self::Instance => "instance",
            Self::Course => "course",
            Self::System => "alloptions",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = BookingAnswersError;

    /// Accepts the scope literal or the handler name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s || scope.handler_name() == s)
            .ok_or_else(|| BookingAnswersError::InvalidScope {
                scope: s.to_string(),
            })
    }
}

/// Symbolic meaning of a stored waiting list value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Booked,
    Waitlisted,
    Deleted,
    /// Any other stored value, kept as is
    Other(i64),
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Columns the generated query projects in addition to the base answer columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Projection {
    /// `presencecount` is selected
    pub presence_count: bool,
    /// `userrank` is selected
    pub user_rank: bool,
}

/// Fully parameterized listing query
///
/// `source` is a derived table expression; table names are written as
/// `{name}` and parameters as `:name`, both resolved by the executing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// Field list over the derived table
    pub fields: String,
    /// Derived table expression, already filtered and ordered
    pub source: String,
    /// Outer predicate
    pub predicate: String,
    /// Named parameters in binding order
    pub params: IndexMap<String, i64>,
    /// Optional columns present in `source`
    pub projection: Projection,
}

/// Default sort and sortable columns for a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPolicy {
    pub default_column: String,
    pub default_order: SortOrder,
    /// Column key -> display label
    pub sortable_columns: IndexMap<String, String>,
}

impl SortPolicy {
    /// Whether a renderer may sort by `column`
    pub fn allows(&self, column: &str) -> bool {
        column == self.default_column || self.sortable_columns.contains_key(column)
    }
}

/// Export settings of a descriptor that is being downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Requested format, e.g. `csv` or `excel`
    pub format: String,
    pub file_name: String,
    pub sheet_name: String,
}

/// Declarative table consumed by the paginated table renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Unique table name: `{prefix}_{scope}_{scope_id}`
    pub name: String,
    pub cache_component: String,
    pub cache_key: String,
    pub scope: Scope,
    pub scope_id: i64,
    pub status_param: i64,
    pub columns: Vec<String>,
    /// Same cardinality as `columns`
    pub headers: Vec<String>,
    pub query: QuerySpec,
    pub sortable_rows: bool,
    pub use_pages: bool,
    pub sort: SortPolicy,
    pub fulltext_search_columns: Vec<String>,
    /// Download endpoint, set when the caller may download
    pub base_url: Option<String>,
    pub show_download_button: bool,
    pub show_download_button_at_bottom: bool,
    /// Set while the descriptor is being exported
    pub download: Option<Download>,
}

impl TableDescriptor {
    /// Whether a download affordance is offered
    pub fn download_enabled(&self) -> bool {
        self.show_download_button
    }
}

/// Request for a users table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersTableRequest {
    /// Scope literal or handler name
    pub scope: String,
    /// optionid | cmid | courseid | 0
    pub scope_id: i64,
    /// Stored waiting list value to list
    pub status_param: i64,
    /// Overrides the configured table name prefix
    pub table_name_prefix: Option<String>,
    pub columns: Vec<String>,
    pub headers: Vec<String>,
    pub sortable: bool,
    pub paginate: bool,
}

/// Request issued by the download endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub scope: String,
    pub status_param: i64,
    /// Opaque token produced when the table was rendered
    pub encoded_table: String,
    pub download_format: String,
}

/// Sort requested by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRequest {
    pub column: String,
    pub order: SortOrder,
}

/// Zero-based page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

/// Per-request view of a table: sort and page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub sort: Option<SortRequest>,
    pub page: Option<Page>,
}

/// One row of a booking answers listing
#[derive(Debug, Clone, PartialEq)]
pub struct BookingAnswer {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Stored waiting list value
    pub waitinglist: i64,
    /// Presence status
    pub status: i64,
    pub notes: Option<String>,
    /// Present only when the presence counter is enabled
    pub presence_count: Option<i64>,
    pub time_modified: i64,
    pub time_created: i64,
    pub option_id: i64,
    pub json: Option<serde_json::Value>,
    /// Scope the listing was requested for
    pub scope: String,
    /// Position on the waiting list, 1 = earliest
    pub user_rank: Option<i64>,
}

/// Stored timestamps of a booking option (unix seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionTimes {
    pub time_created: Option<i64>,
    pub time_modified: Option<i64>,
}
