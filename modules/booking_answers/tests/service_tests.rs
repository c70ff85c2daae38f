//! Integration tests for the booking answers service

use booking_answers::api::native::NativeClient;
use booking_answers::config::Config;
use booking_answers::contract::*;
use booking_answers::domain::capability::CAPABILITY_UPDATE_BOOKING;
use booking_answers::domain::{
    CapabilityChecker, MockCapabilityChecker, NoOpCapabilityChecker, ResolvedView, Service,
};
use std::sync::Arc;

mod common;
use common::{print_test_header, BOOKED, DELETED, WAITLISTED};

// Mock repository implementations for testing
pub mod mocks {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use booking_answers::domain::repository::{BookingAnswersRepository, BookingOptionRepository};
    use parking_lot::RwLock;
    use std::collections::HashMap;

    /// Returns canned rows and records the views it was asked for
    #[derive(Clone, Default)]
    pub struct MockAnswersRepo {
        rows: Arc<RwLock<Vec<BookingAnswer>>>,
        views: Arc<RwLock<Vec<ResolvedView>>>,
        failing: Arc<RwLock<bool>>,
    }

    impl MockAnswersRepo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_rows(rows: Vec<BookingAnswer>) -> Self {
            let repo = Self::new();
            *repo.rows.write() = rows;
            repo
        }

        pub fn fail(&self) {
            *self.failing.write() = true;
        }

        pub fn last_view(&self) -> Option<ResolvedView> {
            self.views.read().last().cloned()
        }
    }

    #[async_trait]
    impl BookingAnswersRepository for MockAnswersRepo {
        async fn count(&self, _query: &QuerySpec) -> Result<u64> {
            if *self.failing.read() {
                return Err(anyhow!("database is gone"));
            }
            Ok(self.rows.read().len() as u64)
        }

        async fn fetch(
            &self,
            _query: &QuerySpec,
            view: &ResolvedView,
        ) -> Result<Vec<BookingAnswer>> {
            if *self.failing.read() {
                return Err(anyhow!("database is gone"));
            }
            self.views.write().push(view.clone());
            Ok(self.rows.read().clone())
        }
    }

    #[derive(Clone, Default)]
    pub struct MockOptionRepo {
        data: Arc<RwLock<HashMap<i64, OptionTimes>>>,
    }

    impl MockOptionRepo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, option_id: i64, times: OptionTimes) {
            self.data.write().insert(option_id, times);
        }
    }

    #[async_trait]
    impl BookingOptionRepository for MockOptionRepo {
        async fn find_times(&self, option_id: i64) -> Result<Option<OptionTimes>> {
            Ok(self.data.read().get(&option_id).cloned())
        }
    }
}

use mocks::{MockAnswersRepo, MockOptionRepo};

struct Fixture {
    service: Arc<Service>,
    answers: MockAnswersRepo,
    options: MockOptionRepo,
}

fn fixture_with(capabilities: Arc<dyn CapabilityChecker>, config: Config) -> Fixture {
    let answers = MockAnswersRepo::with_rows(vec![answer(1, "Lovelace"), answer(2, "Turing")]);
    let options = MockOptionRepo::new();
    let service = Arc::new(Service::new(
        Arc::new(answers.clone()),
        Arc::new(options.clone()),
        capabilities,
        config,
    ));
    Fixture {
        service,
        answers,
        options,
    }
}

fn granted_fixture() -> Fixture {
    let capabilities = MockCapabilityChecker::new();
    capabilities.grant(CAPABILITY_UPDATE_BOOKING);
    fixture_with(Arc::new(capabilities), Config::default())
}

fn answer(id: i64, last_name: &str) -> BookingAnswer {
    BookingAnswer {
        id,
        user_id: id,
        username: last_name.to_lowercase(),
        first_name: "Test".to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.org", last_name.to_lowercase()),
        waitinglist: BOOKED,
        status: 0,
        notes: None,
        presence_count: None,
        time_modified: 100,
        time_created: 100,
        option_id: 1,
        json: None,
        scope: "option".to_string(),
        user_rank: None,
    }
}

fn request(scope: &str, status_param: i64) -> UsersTableRequest {
    UsersTableRequest {
        scope: scope.to_string(),
        scope_id: 12,
        status_param,
        table_name_prefix: None,
        columns: vec!["firstname".to_string(), "lastname".to_string()],
        headers: vec!["First name".to_string(), "Last name".to_string()],
        sortable: true,
        paginate: true,
    }
}

fn export_request(scope: &str, status_param: i64, encoded_table: String) -> ExportRequest {
    ExportRequest {
        scope: scope.to_string(),
        status_param,
        encoded_table,
        download_format: "xlsx".to_string(),
    }
}

// ===== Table definition =====

#[test]
fn test_users_table_rejects_unknown_scope() {
    print_test_header(
        "test_users_table_rejects_unknown_scope",
        "Scopes outside option, instance, course and system are refused",
    );
    let fx = granted_fixture();

    let result = fx.service.users_table(request("galaxy", BOOKED));
    assert_eq!(
        result,
        Err(BookingAnswersError::InvalidScope {
            scope: "galaxy".to_string()
        })
    );
}

#[test]
fn test_users_table_descriptor() {
    print_test_header(
        "test_users_table_descriptor",
        "Name, cache identity and query of a booked option table",
    );
    let fx = granted_fixture();

    let table = fx.service.users_table(request("option", BOOKED)).unwrap();
    assert_eq!(table.name, "bookedusers_option_12");
    assert_eq!(table.cache_component, "mod_booking");
    assert_eq!(table.cache_key, "bookedusertable");
    assert_eq!(table.columns, vec!["firstname", "lastname"]);
    assert_eq!(table.headers, vec!["First name", "Last name"]);
    assert_eq!(table.query.fields, "s1.*");
    assert_eq!(table.query.predicate, "1 = 1");
    assert_eq!(table.sort.default_column, "lastname");
    assert_eq!(table.fulltext_search_columns, vec!["firstname", "lastname", "email"]);
    assert!(table.use_pages);

    let custom = fx
        .service
        .users_table(UsersTableRequest {
            table_name_prefix: Some("waitinglist".to_string()),
            ..request("course", WAITLISTED)
        })
        .unwrap();
    assert_eq!(custom.name, "waitinglist_course_12");
}

#[test]
fn test_download_offered_for_booked_users_with_capability() {
    print_test_header(
        "test_download_offered_for_booked_users_with_capability",
        "Download buttons need the update capability and the booked status",
    );
    let fx = granted_fixture();

    let table = fx.service.users_table(request("system", BOOKED)).unwrap();
    assert!(table.show_download_button);
    assert!(table.show_download_button_at_bottom);
    assert!(table.download_enabled());
    let base_url = table.base_url.unwrap();
    assert!(base_url.starts_with("http://localhost/mod/booking/download_report2.php?"));
    assert!(base_url.contains("scope=alloptions"));
    assert!(base_url.contains("statusparam=0"));
}

#[test]
fn test_no_download_for_other_statuses() {
    print_test_header(
        "test_no_download_for_other_statuses",
        "Waiting and deleted lists never show download buttons",
    );
    let fx = granted_fixture();

    for status in [WAITLISTED, DELETED] {
        let table = fx.service.users_table(request("option", status)).unwrap();
        assert!(table.base_url.is_some());
        assert!(!table.show_download_button);
        assert!(!table.show_download_button_at_bottom);
        assert!(!table.download_enabled());
    }
}

#[test]
fn test_no_download_without_capability() {
    print_test_header(
        "test_no_download_without_capability",
        "Callers without the update capability get no download endpoint",
    );
    let fx = fixture_with(Arc::new(NoOpCapabilityChecker), Config::default());

    let table = fx.service.users_table(request("option", BOOKED)).unwrap();
    assert_eq!(table.base_url, None);
    assert!(!table.show_download_button);
    assert!(!table.show_download_button_at_bottom);
}

// ===== Export =====

#[test]
fn test_prepare_export_redefines_columns() {
    print_test_header(
        "test_prepare_export_redefines_columns",
        "A restored table carries the export columns and download settings",
    );
    let fx = granted_fixture();
    let table = fx.service.users_table(request("instance", BOOKED)).unwrap();
    let token = fx.service.encode_table(&table).unwrap();

    let export = fx
        .service
        .prepare_export(export_request("instance", BOOKED, token))
        .unwrap();

    assert_eq!(export.name, table.name);
    assert_eq!(export.query, table.query);
    assert_eq!(export.columns.first().map(String::as_str), Some("optionid"));
    assert!(export.columns.contains(&"notes".to_string()));
    assert!(!export.columns.contains(&"presencecount".to_string()));
    assert_eq!(export.columns.len(), export.headers.len());
    let download = export.download.unwrap();
    assert_eq!(download.format, "xlsx");
    assert_eq!(download.file_name, "download");
    assert_eq!(download.sheet_name, "download");
}

#[test]
fn test_prepare_export_rejects_malformed_token() {
    print_test_header(
        "test_prepare_export_rejects_malformed_token",
        "Tokens that do not decode are refused",
    );
    let fx = granted_fixture();

    let result = fx
        .service
        .prepare_export(export_request("option", BOOKED, "not a token!".to_string()));
    assert!(matches!(
        result,
        Err(BookingAnswersError::MalformedTableToken { .. })
    ));
}

#[test]
fn test_prepare_export_rejects_mismatched_request() {
    print_test_header(
        "test_prepare_export_rejects_mismatched_request",
        "Scope and status of the request must match the token",
    );
    let fx = granted_fixture();
    let table = fx.service.users_table(request("option", BOOKED)).unwrap();
    let token = fx.service.encode_table(&table).unwrap();

    let other_scope = fx
        .service
        .prepare_export(export_request("course", BOOKED, token.clone()));
    assert!(matches!(
        other_scope,
        Err(BookingAnswersError::MalformedTableToken { .. })
    ));

    let other_status = fx
        .service
        .prepare_export(export_request("option", WAITLISTED, token));
    assert!(matches!(
        other_status,
        Err(BookingAnswersError::MalformedTableToken { .. })
    ));
}

#[test]
fn test_prepare_export_requires_download() {
    print_test_header(
        "test_prepare_export_requires_download",
        "Only downloadable tables can be exported",
    );
    let fx = granted_fixture();
    let waiting = fx.service.users_table(request("option", WAITLISTED)).unwrap();
    let token = fx.service.encode_table(&waiting).unwrap();

    assert_eq!(
        fx.service
            .prepare_export(export_request("option", WAITLISTED, token)),
        Err(BookingAnswersError::DownloadNotAllowed {
            scope: "option".to_string(),
            status_param: WAITLISTED,
        })
    );

    // Token minted by an authorized caller, replayed without the capability
    let booked = fx.service.users_table(request("option", BOOKED)).unwrap();
    let token = fx.service.encode_table(&booked).unwrap();
    let denied = fixture_with(Arc::new(NoOpCapabilityChecker), Config::default());
    assert!(matches!(
        denied
            .service
            .prepare_export(export_request("option", BOOKED, token)),
        Err(BookingAnswersError::DownloadNotAllowed { .. })
    ));
}

// ===== Rows =====

#[test]
fn test_resolve_view_paging_defaults() {
    print_test_header(
        "test_resolve_view_paging_defaults",
        "Missing or empty page sizes use the configured size",
    );
    let fx = granted_fixture();
    let table = fx.service.users_table(request("option", BOOKED)).unwrap();

    let view = fx.service.resolve_view(&table, &TableView::default());
    assert_eq!(view.limit, Some(20));
    assert_eq!(view.offset, 0);
    assert_eq!(view.order_by, Some(("lastname".to_string(), SortOrder::Asc)));

    let view = fx.service.resolve_view(
        &table,
        &TableView {
            sort: None,
            page: Some(Page { number: 3, size: 0 }),
        },
    );
    assert_eq!(view.limit, Some(20));
    assert_eq!(view.offset, 60);

    let unpaged = fx
        .service
        .users_table(UsersTableRequest {
            paginate: false,
            ..request("option", BOOKED)
        })
        .unwrap();
    let view = fx.service.resolve_view(
        &unpaged,
        &TableView {
            sort: None,
            page: Some(Page { number: 3, size: 5 }),
        },
    );
    assert_eq!(view.limit, None);
    assert_eq!(view.offset, 0);
}

#[test]
fn test_resolve_view_clamps_oversized_pages() {
    print_test_header(
        "test_resolve_view_clamps_oversized_pages",
        "Page size and offset never exceed the listing row cap",
    );
    let fx = granted_fixture();
    let table = fx.service.users_table(request("option", BOOKED)).unwrap();

    let view = fx.service.resolve_view(
        &table,
        &TableView {
            sort: None,
            page: Some(Page {
                number: u64::MAX,
                size: u64::MAX,
            }),
        },
    );
    assert_eq!(view.limit, Some(1_000_000));
    assert_eq!(view.offset, 1_000_000);

    let view = fx.service.resolve_view(
        &table,
        &TableView {
            sort: None,
            page: Some(Page {
                number: 0,
                size: u64::MAX,
            }),
        },
    );
    assert_eq!(view.limit, Some(1_000_000));
    assert_eq!(view.offset, 0);
}

#[test]
fn test_resolve_view_sort_allow_list() {
    print_test_header(
        "test_resolve_view_sort_allow_list",
        "Only sortable columns the query selects are used for ordering",
    );
    let fx = granted_fixture();
    let table = fx.service.users_table(request("option", DELETED)).unwrap();
    let sorted = |column: &str| TableView {
        sort: Some(SortRequest {
            column: column.to_string(),
            order: SortOrder::Asc,
        }),
        page: None,
    };

    let view = fx.service.resolve_view(&table, &sorted("email"));
    assert_eq!(view.order_by, Some(("email".to_string(), SortOrder::Asc)));

    let default = Some(("timemodified".to_string(), SortOrder::Desc));
    assert_eq!(fx.service.resolve_view(&table, &sorted("json")).order_by, default);
    assert_eq!(
        fx.service
            .resolve_view(&table, &sorted("email; DELETE FROM mdl_user"))
            .order_by,
        default
    );

    // Sortable in booked tables, but not selected while presence counting is off
    let booked = fx.service.users_table(request("option", BOOKED)).unwrap();
    assert_eq!(
        fx.service
            .resolve_view(&booked, &sorted("presencecount"))
            .order_by,
        Some(("lastname".to_string(), SortOrder::Asc))
    );
}

#[tokio::test]
async fn test_rows_use_resolved_view() {
    print_test_header(
        "test_rows_use_resolved_view",
        "Pages are windowed, exports fetch everything in default order",
    );
    let fx = granted_fixture();
    let table = fx.service.users_table(request("option", BOOKED)).unwrap();

    assert_eq!(fx.service.count_rows(&table).await.unwrap(), 2);

    let rows = fx
        .service
        .fetch_page(
            &table,
            &TableView {
                sort: None,
                page: Some(Page { number: 1, size: 10 }),
            },
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        fx.answers.last_view(),
        Some(ResolvedView {
            order_by: Some(("lastname".to_string(), SortOrder::Asc)),
            limit: Some(10),
            offset: 10,
        })
    );

    fx.service.export_rows(&table).await.unwrap();
    let view = fx.answers.last_view().unwrap();
    assert_eq!(view.limit, None);
    assert_eq!(view.offset, 0);
}

#[tokio::test]
async fn test_storage_failures_are_internal() {
    print_test_header(
        "test_storage_failures_are_internal",
        "Repository errors surface as internal errors",
    );
    let fx = granted_fixture();
    let table = fx.service.users_table(request("option", BOOKED)).unwrap();
    fx.answers.fail();

    assert_eq!(
        fx.service.count_rows(&table).await,
        Err(BookingAnswersError::Internal)
    );
    assert_eq!(
        fx.service.fetch_page(&table, &TableView::default()).await,
        Err(BookingAnswersError::Internal)
    );
}

// ===== Option fields =====

#[tokio::test]
async fn test_option_time_created() {
    print_test_header(
        "test_option_time_created",
        "New options use the current time, stored options keep theirs",
    );
    let fx = granted_fixture();
    fx.options.insert(
        4,
        OptionTimes {
            time_created: Some(1_600_000_000),
            time_modified: Some(1_700_000_000),
        },
    );
    fx.options.insert(5, OptionTimes::default());

    let before = chrono::Utc::now().timestamp();
    let fresh = fx.service.resolve_option_time_created(None).await.unwrap();
    let zero = fx.service.resolve_option_time_created(Some(0)).await.unwrap();
    let unknown_times = fx.service.resolve_option_time_created(Some(5)).await.unwrap();
    let after = chrono::Utc::now().timestamp();
    for value in [fresh, zero, unknown_times] {
        assert!((before..=after).contains(&value));
    }

    assert_eq!(
        fx.service.resolve_option_time_created(Some(4)).await,
        Ok(1_600_000_000)
    );
    assert_eq!(
        fx.service.resolve_option_time_created(Some(6)).await,
        Err(BookingAnswersError::OptionNotFound { option_id: 6 })
    );
}

// ===== Native client =====

#[tokio::test]
async fn test_native_client_delegates_to_service() {
    print_test_header(
        "test_native_client_delegates_to_service",
        "The native client exposes the service behind the API trait",
    );
    let fx = granted_fixture();
    let client: Arc<dyn BookingAnswersApi> = Arc::new(NativeClient::new(fx.service.clone()));

    let table = client.users_table(request("option", BOOKED)).await.unwrap();
    assert_eq!(client.count_rows(&table).await.unwrap(), 2);

    let token = client.encode_table(&table).await.unwrap();
    let export = client
        .prepare_export(export_request("option", BOOKED, token))
        .await
        .unwrap();
    let rows = client.export_rows(&export).await.unwrap();
    assert_eq!(rows.len(), 2);

    assert!(matches!(
        client.users_table(request("", BOOKED)).await,
        Err(BookingAnswersError::InvalidScope { .. })
    ));
}
