//! Listing query for booking answers
//!
//! The query is a three level derived table:
//! - `s2` selects the raw answer and user columns filtered by status,
//! - the middle level adds the waiting list rank when it is requested,
//! - `s1` carries the ordering the renderer re-sorts on top of.

use crate::config::{FeatureFlags, RankStrategy, StatusCodes};
use crate::contract::{BookingStatus, Projection, QuerySpec, Scope};
use indexmap::IndexMap;

/// Row cap of the innermost subquery. Some engines only accept ordered
/// subqueries with a limit; this is not a pagination mechanism.
pub const ENGINE_ROW_CAP: u64 = 1_000_000;

pub const PARAM_STATUS: &str = "statusparam";
pub const PARAM_STATUS_TO_COUNT: &str = "statustocount";
pub const PARAM_RANK_STATUS: &str = "statusparam2";

const PRESENCE_COUNT_JOIN: &str = "LEFT JOIN (
            SELECT boda.optionid, boda.userid, COUNT(*) AS presencecount
            FROM {booking_optiondates_answers} boda
            WHERE boda.status = :statustocount
            GROUP BY boda.optionid, boda.userid
        ) pcnt
        ON pcnt.optionid = ba.optionid AND pcnt.userid = u.id";

const CORRELATED_RANK: &str = ",
        (
            SELECT COUNT(*)
            FROM (
                SELECT ba.id, ba.timemodified
                FROM {booking_answers} ba
                WHERE ba.waitinglist = :statusparam2
            ) s3
            WHERE (s3.timemodified < s2.timemodified)
                OR (s3.timemodified = s2.timemodified AND s3.id <= s2.id)
        ) AS userrank";

const WINDOW_RANK: &str = ",
        ROW_NUMBER() OVER (ORDER BY s2.timemodified ASC, s2.id ASC) AS userrank";

/// Columns every listing query selects
pub const BASE_COLUMNS: [&str; 14] = [
    "id",
    "userid",
    "username",
    "firstname",
    "lastname",
    "email",
    "waitinglist",
    "status",
    "notes",
    "timemodified",
    "timecreated",
    "optionid",
    "json",
    "scope",
];

const ORDER_BY_NAME: &str = "ORDER BY lastname, firstname, timemodified ASC";
const ORDER_BY_RANK: &str = "ORDER BY userrank ASC";

/// Builds booking answers listing queries for a fixed set of feature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    flags: FeatureFlags,
    codes: StatusCodes,
}

impl QueryBuilder {
    pub fn new(flags: FeatureFlags, codes: StatusCodes) -> Self {
        Self { flags, codes }
    }

    /// Whether listings of `scope` with `status_param` carry a waiting list rank
    pub fn ranks_waitlist(&self, scope: Scope, status_param: i64) -> bool {
        scope == Scope::Option
            && self.codes.classify(status_param) == BookingStatus::Waitlisted
            && self.flags.waitlist_rank_enabled
    }

    /// Query returning one row per booking answer stored with `status_param`.
    ///
    /// Any integer is accepted as status; values that are never stored
    /// simply match nothing. `scope_id` does not narrow the rows: option,
    /// instance and course listings return every answer with the status. The scope is written as a literal taken from
    /// the closed [`Scope`] enumeration.
    pub fn build_booking_answers_query(
        &self,
        scope: Scope,
        scope_id: i64,
        status_param: i64,
    ) -> QuerySpec {
        let mut params = IndexMap::new();
        params.insert(PARAM_STATUS.to_string(), status_param);

        let scope_column = format!("'{}' AS scope", scope.as_str());
        let mut columns = vec![
            "ba.id",
            "u.id AS userid",
            "u.username",
            "u.firstname",
            "u.lastname",
            "u.email",
            "ba.waitinglist",
            "ba.status",
            "ba.notes",
        ];
        let mut joins = String::new();

        let presence_count = self.flags.presence_counter_enabled;
        if presence_count {
            columns.push("pcnt.presencecount");
            joins.push_str("\n        ");
            joins.push_str(PRESENCE_COUNT_JOIN);
            params.insert(
                PARAM_STATUS_TO_COUNT.to_string(),
                self.flags.presence_counted_status,
            );
        }

        columns.extend(["ba.timemodified", "ba.timecreated", "ba.optionid", "ba.json"]);
        columns.push(&scope_column);

        let user_rank = self.ranks_waitlist(scope, status_param);
        let (rank_column, order_by) = if user_rank {
            match self.flags.rank_strategy {
                RankStrategy::CorrelatedSubquery => {
                    // The rank subquery binds the status a second time.
                    params.insert(PARAM_RANK_STATUS.to_string(), status_param);
                    (CORRELATED_RANK, ORDER_BY_RANK)
                }
                RankStrategy::WindowFunction => (WINDOW_RANK, ORDER_BY_RANK),
            }
        } else {
            ("", ORDER_BY_NAME)
        };

        let source = format!(
            "(
    SELECT s2.*{rank_column}
    FROM (
        SELECT
            {columns}
        FROM {{booking_answers}} ba
        JOIN {{user}} u ON ba.userid = u.id{joins}
        WHERE ba.waitinglist = :{PARAM_STATUS}
        LIMIT {ENGINE_ROW_CAP}
    ) s2
    {order_by}
) s1",
            columns = columns.join(",\n            "),
        );

        tracing::debug!(
            scope = %scope,
            scope_id,
            status_param,
            presence_count,
            user_rank,
            "built booking answers query"
        );

        QuerySpec {
            fields: "s1.*".to_string(),
            source,
            predicate: "1 = 1".to_string(),
            params,
            projection: Projection {
                presence_count,
                user_rank,
            },
        }
    }
}

/// Whether the result set of `query` has a column named `column`
pub fn selects_column(query: &QuerySpec, column: &str) -> bool {
    BASE_COLUMNS.contains(&column)
        || (column == "presencecount" && query.projection.presence_count)
        || (column == "userrank" && query.projection.user_rank)
}
