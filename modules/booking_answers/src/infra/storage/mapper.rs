//! Row to model mappers

use super::entity::booking_option;
use crate::contract::{BookingAnswer, OptionTimes, Projection};
use sea_orm::{DbErr, QueryResult};

/// Read one listing row.
///
/// Optional columns are read only when the query projected them.
pub fn booking_answer_from_row(
    row: &QueryResult,
    projection: Projection,
) -> Result<BookingAnswer, DbErr> {
    let json = row
        .try_get::<Option<String>>("", "json")?
        .filter(|text| !text.trim().is_empty())
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(|e| DbErr::Custom(format!("invalid json column: {}", e)))?;

    let presence_count = if projection.presence_count {
        // No counted dates yields no join row
        Some(row.try_get::<Option<i64>>("", "presencecount")?.unwrap_or(0))
    } else {
        None
    };

    let user_rank = if projection.user_rank {
        Some(row.try_get::<i64>("", "userrank")?)
    } else {
        None
    };

    Ok(BookingAnswer {
        id: row.try_get("", "id")?,
        user_id: row.try_get("", "userid")?,
        username: row.try_get("", "username")?,
        first_name: row.try_get("", "firstname")?,
        last_name: row.try_get("", "lastname")?,
        email: row.try_get("", "email")?,
        waitinglist: row.try_get("", "waitinglist")?,
        status: row.try_get("", "status")?,
        notes: row.try_get("", "notes")?,
        presence_count,
        time_modified: row.try_get("", "timemodified")?,
        time_created: row.try_get("", "timecreated")?,
        option_id: row.try_get("", "optionid")?,
        json,
        scope: row.try_get("", "scope")?,
        user_rank,
    })
}

impl From<booking_option::Model> for OptionTimes {
    fn from(model: booking_option::Model) -> Self {
        Self {
            time_created: Some(model.timecreated).filter(|t| *t > 0),
            time_modified: Some(model.timemodified).filter(|t| *t > 0),
        }
    }
}
