//! Sortable columns and default sort per listing status

use crate::config::FeatureFlags;
use crate::contract::{BookingStatus, Scope, SortOrder, SortPolicy};
use indexmap::IndexMap;

fn labelled(columns: &[(&str, &str)]) -> IndexMap<String, String> {
    columns
        .iter()
        .map(|(key, label)| (key.to_string(), label.to_string()))
        .collect()
}

const NAME_COLUMNS: [(&str, &str); 3] = [
    ("firstname", "First name"),
    ("lastname", "Last name"),
    ("email", "Email"),
];

/// Default sort and sortable columns of a listing.
///
/// Waiting lists of a single option are ordered by place only when the
/// place is shown; such tables offer no other sortable column.
pub fn sortable_columns_for(
    status: BookingStatus,
    scope: Scope,
    waitlist_rank_enabled: bool,
) -> SortPolicy {
    let by_last_name = |sortable_columns| SortPolicy {
        default_column: "lastname".to_string(),
        default_order: SortOrder::Asc,
        sortable_columns,
    };

    match status {
        BookingStatus::Deleted => {
            let mut columns = labelled(&NAME_COLUMNS);
            columns.insert("timemodified".to_string(), "Time modified".to_string());
            SortPolicy {
                default_column: "timemodified".to_string(),
                default_order: SortOrder::Desc,
                sortable_columns: columns,
            }
        }
        BookingStatus::Booked => {
            let mut columns = labelled(&NAME_COLUMNS);
            columns.insert("status".to_string(), "Presence".to_string());
            columns.insert("presencecount".to_string(), "Presence count".to_string());
            by_last_name(columns)
        }
        BookingStatus::Waitlisted if waitlist_rank_enabled && scope == Scope::Option => {
            SortPolicy {
                default_column: "userrank".to_string(),
                default_order: SortOrder::Asc,
                sortable_columns: IndexMap::new(),
            }
        }
        BookingStatus::Waitlisted | BookingStatus::Other(_) => {
            by_last_name(labelled(&NAME_COLUMNS))
        }
    }
}

/// Columns and headers of a downloaded listing, in display order.
///
/// Only booked listings can be downloaded.
pub fn export_columns(flags: &FeatureFlags) -> IndexMap<String, String> {
    let mut columns = labelled(&[("optionid", "Booking option")]);
    columns.extend(labelled(&NAME_COLUMNS));

    columns.insert("status".to_string(), "Presence".to_string());
    if flags.presence_counter_enabled {
        columns.insert("presencecount".to_string(), "Presence count".to_string());
    }
    columns.insert("notes".to_string(), "Notes".to_string());
    columns.insert("timecreated".to_string(), "Time booked".to_string());
    columns
}
