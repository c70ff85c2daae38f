//! Booking option form fields handled by this module

use crate::contract::OptionTimes;

/// Creation timestamp to store when an option form is saved.
///
/// New options (`stored` is `None`) are created now. Existing options keep
/// their creation time; options saved before the field existed fall back to
/// their last modification, and to now if that is unknown too.
pub fn resolve_time_created(stored: Option<&OptionTimes>, now: i64) -> i64 {
    let Some(stored) = stored else {
        return now;
    };
    stored
        .time_created
        .filter(|t| *t > 0)
        .or(stored.time_modified.filter(|t| *t > 0))
        .unwrap_or(now)
}
