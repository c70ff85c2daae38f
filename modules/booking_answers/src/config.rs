//! Configuration for booking answers module

use crate::contract::BookingStatus;
use anyhow::Context;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;

/// Environment variable prefix, nested keys are separated by `__`
pub const ENV_PREFIX: &str = "BOOKING_ANSWERS_";

/// Booking answers configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional query features
    #[serde(default)]
    pub feature_flags: FeatureFlags,

    /// Stored waiting list values
    #[serde(default)]
    pub status_codes: StatusCodes,

    /// Prefix of database table names
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,

    /// Prefix of generated table names
    #[serde(default = "default_table_name_prefix")]
    pub table_name_prefix: String,

    /// Absolute URL of the download endpoint
    #[serde(default = "default_download_url")]
    pub download_url: String,

    /// File and sheet name of exports
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,

    /// Rows per page when the renderer does not ask for a size
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feature_flags: FeatureFlags::default(),
            status_codes: StatusCodes::default(),
            table_prefix: default_table_prefix(),
            table_name_prefix: default_table_name_prefix(),
            download_url: default_download_url(),
            export_file_name: default_export_file_name(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file overridden by `BOOKING_ANSWERS_*` variables
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let figment = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config: Self = figment
            .extract()
            .context("invalid booking answers configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.download_url)
            .with_context(|| format!("download_url '{}' is not an absolute URL", self.download_url))?;
        if self.page_size == 0 {
            anyhow::bail!("page_size must be greater than zero");
        }
        Ok(())
    }
}

/// Optional query features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureFlags {
    /// Count presence-date answers per user and option
    #[serde(default)]
    pub presence_counter_enabled: bool,

    /// Presence status value that counts as present
    #[serde(default = "default_presence_counted_status")]
    pub presence_counted_status: i64,

    /// Show each user's place on the waiting list of an option
    #[serde(default)]
    pub waitlist_rank_enabled: bool,

    /// How the waiting list place is computed
    #[serde(default)]
    pub rank_strategy: RankStrategy,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            presence_counter_enabled: false,
            presence_counted_status: default_presence_counted_status(),
            waitlist_rank_enabled: false,
            rank_strategy: RankStrategy::default(),
        }
    }
}

/// Waiting list rank computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankStrategy {
    /// Count of earlier rows per row, portable to every engine
    #[default]
    CorrelatedSubquery,
    /// `ROW_NUMBER()` window, for engines with window functions
    WindowFunction,
}

/// Stored waiting list values with a symbolic meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusCodes {
    #[serde(default = "default_booked")]
    pub booked: i64,
    #[serde(default = "default_waitlisted")]
    pub waitlisted: i64,
    #[serde(default = "default_deleted")]
    pub deleted: i64,
}

impl Default for StatusCodes {
    fn default() -> Self {
        Self {
            booked: default_booked(),
            waitlisted: default_waitlisted(),
            deleted: default_deleted(),
        }
    }
}

impl StatusCodes {
    /// Symbolic meaning of a stored value; unknown values are kept as `Other`
    pub fn classify(&self, code: i64) -> BookingStatus {
        if code == self.booked {
            BookingStatus::Booked
        } else if code == self.waitlisted {
            BookingStatus::Waitlisted
        } else if code == self.deleted {
            BookingStatus::Deleted
        } else {
            BookingStatus::Other(code)
        }
    }
}

fn default_table_prefix() -> String {
    "mdl_".to_string()
}

fn default_table_name_prefix() -> String {
    "bookedusers".to_string()
}

fn default_download_url() -> String {
    "http://localhost/mod/booking/download_report2.php".to_string()
}

fn default_export_file_name() -> String {
    "download".to_string()
}

fn default_page_size() -> u64 {
    20
}

fn default_presence_counted_status() -> i64 {
    1
}

fn default_booked() -> i64 {
    0
}

fn default_waitlisted() -> i64 {
    2
}

fn default_deleted() -> i64 {
    5
}
