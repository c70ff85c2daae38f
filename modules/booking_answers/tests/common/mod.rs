//! Common test utilities: in-memory database and seed data
#![allow(dead_code)]

use booking_answers::config::{Config, FeatureFlags, RankStrategy};
use booking_answers::infra::storage::entity::{
    booking_answer, booking_option, optiondate_answer, user,
};
use booking_answers::infra::storage::migrations::Migrator;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

pub const BOOKED: i64 = 0;
pub const WAITLISTED: i64 = 2;
pub const DELETED: i64 = 5;

/// Empty sqlite database held by a single connection
pub async fn connect_empty() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    Database::connect(options).await.unwrap()
}

/// Fresh migrated sqlite database
pub async fn connect() -> Arc<DatabaseConnection> {
    let db = connect_empty().await;
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}

pub fn config(presence: bool, rank: bool, strategy: RankStrategy) -> Config {
    Config {
        feature_flags: FeatureFlags {
            presence_counter_enabled: presence,
            waitlist_rank_enabled: rank,
            rank_strategy: strategy,
            ..FeatureFlags::default()
        },
        ..Config::default()
    }
}

pub async fn seed_user(db: &DatabaseConnection, id: i64, firstname: &str, lastname: &str) {
    user::ActiveModel {
        id: Set(id),
        username: Set(format!("{}.{}", firstname, lastname).to_lowercase()),
        firstname: Set(firstname.to_string()),
        lastname: Set(lastname.to_string()),
        email: Set(format!("{}@example.org", firstname.to_lowercase())),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn seed_option(db: &DatabaseConnection, id: i64, timecreated: i64, timemodified: i64) {
    booking_option::ActiveModel {
        id: Set(id),
        text: Set(format!("Option {}", id)),
        timecreated: Set(timecreated),
        timemodified: Set(timemodified),
    }
    .insert(db)
    .await
    .unwrap();
}

/// Answer of `user_id` on option 1 with the given list status
pub async fn seed_answer(
    db: &DatabaseConnection,
    id: i64,
    user_id: i64,
    waitinglist: i64,
    timemodified: i64,
) {
    booking_answer::ActiveModel {
        id: Set(id),
        userid: Set(user_id),
        optionid: Set(1),
        waitinglist: Set(waitinglist),
        status: Set(0),
        notes: Set(None),
        timemodified: Set(timemodified),
        timecreated: Set(timemodified),
        json: Set(Some(r#"{"condition":"none"}"#.to_string())),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn seed_presence(
    db: &DatabaseConnection,
    id: i64,
    option_id: i64,
    date_id: i64,
    user_id: i64,
    status: i64,
) {
    optiondate_answer::ActiveModel {
        id: Set(id),
        optionid: Set(option_id),
        optiondateid: Set(date_id),
        userid: Set(user_id),
        status: Set(status),
        timemodified: Set(0),
    }
    .insert(db)
    .await
    .unwrap();
}

pub fn print_test_header(test_name: &str, purpose: &str) {
    println!("\n🧪 TEST: {}", test_name);
    println!("📋 PURPOSE: {}", purpose);
}
