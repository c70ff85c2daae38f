//! SeaORM repository implementations

use crate::contract::{BookingAnswer, OptionTimes, QuerySpec};
use crate::domain::repository::{BookingAnswersRepository, BookingOptionRepository, ResolvedView};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait};
use std::sync::Arc;

use super::entity::booking_option;
use super::mapper::booking_answer_from_row;
use super::statement::{count_statement, listing_statement};

// ===== Booking Answers Repository =====

pub struct SeaOrmBookingAnswersRepository {
    db: Arc<DatabaseConnection>,
    table_prefix: String,
}

impl SeaOrmBookingAnswersRepository {
    pub fn new(db: Arc<DatabaseConnection>, table_prefix: impl Into<String>) -> Self {
        Self {
            db,
            table_prefix: table_prefix.into(),
        }
    }
}

#[async_trait]
impl BookingAnswersRepository for SeaOrmBookingAnswersRepository {
    async fn count(&self, query: &QuerySpec) -> Result<u64> {
        let stmt = count_statement(query, &self.table_prefix, self.db.get_database_backend())?;
        let row = self
            .db
            .query_one(stmt)
            .await?
            .context("count query returned no row")?;
        let total: i64 = row.try_get("", "total")?;

        Ok(u64::try_from(total)?)
    }

    async fn fetch(&self, query: &QuerySpec, view: &ResolvedView) -> Result<Vec<BookingAnswer>> {
        let stmt = listing_statement(
            query,
            view,
            &self.table_prefix,
            self.db.get_database_backend(),
        )?;
        let rows = self.db.query_all(stmt).await?;

        let answers = rows
            .iter()
            .map(|row| booking_answer_from_row(row, query.projection))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(rows = answers.len(), "fetched booking answers");

        Ok(answers)
    }
}

// ===== Booking Option Repository =====

pub struct SeaOrmBookingOptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmBookingOptionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingOptionRepository for SeaOrmBookingOptionRepository {
    async fn find_times(&self, option_id: i64) -> Result<Option<OptionTimes>> {
        let result = booking_option::Entity::find_by_id(option_id)
            .one(&*self.db)
            .await?;

        Ok(result.map(OptionTimes::from))
    }
}
