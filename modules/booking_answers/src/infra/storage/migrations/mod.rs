//! Database migrations for booking answers
//!
//! Tables use the default `mdl_` prefix; deployments sharing the host's
//! schema skip these and point `table_prefix` at the existing tables.
//!
//! Each migration names itself; the name is its version in `seaql_migrations`.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_booking_tables::Migration),
            Box::new(m20250301_000002_create_optiondates_answers::Migration),
        ]
    }
}

mod m20250301_000001_create_booking_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_booking_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(User::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(User::Id).big_integer().not_null().primary_key())
                        .col(ColumnDef::new(User::Username).string().not_null())
                        .col(ColumnDef::new(User::Firstname).string().not_null())
                        .col(ColumnDef::new(User::Lastname).string().not_null())
                        .col(ColumnDef::new(User::Email).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(BookingOptions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BookingOptions::Id)
                                .big_integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(BookingOptions::Text).string().not_null())
                        .col(
                            ColumnDef::new(BookingOptions::Timecreated)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BookingOptions::Timemodified)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(BookingAnswers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BookingAnswers::Id)
                                .big_integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(BookingAnswers::Userid).big_integer().not_null())
                        .col(ColumnDef::new(BookingAnswers::Optionid).big_integer().not_null())
                        .col(
                            ColumnDef::new(BookingAnswers::Waitinglist)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BookingAnswers::Status)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(BookingAnswers::Notes).text())
                        .col(
                            ColumnDef::new(BookingAnswers::Timemodified)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BookingAnswers::Timecreated)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(BookingAnswers::Json).text())
                        .to_owned(),
                )
                .await?;

            // Status filter and waiting list order
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_booking_answers_waitinglist_timemodified")
                        .table(BookingAnswers::Table)
                        .col(BookingAnswers::Waitinglist)
                        .col(BookingAnswers::Timemodified)
                        .col(BookingAnswers::Id)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BookingAnswers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BookingOptions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(User::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum User {
        #[sea_orm(iden = "mdl_user")]
        Table,
        Id,
        Username,
        Firstname,
        Lastname,
        Email,
    }

    #[derive(DeriveIden)]
    enum BookingOptions {
        #[sea_orm(iden = "mdl_booking_options")]
        Table,
        Id,
        Text,
        Timecreated,
        Timemodified,
    }

    #[derive(DeriveIden)]
    enum BookingAnswers {
        #[sea_orm(iden = "mdl_booking_answers")]
        Table,
        Id,
        Userid,
        Optionid,
        Waitinglist,
        Status,
        Notes,
        Timemodified,
        Timecreated,
        Json,
    }
}

mod m20250301_000002_create_optiondates_answers {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_optiondates_answers"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BookingOptiondatesAnswers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BookingOptiondatesAnswers::Id)
                                .big_integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(BookingOptiondatesAnswers::Optionid)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BookingOptiondatesAnswers::Optiondateid)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BookingOptiondatesAnswers::Userid)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BookingOptiondatesAnswers::Status)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BookingOptiondatesAnswers::Timemodified)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_booking_optiondates_answers_option_user")
                        .table(BookingOptiondatesAnswers::Table)
                        .col(BookingOptiondatesAnswers::Optionid)
                        .col(BookingOptiondatesAnswers::Userid)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BookingOptiondatesAnswers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum BookingOptiondatesAnswers {
        #[sea_orm(iden = "mdl_booking_optiondates_answers")]
        Table,
        Id,
        Optionid,
        Optiondateid,
        Userid,
        Status,
        Timemodified,
    }
}
