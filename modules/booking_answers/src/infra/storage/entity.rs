//! SeaORM entities for database tables

/// Booking answers table entity
pub mod booking_answer {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "mdl_booking_answers")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,

        pub userid: i64,

        pub optionid: i64,

        /// Booked, waiting list, deleted, ...
        pub waitinglist: i64,

        /// Presence status
        pub status: i64,

        pub notes: Option<String>,

        /// Unix seconds
        pub timemodified: i64,

        /// Unix seconds
        pub timecreated: i64,

        /// Arbitrary JSON payload as text
        pub json: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::Userid",
            to = "super::user::Column::Id"
        )]
        User,
        #[sea_orm(
            belongs_to = "super::booking_option::Entity",
            from = "Column::Optionid",
            to = "super::booking_option::Column::Id"
        )]
        BookingOption,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::User.def()
        }
    }

    impl Related<super::booking_option::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::BookingOption.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Site users table entity
pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "mdl_user")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub username: String,
        pub firstname: String,
        pub lastname: String,
        pub email: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::booking_answer::Entity")]
        BookingAnswers,
    }

    impl Related<super::booking_answer::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::BookingAnswers.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Presence per session date and user
pub mod optiondate_answer {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "mdl_booking_optiondates_answers")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub optionid: i64,
        pub optiondateid: i64,
        pub userid: i64,
        /// Presence status of the user on that date
        pub status: i64,
        pub timemodified: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Booking options table entity
pub mod booking_option {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "mdl_booking_options")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub text: String,
        /// Unix seconds, 0 when unknown
        pub timecreated: i64,
        /// Unix seconds, 0 when unknown
        pub timemodified: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::booking_answer::Entity")]
        BookingAnswers,
    }

    impl Related<super::booking_answer::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::BookingAnswers.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
