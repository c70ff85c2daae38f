//! Booking Answers Module
//!
//! Listing queries and table descriptors for the users of a booking option,
//! a booking instance, a course or the whole site, filtered by booking
//! status. Waiting lists can carry each user's rank, booked lists the
//! number of session dates a user attended.

// Public exports
pub mod contract;
pub use contract::{
    client::BookingAnswersApi, error::BookingAnswersError, BookingAnswer, BookingStatus,
    ExportRequest, Page, Scope, SortOrder, SortRequest, TableDescriptor, TableView,
    UsersTableRequest,
};

pub mod module;
pub use module::BookingAnswersModule;

pub mod config;
pub use config::Config;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
