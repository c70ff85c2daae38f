//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::BookingAnswersApi;
pub use error::BookingAnswersError;
pub use model::{
    BookingAnswer, BookingStatus, Download, ExportRequest, OptionTimes, Page, Projection,
    QuerySpec, Scope, SortOrder, SortPolicy, SortRequest, TableDescriptor, TableView,
    UsersTableRequest,
};
