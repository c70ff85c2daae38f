//! Domain layer - business logic and services

pub mod capability;
pub mod export;
pub mod option_fields;
pub mod query;
pub mod repository;
pub mod service;
pub mod sorting;
pub mod table;

pub use capability::{CapabilityChecker, MockCapabilityChecker, NoOpCapabilityChecker};
pub use query::QueryBuilder;
pub use repository::{BookingAnswersRepository, BookingOptionRepository, ResolvedView};
pub use service::Service;
