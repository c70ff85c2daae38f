//! Infrastructure layer - external dependencies

pub mod storage;
