//! Storage layer - database entities, statements and repositories

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;
pub mod statement;
