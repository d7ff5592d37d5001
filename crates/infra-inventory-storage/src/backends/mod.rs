//! Storage backend implementations

pub mod sqlite;
