//! SQLite persistence for the collaboration graph.

pub mod schema;

pub use schema::initialize_database;
