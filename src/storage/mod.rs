pub mod config;
pub mod database;
pub mod header;
pub mod page_reader;
pub mod schema;
