pub mod config;
pub mod databases;
pub mod error;
pub mod routes;
