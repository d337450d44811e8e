pub mod message;
pub mod messagedb;
