pub mod account;
pub mod application;
pub mod auth;
pub mod job;
