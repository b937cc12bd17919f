pub mod advice;
pub mod audit;
pub mod chat;
pub mod config;
pub mod digest;
pub mod export;
pub mod message;
pub mod paths;
pub mod profile;
pub mod records;
pub mod remedy;
pub mod session;
pub mod store;
pub mod warn;
