pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod dispatch;
pub mod filter;
pub mod groups;
pub mod repos;
pub mod summary;
