pub mod auth;
pub mod filter;

pub use auth::AuthCommands;
pub use filter::FilterCommands;
