// Practice sessions: answered questions and per-session score history.

pub mod handlers;
pub mod models;
pub mod store;
