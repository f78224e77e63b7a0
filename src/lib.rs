pub mod api;
pub mod booking;
pub mod chat;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod fleet;
pub mod server;
