pub mod config;
pub mod controller;
pub mod message;
pub mod prompt;
pub mod reveal;
pub mod session;
