pub mod config;
pub mod notification;
pub mod persistence;
pub mod security;
