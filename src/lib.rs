//! Account registration service
//!
//! Creates user accounts with PBKDF2-derived credentials inside a database
//! transaction and mails a signed verification link to the new address.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
