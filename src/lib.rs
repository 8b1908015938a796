//! slckn library
//!
//! Config resolution, message formatting and delivery for the `slckn`
//! notifier, exported for testing and integration.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod notify;
pub mod sender;
