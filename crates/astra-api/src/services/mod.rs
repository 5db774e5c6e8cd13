//! # Services
//!
//! Request-independent logic used by the route handlers and the
//! background scanner. Handlers stay thin: extract, call a service, map
//! the result.

pub mod analysis;
pub mod content;
pub mod engine;
pub mod market_data;
pub mod proof;
pub mod report;
pub mod scanner;
