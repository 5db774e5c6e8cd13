//! # HTTP Middleware
//!
//! Layers applied to the API router, outermost first:
//!
//! 1. [`tracing_layer`]: request spans
//! 2. [`cors`]: origins from `CORS_ORIGINS`
//! 3. [`metrics`]: request and error counters
//! 4. `crate::auth`: session bearer resolution
//! 5. [`rate_limit`]: fixed-window limit per caller

pub mod cors;
pub mod metrics;
pub mod rate_limit;
pub mod tracing_layer;
