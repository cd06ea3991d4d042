//! # Middleware
//!
//! Request metrics recorded through the `metrics` facade.

pub mod metrics;
