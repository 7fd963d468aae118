//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `token_resolution`: Token source ordering tests
//! - `derived_settings`: Targets, fetch settings, and pagination derived from
//!   configuration

mod helpers;
