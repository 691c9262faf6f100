//! # API Route Modules
//!
//! - `validate`: agent, OpenAPI, dual-format and batch validation.

pub mod validate;
