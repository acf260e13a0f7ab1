//! services/api/src/lib.rs
//!
//! The coursehub API service: REST handlers over the core crate, plus the adapters
//! that connect the core ports to Postgres and the Gemini API.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
