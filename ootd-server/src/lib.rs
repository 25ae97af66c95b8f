//! HTTP layer for the OOTD recommendation backend.
//!
//! This crate focuses on:
//! - Routing and request/response shapes
//! - Translating core errors into HTTP status codes and JSON bodies
//! - Wiring the service clients together at startup

pub mod error;
pub mod routes;
pub mod state;
